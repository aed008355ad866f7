//! PNG encoding for rendered rasters.
//!
//! Supports three color types:
//! - **Grayscale (color type 0)**: single-band byte rasters such as hillshade.
//! - **RGB (color type 2)**: color relief output.
//! - **Indexed (color type 3)**: RGB images with ≤256 unique colors.
//!
//! Use `create_png_rgb_auto` to pick between indexed and RGB automatically.

use rayon::prelude::*;
use relief_common::{ReliefError, Result};
use std::collections::HashMap;
use std::io::Write;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG color types written by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Gray,
    Rgb,
    Indexed,
}

impl ColorType {
    fn code(&self) -> u8 {
        match self {
            ColorType::Gray => 0,
            ColorType::Rgb => 2,
            ColorType::Indexed => 3,
        }
    }

    /// Bytes per pixel in the scanline data.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ColorType::Gray | ColorType::Indexed => 1,
            ColorType::Rgb => 3,
        }
    }
}

/// Create a grayscale PNG (color type 0).
pub fn create_png_gray(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    encode(pixels, width, height, ColorType::Gray, None)
}

/// Create an RGB PNG (color type 2) from packed `r g b` bytes.
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    encode(pixels, width, height, ColorType::Rgb, None)
}

/// Create an RGB image, using an indexed palette when it has ≤256 colors.
pub fn create_png_rgb_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let num_pixels = pixels.len() / 3;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png_rgb(pixels, width, height),
    }
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8)],
    indices: &[u8],
) -> Result<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(ReliefError::write_failed(format!(
            "palette must hold 1-{} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }
    encode(indices, width, height, ColorType::Indexed, Some(palette))
}

fn encode(
    pixels: &[u8],
    width: usize,
    height: usize,
    color_type: ColorType,
    palette: Option<&[(u8, u8, u8)]>,
) -> Result<Vec<u8>> {
    let expected = width * height * color_type.bytes_per_pixel();
    if pixels.len() != expected {
        return Err(ReliefError::write_failed(format!(
            "{}x{} image needs {} bytes, got {}",
            width,
            height,
            expected,
            pixels.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type.code());
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    if let Some(palette) = palette {
        let plte_data: Vec<u8> = palette.iter().flat_map(|&(r, g, b)| [r, g, b]).collect();
        write_chunk(&mut png, b"PLTE", &plte_data);
    }

    let idat_data = deflate_idat(pixels, width * color_type.bytes_per_pixel(), height)
        .map_err(|e| ReliefError::write_failed(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Pack RGB bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16)
}

#[inline(always)]
fn unpack_color(packed: u32) -> (u8, u8, u8) {
    (packed as u8, (packed >> 8) as u8, (packed >> 16) as u8)
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8)>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 3);

    for chunk in pixels.chunks_exact(3) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Unique colors are collected per chunk on the rayon pool, merged, then
/// every pixel is mapped to its palette index in a second parallel pass.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8)>, Vec<u8>)> {
    let chunk_pixels = (pixels.len() / 3 / rayon::current_num_threads()).max(256);

    let unique_colors: Vec<u32> = pixels
        .par_chunks(chunk_pixels * 3)
        .flat_map(|chunk| {
            let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for pixel in chunk.chunks_exact(3) {
                local.insert(pack_color(pixel[0], pixel[1], pixel[2]), ());
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_keys().collect::<Vec<_>>()
        })
        .collect();

    let mut global: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique_colors {
        if !global.contains_key(&packed) {
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            global.insert(packed, palette.len() as u8);
            palette.push(unpack_color(packed));
        }
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(3)
        .map(|p| global.get(&pack_color(p[0], p[1], p[2])).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate scanlines for the IDAT chunk, prefixing each with filter type 0.
fn deflate_idat(pixels: &[u8], stride: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for y in 0..height {
        uncompressed.push(0);
        uncompressed.extend_from_slice(&pixels[y * stride..(y + 1) * stride]);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 0, 0];
        let (palette, indices) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], indices[3]);
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7])
            .collect();
        assert!(extract_palette_sequential(&pixels).is_none());
    }

    #[test]
    fn test_extract_palette_parallel_matches_sequential() {
        let mut pixels = Vec::with_capacity(128 * 128 * 3);
        for y in 0..128 {
            for x in 0..128 {
                let idx = ((x / 8) + (y / 8)) % 50;
                pixels.extend_from_slice(&[(idx * 5) as u8, (100 + idx * 3) as u8, 40]);
            }
        }

        let (palette, indices) = extract_palette_parallel(&pixels).unwrap();
        assert!(palette.len() <= 50);
        assert_eq!(indices.len(), 128 * 128);
        for (i, &index) in indices.iter().enumerate() {
            let (r, g, b) = palette[index as usize];
            assert_eq!(&pixels[i * 3..i * 3 + 3], &[r, g, b]);
        }
    }

    #[test]
    fn test_gray_header() {
        let png = create_png_gray(&[0, 128, 255, 64], 2, 2).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[16..20], &2u32.to_be_bytes());
        assert_eq!(png[25], 0);
    }

    #[test]
    fn test_rgb_header() {
        let png = create_png_rgb(&[1, 2, 3, 4, 5, 6], 2, 1).unwrap();
        assert_eq!(png[25], 2);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_auto_uses_palette_for_few_colors() {
        let pixels: Vec<u8> = [[10u8, 20, 30], [40, 50, 60]].repeat(8).concat();
        let png = create_png_rgb_auto(&pixels, 4, 4).unwrap();
        assert_eq!(png[25], 3);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(matches!(
            create_png_rgb(&[0; 5], 2, 1),
            Err(ReliefError::WriteFailed(_))
        ));
    }
}
