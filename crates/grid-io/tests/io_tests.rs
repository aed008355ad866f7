//! Tests for grid reading and atomic output.

use grid_io::{create_output, open_grid, parse_ascii_grid, world_file_path};
use relief_common::{PixelType, RasterSource, ReliefError};
use renderer::{ColorRamp, ColorReliefSweep, RELIEF_BANDS};
use terrain::{DerivativeConfig, LightSource, PixelSweep, Product, SlopeUnits};
use test_utils::fixtures::{ascii_grids, write_fixture};
use test_utils::{find_crate_test_file, require_test_files};

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_parse_small_grid() {
    let grid = parse_ascii_grid(ascii_grids::SMALL).unwrap();
    let spec = grid.spec();

    assert_eq!((spec.width, spec.height), (4, 3));
    assert_eq!(spec.origin_x, 1000.0);
    assert_eq!(spec.origin_y, 2090.0);
    assert_eq!(grid.get(0, 0), Some(1.0));
    assert_eq!(grid.get(2, 3), Some(12.0));
    assert!(spec.is_no_data(grid.get(1, 1).unwrap()));
}

#[test]
fn test_missing_header_key() {
    match parse_ascii_grid(ascii_grids::MISSING_NROWS) {
        Err(ReliefError::InvalidHeader(msg)) => assert!(msg.contains("nrows")),
        other => panic!("expected InvalidHeader, got {:?}", other),
    }
}

#[test]
fn test_short_body() {
    assert!(matches!(
        parse_ascii_grid(ascii_grids::SHORT_BODY),
        Err(ReliefError::InvalidData(_))
    ));
}

#[test]
fn test_open_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "dem.tif", "not a grid");
    assert!(matches!(
        open_grid(&path),
        Err(ReliefError::UnsupportedFormat(_))
    ));
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_ascii_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "small.asc", ascii_grids::SMALL);
    let grid = open_grid(&input).unwrap();
    let spec = *grid.spec();

    let output = dir.path().join("copy.asc");
    let mut sink = create_output(
        &output,
        spec.width,
        spec.height,
        1,
        PixelType::Float32,
        &spec,
        spec.no_data,
    )
    .unwrap();
    let mut row = vec![0.0f32; spec.width];
    for r in 0..spec.height {
        grid.read_row(r, &mut row).unwrap();
        sink.write_row(0, r, &row).unwrap();
    }
    sink.finish().unwrap();

    let copy = open_grid(&output).unwrap();
    assert_eq!(copy.spec(), grid.spec());
    assert_eq!(copy.data(), grid.data());
}

#[test]
fn test_failed_run_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let grid = parse_ascii_grid(ascii_grids::SMALL).unwrap();
    let spec = *grid.spec();

    for name in ["partial.asc", "partial.png"] {
        let output = dir.path().join(name);
        {
            let mut sink =
                create_output(&output, 4, 3, 1, PixelType::Byte, &spec, 0.0).unwrap();
            sink.write_row(0, 0, &[1.0, 2.0, 3.0, 4.0]).unwrap();
            // dropped without finish
        }
        assert!(!output.exists(), "{} should not exist", name);
    }

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_size_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let grid = parse_ascii_grid(ascii_grids::SMALL).unwrap();
    assert!(matches!(
        create_output(
            dir.path().join("out.asc"),
            5,
            3,
            1,
            PixelType::Float32,
            grid.spec(),
            -9999.0
        ),
        Err(ReliefError::InvalidParameter { .. })
    ));
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_slope_to_ascii() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "small.asc", ascii_grids::SMALL);
    let grid = open_grid(&input).unwrap();
    let spec = *grid.spec();

    let product = Product::Slope(SlopeUnits::Degrees);
    let sweep = PixelSweep::new(product, &DerivativeConfig::default()).unwrap();
    let output = dir.path().join("slope.asc");
    let mut sink = create_output(
        &output,
        spec.width,
        spec.height,
        1,
        product.pixel_type(),
        &spec,
        product.no_data(),
    )
    .unwrap();
    sweep.run(&grid, &mut sink).unwrap();
    sink.finish().unwrap();

    let slope = open_grid(&output).unwrap();
    // Every cell is either on the edge or next to the no-data cell.
    assert!(slope.data().iter().all(|&v| v == -9999.0));
    assert_eq!(slope.spec().no_data, -9999.0);
}

#[test]
fn test_ridge_hillshade_and_relief() {
    let paths = require_test_files!("ridge.asc", "ridge_ramp.txt");
    let dir = tempfile::tempdir().unwrap();
    let grid = open_grid(&paths[0]).unwrap();
    let spec = *grid.spec();

    let product = Product::Hillshade(LightSource::default());
    let sweep = PixelSweep::new(product, &DerivativeConfig::default()).unwrap();
    let shade_path = dir.path().join("shade.png");
    let mut sink = create_output(
        &shade_path,
        spec.width,
        spec.height,
        1,
        PixelType::Byte,
        &spec,
        product.no_data(),
    )
    .unwrap();
    let summary = sweep.run(&grid, &mut sink).unwrap();
    sink.finish().unwrap();

    assert!(summary.valid_cells > 0);
    assert!(shade_path.exists());
    assert!(world_file_path(&shade_path).exists());

    let ramp = ColorRamp::from_file(&paths[1]).unwrap();
    let relief_path = dir.path().join("relief.png");
    let mut sink = create_output(
        &relief_path,
        spec.width,
        spec.height,
        RELIEF_BANDS,
        PixelType::Byte,
        &spec,
        0.0,
    )
    .unwrap();
    let summary = ColorReliefSweep::new(&ramp).run(&grid, &mut sink).unwrap();
    sink.finish().unwrap();

    assert_eq!(summary.no_data_cells, 1);
    assert!(relief_path.exists());
}

#[test]
fn test_ridge_fixture_shape() {
    let path = find_crate_test_file("grid-io", "ridge.asc").expect("ridge.asc is checked in");
    let grid = open_grid(&path).unwrap();
    let spec = grid.spec();

    assert_eq!((spec.width, spec.height), (8, 6));
    assert_eq!(spec.ew_res, 30.0);
    assert_eq!(spec.origin_y, 4_100_180.0);
    assert_eq!(grid.get(3, 3), Some(1310.0));
}
