//! Test helpers shared by the terrain-relief crates.
//!
//! - [`generators`]: synthetic elevation surfaces with known slope and aspect
//! - [`fixtures`]: ramp tables and ASCII grids as strings, written on demand
//! - [`paths`]: checked-in fixture lookup and scratch directories
//!
//! Pull it in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve every named fixture, or print a skip notice and return from the
/// calling test.
///
/// ```ignore
/// let paths = require_test_files!("ridge.asc", "ridge_ramp.txt");
/// ```
#[macro_export]
macro_rules! require_test_files {
    ($($name:expr),+ $(,)?) => {{
        let mut paths = Vec::new();
        $(
            match $crate::find_test_file($name) {
                Some(path) => paths.push(path),
                None => {
                    eprintln!("SKIPPED: fixture '{}' not found (TEST_DATA_DIR unset?)", $name);
                    return;
                }
            }
        )+
        paths
    }};
}

/// Assert two numbers agree within `epsilon`, comparing as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
