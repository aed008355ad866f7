//! Locating checked-in fixtures and scratch directories.

use std::path::PathBuf;

/// Crate whose `testdata/` holds the shared elevation fixtures.
const FIXTURE_CRATE: &str = "grid-io";

fn crates_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/test-utils
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// `crates/<crate_name>/testdata/<name>`, if it exists.
pub fn find_crate_test_file(crate_name: &str, name: &str) -> Option<PathBuf> {
    let path = crates_dir().join(crate_name).join("testdata").join(name);
    path.exists().then_some(path)
}

/// Look up a fixture, preferring `TEST_DATA_DIR` over the checked-in copy.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    std::env::var("TEST_DATA_DIR")
        .ok()
        .map(|dir| PathBuf::from(dir).join(name))
        .filter(|path| path.exists())
        .or_else(|| find_crate_test_file(FIXTURE_CRATE, name))
}

/// Scratch directory removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}
