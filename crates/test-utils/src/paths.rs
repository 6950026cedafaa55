//! Path utilities for locating on-disk test data, when a test needs more
//! than the in-memory generators in this crate provide.

use std::path::PathBuf;

/// Returns the workspace root directory, walking up from this crate's
/// manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a test file by name, checking `TEST_DATA_DIR` (if set),
/// then the workspace-level `testdata/` directory.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }
    candidates.push(workspace_root().join("testdata").join(name));

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output, cleaned up on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("failed to create temporary test directory")
}
