//! Reference directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the reference data directory.
pub const REFERENCE_ENV_VAR: &str = "ILR_REFERENCE_DIR";

/// Get the reference data root directory.
///
/// Resolution order:
/// 1. `ILR_REFERENCE_DIR` environment variable
/// 2. `reference/` directory relative to the workspace root
pub fn reference_root() -> PathBuf {
    if let Ok(root) = std::env::var(REFERENCE_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}
