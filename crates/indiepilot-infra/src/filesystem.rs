//! Data directory layout for IndiePilot.

use std::path::{Path, PathBuf};

/// Name of the SQLite file inside the data directory.
pub const DATABASE_FILE: &str = "indiepilot.db";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `INDIEPILOT_DATA_DIR` environment variable
/// 2. `~/.indiepilot`
/// 3. `.indiepilot` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("INDIEPILOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".indiepilot");
    }

    PathBuf::from(".indiepilot")
}

/// `{data_dir}/indiepilot.db`
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}
