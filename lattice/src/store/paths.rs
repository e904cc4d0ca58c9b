//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "lattice";
const APPLICATION: &str = "lattice";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the data directory for persistent view state.
///
/// - Linux: `$XDG_DATA_HOME/lattice` or `~/.local/share/lattice`
/// - macOS: `~/Library/Application Support/dev.lattice.lattice`
/// - Windows: `C:\Users\<User>\AppData\Roaming\lattice\lattice\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the path to the default store database.
pub fn store_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("store.db"))
}
