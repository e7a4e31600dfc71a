// Data path utilities.
// Resolves where the session file and log live on this machine.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base data directory (~/.local/share/fitlog on Linux).
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fitlog").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path of the file backing a storage key inside `dir`.
pub fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_key(key)))
}

/// Replace characters that are unsafe in file names with underscores.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}
