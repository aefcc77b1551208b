//! Directory where the executable lives. Settings and custom palettes are stored
//! next to the app so a standalone build stays self-contained.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default location of the optional custom palette file.
pub fn palettes_path() -> PathBuf {
    exe_directory().join("palettes.json")
}
