// VisualStash platform abstraction
// Provides the platform-specific data directory where the stash database
// lives. Uses `cfg(target_os)` to select the right convention at compile
// time.

use std::env;
use std::path::PathBuf;

/// Returns the platform-specific data directory for VisualStash.
///
/// - **Linux**: `$XDG_DATA_HOME/visualstash` or `~/.local/share/visualstash`
/// - **macOS**: `~/Library/Application Support/VisualStash`
/// - **Windows**: `%APPDATA%/VisualStash`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("visualstash");
        }
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("visualstash")
    }
    #[cfg(target_os = "macos")]
    {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("VisualStash")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("VisualStash")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        env::temp_dir().join("visualstash")
    }
}
