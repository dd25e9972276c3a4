// Markshelf platform paths
// Config holds settings.json; data holds the SQLite library.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "markshelf";

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "MARKSHELF_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// - **Linux**: `$XDG_CONFIG_HOME/markshelf` or `~/.config/markshelf`
/// - **macOS**: `~/Library/Application Support/Markshelf`
/// - **Windows**: `%APPDATA%/Markshelf`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join("Markshelf")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("Markshelf")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
            Err(_) => home_dir().join(".config").join(APP_DIR),
        }
    }
}

/// `MARKSHELF_DATA_DIR` if set, else the platform data directory.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join("Markshelf")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("Markshelf")
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
            Err(_) => home_dir().join(".local").join("share").join(APP_DIR),
        }
    }
}

/// Where the SQLite backend keeps its file unless settings say otherwise.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("markshelf.db")
}
