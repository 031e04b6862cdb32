//! Default socket and configuration paths
//!
//! The daemon listens on `~/.gonit.sock` unless told otherwise, so the client
//! looks there too. Configuration lives in the platform config directory:
//! - Linux: `~/.config/gonit-client/`
//! - macOS: `~/Library/Application Support/gonit-client/`
//! - Windows: `%APPDATA%\gonit-client\`

use std::path::PathBuf;

/// File name of the daemon's default RPC socket, relative to the home directory
pub const SOCKET_FILE_NAME: &str = ".gonit.sock";

/// Name used for the client's configuration directory
const APP_NAME: &str = "gonit-client";

/// Get the user's home directory
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Get the default socket path: `<home>/.gonit.sock`
///
/// Falls back to a path relative to the working directory when no home
/// directory can be determined.
pub fn default_socket_path() -> PathBuf {
    home_dir().unwrap_or_default().join(SOCKET_FILE_NAME)
}

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
