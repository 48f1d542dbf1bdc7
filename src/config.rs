//! Configuration for memories-store

use std::path::PathBuf;

/// Configuration for the memory store.
///
/// The engine has no global state; everything it needs to know (where the
/// database lives, which username to fall back to) is carried here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: PathBuf,

    /// Username used when a request does not name one
    pub default_username: String,

    /// HTTP server port
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memories-store");

        Self {
            db_path: data_dir.join("memories.db"),
            default_username: "default_user".to_string(),
            server_port: 8460,
        }
    }
}

impl Config {
    /// Create a new config with a custom database path
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// Override the fallback username
    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = username.into();
        self
    }

    /// Ensure the directory holding the database exists
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
