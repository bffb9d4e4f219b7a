use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config {}", .0.display())]
    ConfigRead(PathBuf, #[source] io::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Login failed for {username}: {source}")]
    Login {
        username: String,
        #[source]
        source: steam::Error,
    },

    #[error("Account {0} already has a session")]
    DuplicateSession(String),
}
