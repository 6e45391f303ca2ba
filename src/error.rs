use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {key} in config: {value:?}")]
    Setting { key: &'static str, value: String },

    #[error("Invalid fence pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
