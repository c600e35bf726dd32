//! Error types for rentcal.

use thiserror::Error;

/// Errors that can occur while importing calendar feeds.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No calendar feeds configured for property '{0}'")]
    NoFeedSources(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("{}", fetch_message(url, *status, message))]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn fetch_message(url: &str, status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Failed to fetch {url}: HTTP {code} {message}"),
        None => format!("Failed to fetch {url}: {message}"),
    }
}

/// Result type alias for rentcal operations.
pub type Result<T> = std::result::Result<T, Error>;
