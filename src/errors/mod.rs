use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Feed errors
    #[error("Feed request failed for '{lang}'{}: {message}", http_status(.status))]
    Feed {
        lang: String,
        status: Option<u16>,
        message: String,
    },

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Version-control errors, already enhanced with a readable cause
    #[error("{cause} (operation: {operation})")]
    VersionControl {
        operation: String,
        status: Option<u16>,
        cause: String,
    },

    // Per-item errors
    #[error("Transform failed for article {id}: {reason}")]
    Transform { id: String, reason: String },

    // Hash store errors
    #[error("Hash store I/O error at {path}: {source}")]
    HashStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hash store at {path} is not a valid JSON map: {source}")]
    HashStoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Feed error raised by the content source for one language
    pub fn feed(lang: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        BotError::Feed {
            lang: lang.into(),
            status,
            message: message.into(),
        }
    }

    pub fn transform(id: impl Into<String>, reason: impl Into<String>) -> Self {
        BotError::Transform {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

pub type BotResult<T> = Result<T, BotError>;
