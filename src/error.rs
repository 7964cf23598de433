use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Google Drive API error: {0}")]
    Drive(String),

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Found {count} spreadsheets titled {title:?}, expected at most one")]
    AmbiguousTitle { title: String, count: usize },

    #[error("Invalid field {0:?}, expected KEY=VALUE")]
    InvalidField(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
