pub mod cli;
pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod sheets;

pub use error::{AppError, Result};
pub use journal::{ResourceDirectory, RowLogger};
pub use models::{FolderHandle, Row, SpreadsheetHandle};
