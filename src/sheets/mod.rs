mod auth;
mod client;
pub mod range;

pub use client::GoogleClient;

// Re-export clear_tokens for CLI usage
pub use auth::clear_tokens as clear_google_tokens;
pub(crate) use auth::token_cache_path;

use crate::error::Result;
use crate::models::{FolderHandle, SpreadsheetHandle};
use async_trait::async_trait;
use serde_json::Value;

/// Remote document and spreadsheet operations consumed by the resource
/// directory. Failures propagate unchanged; nothing is retried here.
#[async_trait]
pub trait DocumentStore {
    /// Find a folder by exact name. Returns the first match, if any.
    async fn find_folder(&self, name: &str) -> Result<Option<FolderHandle>>;

    async fn create_folder(&self, name: &str) -> Result<FolderHandle>;

    /// All spreadsheets with exactly this title inside the folder.
    async fn list_spreadsheets(
        &self,
        folder: &FolderHandle,
        title: &str,
    ) -> Result<Vec<SpreadsheetHandle>>;

    async fn create_spreadsheet(
        &self,
        folder: &FolderHandle,
        title: &str,
    ) -> Result<SpreadsheetHandle>;

    /// Fetch current metadata for a spreadsheet id.
    async fn fetch_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetHandle>;

    /// Overwrite `range` with literal (unformatted) `values`.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<()>;
}
