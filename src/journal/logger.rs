use tracing::{info, instrument};

use super::directory::ResourceDirectory;
use crate::error::Result;
use crate::models::{Row, SpreadsheetHandle};
use crate::sheets::DocumentStore;

/// Public entry point for recording rows against titled spreadsheets.
pub struct RowLogger<S> {
    directory: ResourceDirectory<S>,
}

impl<S: DocumentStore> RowLogger<S> {
    pub fn new(directory: ResourceDirectory<S>) -> Self {
        Self { directory }
    }

    /// Ensure the spreadsheet backing `title` exists with a current header
    /// block and record the write.
    ///
    /// Only the header block is written.
    // TODO: append the value rows below the header once a layout for
    // repeated writes is settled.
    #[instrument(name = "Logging row", skip(self, description, row))]
    pub async fn log_row(
        &self,
        title: &str,
        description: &str,
        row: &Row,
    ) -> Result<SpreadsheetHandle> {
        let handle = self.directory.resolve(title, description, row).await?;
        info!(id = %handle.id, "Row recorded");

        Ok(handle)
    }
}
