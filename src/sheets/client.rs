use super::DocumentStore;
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::models::{FolderHandle, SpreadsheetHandle};
use crate::sheets::auth::obtain_authenticator;
use async_trait::async_trait;
use google_drive3::api::{DriveHub, File};
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use std::io::Cursor;
use tracing::{debug, instrument};

// Access to files created or opened by the app
pub(crate) const AUTH_SCOPE: Scope = Scope::DriveFile;

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Authenticated Drive and Sheets hubs sharing one HTTP client.
pub struct GoogleClient {
    drive: DriveHub<HttpsConnector<HttpConnector>>,
    sheets: Sheets<HttpsConnector<HttpConnector>>,
}

impl GoogleClient {
    /// Create a new GoogleClient with authenticated access
    #[instrument(name = "Authenticating to Google", skip_all)]
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = obtain_authenticator(config).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Auth(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        let drive = DriveHub::new(client.clone(), auth.clone());
        let sheets = Sheets::new(client, auth);

        Ok(Self { drive, sheets })
    }

    fn parse_mime(value: &str) -> Result<mime::Mime> {
        value
            .parse()
            .map_err(|e| AppError::Drive(format!("Invalid MIME type {:?}: {}", value, e)))
    }
}

/// Escape a string for embedding in a Drive query literal.
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl DocumentStore for GoogleClient {
    #[instrument(name = "Finding folder", skip(self))]
    async fn find_folder(&self, name: &str) -> Result<Option<FolderHandle>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            quote(name),
            FOLDER_MIME
        );

        let (_, file_list) = self
            .drive
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to list folders: {}", e)))?;

        let folder = file_list
            .files
            .and_then(|files| files.into_iter().next())
            .map(|file| FolderHandle {
                id: file.id.unwrap_or_default(),
                name: file.name.unwrap_or_else(|| name.to_string()),
            });

        Ok(folder)
    }

    #[instrument(name = "Creating folder", skip(self))]
    async fn create_folder(&self, name: &str) -> Result<FolderHandle> {
        let metadata = File {
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME.to_string()),
            ..Default::default()
        };

        // Drive file creation is a media-upload call; folders take an
        // empty body.
        let (_, file) = self
            .drive
            .files()
            .create(metadata)
            .add_scope(AUTH_SCOPE)
            .upload(Cursor::new(Vec::new()), Self::parse_mime(FOLDER_MIME)?)
            .await
            .map_err(|e| AppError::Drive(format!("Failed to create folder: {}", e)))?;

        let id = file
            .id
            .ok_or_else(|| AppError::Drive("Created folder has empty ID".to_string()))?;
        debug!(id = %id, "Created folder");

        Ok(FolderHandle {
            id,
            name: name.to_string(),
        })
    }

    #[instrument(name = "Listing spreadsheets", skip(self, folder))]
    async fn list_spreadsheets(
        &self,
        folder: &FolderHandle,
        title: &str,
    ) -> Result<Vec<SpreadsheetHandle>> {
        let query = format!(
            "name = '{}' and '{}' in parents and mimeType = '{}' and trashed = false",
            quote(title),
            quote(&folder.id),
            SPREADSHEET_MIME
        );

        let (_, file_list) = self
            .drive
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to list spreadsheets: {}", e)))?;

        let handles = file_list
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|file| SpreadsheetHandle {
                id: file.id.unwrap_or_default(),
                title: file.name.unwrap_or_else(|| title.to_string()),
                url: None,
            })
            .collect();

        Ok(handles)
    }

    #[instrument(name = "Creating spreadsheet", skip(self, folder))]
    async fn create_spreadsheet(
        &self,
        folder: &FolderHandle,
        title: &str,
    ) -> Result<SpreadsheetHandle> {
        let metadata = File {
            name: Some(title.to_string()),
            mime_type: Some(SPREADSHEET_MIME.to_string()),
            parents: Some(vec![folder.id.clone()]),
            ..Default::default()
        };

        let (_, file) = self
            .drive
            .files()
            .create(metadata)
            .add_scope(AUTH_SCOPE)
            .upload(Cursor::new(Vec::new()), Self::parse_mime(SPREADSHEET_MIME)?)
            .await
            .map_err(|e| AppError::Drive(format!("Failed to create spreadsheet: {}", e)))?;

        let id = file
            .id
            .ok_or_else(|| AppError::Drive("Created spreadsheet has empty ID".to_string()))?;
        debug!(id = %id, "Created spreadsheet");

        Ok(SpreadsheetHandle {
            id,
            title: title.to_string(),
            url: None,
        })
    }

    #[instrument(name = "Fetching spreadsheet", skip(self))]
    async fn fetch_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetHandle> {
        let (_, spreadsheet) = self
            .sheets
            .spreadsheets()
            .get(spreadsheet_id)
            .include_grid_data(false)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to get spreadsheet: {}", e)))?;

        let url = spreadsheet.spreadsheet_url.clone();
        let id = spreadsheet
            .spreadsheet_id
            .ok_or_else(|| AppError::Sheets("Spreadsheet has empty ID".to_string()))?;
        let title = spreadsheet
            .properties
            .and_then(|props| props.title)
            .unwrap_or_default();

        Ok(SpreadsheetHandle { id, title, url })
    }

    #[instrument(name = "Updating values", skip(self, values))]
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<()> {
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.to_string()),
            values: Some(values),
        };

        self.sheets
            .spreadsheets()
            .values_update(value_range, spreadsheet_id, range)
            .value_input_option("RAW")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to update range {}: {}", range, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_query_literals() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("it's"), "it\\'s");
        assert_eq!(quote("back\\slash"), "back\\\\slash");
    }
}
