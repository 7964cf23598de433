use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{AppError, Result};
use crate::models::{FolderHandle, Row, SpreadsheetHandle};
use crate::sheets::DocumentStore;
use crate::sheets::range::header_range;

/// Name of the Drive folder every managed spreadsheet lives under.
pub const FOLDER_NAME: &str = "sheetlog";

type Slot = Arc<tokio::sync::Mutex<Option<SpreadsheetHandle>>>;

/// Maps titles to their backing spreadsheets, at most one per title.
///
/// Resolutions are cached for the process lifetime with no eviction.
/// Each title has its own async lock, so concurrent resolutions of the
/// same title serialize while unrelated titles proceed independently.
pub struct ResourceDirectory<S> {
    store: S,
    folder: FolderHandle,
    entries: Mutex<HashMap<String, Slot>>,
}

impl<S: DocumentStore> ResourceDirectory<S> {
    /// Resolve the namespace folder, creating it if absent, and return a
    /// directory rooted at it.
    #[instrument(name = "Opening resource directory", skip_all)]
    pub async fn open(store: S) -> Result<Self> {
        let folder = match store.find_folder(FOLDER_NAME).await? {
            Some(folder) => {
                debug!(id = %folder.id, "Reusing namespace folder");
                folder
            }
            None => {
                let folder = store.create_folder(FOLDER_NAME).await?;
                debug!(id = %folder.id, "Created namespace folder");
                folder
            }
        };

        Ok(Self {
            store,
            folder,
            entries: Mutex::new(HashMap::new()),
        })
    }

    pub fn folder(&self) -> &FolderHandle {
        &self.folder
    }

    /// Find or create the spreadsheet backing `title`.
    ///
    /// The first resolution of a title goes to the remote store and writes
    /// the header block; later resolutions are served from the in-process
    /// cache and touch nothing remote, so a cached spreadsheet's header is
    /// not rewritten for rows with a different key set.
    #[instrument(name = "Resolving title", skip(self, description, row))]
    pub async fn resolve(
        &self,
        title: &str,
        description: &str,
        row: &Row,
    ) -> Result<SpreadsheetHandle> {
        let slot = {
            let mut entries = self.entries.lock().expect("directory lock poisoned");
            entries.entry(title.to_string()).or_default().clone()
        };

        let mut entry = slot.lock().await;
        if let Some(handle) = entry.as_ref() {
            debug!(id = %handle.id, "Cache hit");
            return Ok(handle.clone());
        }

        // Not cached on failure, so the next resolve retries the remote
        // lookup from scratch.
        let handle = self.resolve_remote(title, description, row).await?;
        *entry = Some(handle.clone());

        Ok(handle)
    }

    async fn resolve_remote(
        &self,
        title: &str,
        description: &str,
        row: &Row,
    ) -> Result<SpreadsheetHandle> {
        let mut matches = self.store.list_spreadsheets(&self.folder, title).await?;

        let target = match matches.len() {
            0 => {
                let created = self.store.create_spreadsheet(&self.folder, title).await?;
                debug!(id = %created.id, "Created spreadsheet for title");
                created
            }
            1 => {
                let existing = matches.remove(0);
                debug!(id = %existing.id, "Found existing spreadsheet");
                existing
            }
            count => {
                return Err(AppError::AmbiguousTitle {
                    title: title.to_string(),
                    count,
                });
            }
        };

        self.write_header(&target, description, row).await?;
        self.store.fetch_spreadsheet(&target.id).await
    }

    /// Overwrite the header block: the description in `A1` and one key
    /// name per column across row 2, in whatever order the row yields
    /// its fields.
    pub async fn write_header(
        &self,
        handle: &SpreadsheetHandle,
        description: &str,
        row: &Row,
    ) -> Result<()> {
        let range = header_range(row.field_count());
        let values = vec![vec![Value::from(description)], row.header_cells()];

        self.store.update_values(&handle.id, &range, values).await
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MockStore;
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn sample_row() -> Row {
        [
            ("a", vec![json!(1)]),
            ("b", vec![json!(2)]),
            ("c", vec![json!(3)]),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_open_creates_missing_folder() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        assert_eq!(directory.folder().name, FOLDER_NAME);
        let state = store.state.lock().unwrap();
        assert_eq!(state.folder_lists, 1);
        assert_eq!(state.folder_creates, 1);
    }

    #[tokio::test]
    async fn test_open_reuses_existing_folder() {
        let store = MockStore::new().with_folder(FOLDER_NAME);
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        assert_eq!(directory.folder().id, "folder_1");
        let state = store.state.lock().unwrap();
        assert_eq!(state.folder_creates, 0);
    }

    #[tokio::test]
    async fn test_resolve_creates_when_absent() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let handle = directory
            .resolve("jobs", "nightly job runs", &sample_row())
            .await
            .unwrap();

        assert_eq!(handle.title, "jobs");
        assert!(handle.url.is_some());
        let state = store.state.lock().unwrap();
        assert_eq!(state.lookups, vec!["jobs".to_string()]);
        assert_eq!(state.creates, vec!["jobs".to_string()]);
        assert_eq!(state.header_writes.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_reuses_single_match_and_rewrites_header() {
        let store = MockStore::new().with_spreadsheet("jobs");
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let handle = directory
            .resolve("jobs", "nightly job runs", &sample_row())
            .await
            .unwrap();

        assert_eq!(handle.id, "sheet_1");
        let state = store.state.lock().unwrap();
        assert!(state.creates.is_empty());
        assert_eq!(state.header_writes.len(), 1);
        assert_eq!(state.header_writes[0].spreadsheet_id, "sheet_1");
    }

    #[tokio::test]
    async fn test_resolve_fails_on_ambiguous_title() {
        let store = MockStore::new()
            .with_spreadsheet("jobs")
            .with_spreadsheet("jobs");
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let err = directory
            .resolve("jobs", "nightly job runs", &sample_row())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::AmbiguousTitle { ref title, count: 2 } if title == "jobs"
        ));
        let state = store.state.lock().unwrap();
        assert!(state.header_writes.is_empty());
        assert!(state.creates.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_failure_is_not_cached() {
        let store = MockStore::new()
            .with_spreadsheet("jobs")
            .with_spreadsheet("jobs");
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let row = sample_row();
        assert!(directory.resolve("jobs", "d", &row).await.is_err());
        assert!(directory.resolve("jobs", "d", &row).await.is_err());

        // Both attempts went back to the remote store.
        let state = store.state.lock().unwrap();
        assert_eq!(state.lookups.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_remote_calls() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let row = sample_row();
        let first = directory.resolve("jobs", "d", &row).await.unwrap();

        let mut wider = sample_row();
        wider.push("d", json!(4));
        let second = directory.resolve("jobs", "d", &wider).await.unwrap();

        assert_eq!(first, second);
        let state = store.state.lock().unwrap();
        assert_eq!(state.lookups.len(), 1);
        // The wider key set did not trigger a second header write.
        assert_eq!(state.header_writes.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_caches_titles_independently() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        let row = sample_row();
        let jobs = directory.resolve("jobs", "d", &row).await.unwrap();
        let nodes = directory.resolve("nodes", "d", &row).await.unwrap();

        assert_ne!(jobs.id, nodes.id);
        let state = store.state.lock().unwrap();
        assert_eq!(state.lookups.len(), 2);
    }

    #[tokio::test]
    async fn test_write_header_block_shape() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        directory
            .resolve("jobs", "D", &sample_row())
            .await
            .unwrap();

        let state = store.state.lock().unwrap();
        let write = &state.header_writes[0];
        assert_eq!(write.range, "A1:C2");
        assert_eq!(write.values[0], vec![json!("D")]);

        let keys: HashSet<String> = write.values[1]
            .iter()
            .map(|cell| cell.as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            keys,
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[tokio::test]
    async fn test_write_header_empty_row() {
        let store = MockStore::new();
        let directory = ResourceDirectory::open(store.clone()).await.unwrap();

        directory.resolve("jobs", "D", &Row::new()).await.unwrap();

        let state = store.state.lock().unwrap();
        let write = &state.header_writes[0];
        assert_eq!(write.range, "A1:A2");
        assert!(write.values[1].is_empty());
    }
}
