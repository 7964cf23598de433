use serde::{Deserialize, Serialize};

/// The Drive folder acting as the namespace for all managed spreadsheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderHandle {
    pub id: String,
    pub name: String,
}

/// A resolved spreadsheet inside the namespace folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpreadsheetHandle {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_serialization() {
        let handle = SpreadsheetHandle {
            id: "s1".to_string(),
            title: "jobs".to_string(),
            url: None,
        };
        let json = serde_json::to_string(&handle).unwrap();
        let deserialized: SpreadsheetHandle = serde_json::from_str(&json).unwrap();

        assert_eq!(handle, deserialized);
    }
}
