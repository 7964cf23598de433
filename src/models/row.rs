use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One logical record destined for a topic spreadsheet: field names mapped
/// to sequences of values.
///
/// Field order is not stable between calls; the header row is derived from
/// whatever order the map yields at write time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    fields: HashMap<String, Vec<Value>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, creating the field if new.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields, which is also the width of the header row.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn values(&self, key: &str) -> Option<&[Value]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    /// Field names rendered as cell values for the header row.
    pub fn header_cells(&self) -> Vec<Value> {
        self.fields.keys().cloned().map(Value::from).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Value>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Value>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, values)| (key.into(), values))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_push_appends_to_existing_field() {
        let mut row = Row::new();
        row.push("pods", json!(3));
        row.push("pods", json!(5));
        row.push("node", "worker-1");

        assert_eq!(row.field_count(), 2);
        assert_eq!(row.values("pods"), Some(&[json!(3), json!(5)][..]));
        assert_eq!(row.values("node"), Some(&[json!("worker-1")][..]));
    }

    #[test]
    fn test_header_cells_cover_every_field_once() {
        let row: Row = [
            ("a", vec![json!(1)]),
            ("b", vec![json!(2)]),
            ("c", vec![json!(3)]),
        ]
        .into_iter()
        .collect();

        let header: HashSet<String> = row
            .header_cells()
            .into_iter()
            .map(|cell| cell.as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            header,
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_empty_row() {
        let row = Row::new();
        assert!(row.is_empty());
        assert_eq!(row.field_count(), 0);
        assert!(row.header_cells().is_empty());
    }
}
