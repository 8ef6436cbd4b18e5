// ============================================================
// Layer 6 — Notebook Store
// ============================================================
// Reads and rewrites .ipynb files in place.
//
// Notebooks are plain JSON. They are parsed into an untyped
// serde_json::Value (key order preserved, numbers kept as their
// source text) so that fields this tool knows nothing about
// survive the round trip untouched.
// Output uses 2-space indentation and no trailing newline.

use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub struct NotebookStore {
    path: PathBuf,
}

impl NotebookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Value> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read notebook '{}'", self.path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("'{}' is not valid JSON", self.path.display()))
    }

    pub fn save(&self, notebook: &Value) -> Result<()> {
        // to_string_pretty indents with two spaces
        let text = serde_json::to_string_pretty(notebook)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Cannot write notebook '{}'", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_key_order_and_uses_two_spaces() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nb.ipynb");
        fs::write(&path, r#"{"z": 1, "a": {"y": [1, 2], "b": "é"}}"#).unwrap();

        let store = NotebookStore::new(&path);
        let nb = store.load().unwrap();
        store.save(&nb).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"z\": 1,\n  \"a\": {\n    \"y\": [\n      1,\n      2\n    ],\n    \"b\": \"é\"\n  }\n}"
        );
    }

    #[test]
    fn test_numbers_are_written_back_exactly() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ids.ipynb");
        fs::write(
            &path,
            r#"{"metadata":{"widgets":{}},"id":123456789012345678901234567890,"t":0.1}"#,
        )
        .unwrap();

        let store = NotebookStore::new(&path);
        let nb = store.load().unwrap();
        store.save(&nb).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"id\": 123456789012345678901234567890"));
        assert!(written.contains("\"t\": 0.1"));
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.ipynb");
        fs::write(&path, "{not json").unwrap();

        let err = NotebookStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("broken.ipynb"));
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = NotebookStore::new(tmp.path().join("absent.ipynb"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("Cannot read notebook"));
    }
}
