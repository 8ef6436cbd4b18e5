// ============================================================
// Layer 3 — Notebook Metadata
// ============================================================
// Some notebook environments store interactive widget state
// under the top-level `metadata.widgets` key. Renderers that do
// not understand the embedded state refuse to display the
// notebook, so the fixer removes it.
//
// Only that one key is touched; every other key keeps its
// value and its position.

use serde_json::Value;
use thiserror::Error;

/// Key removed from the top-level `metadata` object
pub const WIDGETS_KEY: &str = "widgets";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotebookError {
    #[error("notebook root is not a JSON object")]
    RootNotObject,

    #[error("notebook has no top-level 'metadata' key")]
    MissingMetadata,

    #[error("notebook 'metadata' is not a JSON object")]
    MetadataNotObject,
}

/// Remove `metadata.widgets` from a parsed notebook.
///
/// Returns `Ok(true)` when the key was present and removed,
/// `Ok(false)` when there was nothing to remove.
pub fn strip_widget_metadata(notebook: &mut Value) -> Result<bool, NotebookError> {
    let root = notebook.as_object_mut().ok_or(NotebookError::RootNotObject)?;
    let metadata = root
        .get_mut("metadata")
        .ok_or(NotebookError::MissingMetadata)?
        .as_object_mut()
        .ok_or(NotebookError::MetadataNotObject)?;

    // shift_remove keeps the order of the remaining keys
    Ok(metadata.shift_remove(WIDGETS_KEY).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_removes_widgets_and_keeps_other_keys() {
        let mut nb = json!({
            "cells": [],
            "metadata": {
                "kernelspec": {"name": "python3"},
                "widgets": {"application/vnd.jupyter.widget-state+json": {}},
                "language_info": {"name": "python"}
            },
            "nbformat": 4
        });

        assert_eq!(strip_widget_metadata(&mut nb), Ok(true));

        let keys: Vec<&str> = nb["metadata"]
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["kernelspec", "language_info"]);
        assert_eq!(nb["nbformat"], json!(4));
    }

    #[test]
    fn test_no_widgets_is_a_no_op() {
        let mut nb = json!({"metadata": {"kernelspec": {}}});
        let before = nb.clone();
        assert_eq!(strip_widget_metadata(&mut nb), Ok(false));
        assert_eq!(nb, before);
    }

    #[test]
    fn test_nested_widgets_key_is_left_alone() {
        let mut nb = json!({"metadata": {"kernelspec": {"widgets": 1}}});
        assert_eq!(strip_widget_metadata(&mut nb), Ok(false));
        assert_eq!(nb["metadata"]["kernelspec"]["widgets"], json!(1));
    }

    #[test]
    fn test_missing_metadata() {
        let mut nb = json!({"cells": []});
        assert_eq!(strip_widget_metadata(&mut nb), Err(NotebookError::MissingMetadata));
    }

    #[test]
    fn test_metadata_must_be_object() {
        let mut nb = json!({"metadata": []});
        assert_eq!(strip_widget_metadata(&mut nb), Err(NotebookError::MetadataNotObject));
    }

    #[test]
    fn test_root_must_be_object() {
        let mut nb = json!([1, 2]);
        assert_eq!(strip_widget_metadata(&mut nb), Err(NotebookError::RootNotObject));
    }
}
