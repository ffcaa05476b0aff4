use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A flat mapping of preference keys to selected option values.
///
/// Keys are lowercase snake_case identifiers (e.g. `package_manager`),
/// values are lowercase option tokens (e.g. `uv`). The set is built once
/// per run, either from the interactive survey or from a JSON file, and
/// is not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    entries: BTreeMap<String, String>,
}

impl ResponseSet {
    /// Creates an empty response set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a preference, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value selected for a preference key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of recorded preferences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no preferences have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a response set from a JSON object file.
    ///
    /// Scalar values (numbers, booleans) are coerced to their string
    /// form; nested objects and arrays are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or is not a flat JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| Error::invalid_responses(path, e.to_string()))?;

        let serde_json::Value::Object(map) = value else {
            return Err(Error::invalid_responses(
                path,
                "expected a JSON object mapping preference keys to values",
            ));
        };

        let mut responses = Self::new();
        for (key, value) in map {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::invalid_responses(
                        path,
                        format!("key '{key}' has unsupported nested value: {other}"),
                    ));
                }
            };
            responses.insert(key, value);
        }

        info!(
            "Loaded {} responses from {}",
            responses.len(),
            path.display()
        );
        Ok(responses)
    }

    /// Saves the response set as pretty-printed JSON for reuse.
    ///
    /// Parent directories are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

impl FromIterator<(String, String)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_insert_and_get() {
        let mut responses = ResponseSet::new();
        responses.insert("package_manager", "uv");

        assert_eq!(responses.get("package_manager"), Some("uv"));
        assert_eq!(responses.get("linter"), None);
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn test_load_valid_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("copilot_config.json");
        config
            .write_str(r#"{"package_manager": "uv", "linter": "ruff"}"#)
            .unwrap();

        let responses = ResponseSet::load(config.path()).unwrap();
        assert_eq!(responses.get("package_manager"), Some("uv"));
        assert_eq!(responses.get("linter"), Some("ruff"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ResponseSet::load(Path::new("/nonexistent/copilot_config.json"));
        assert!(result.is_err());
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("broken.json");
        config.write_str("{not json").unwrap();

        let result = ResponseSet::load(config.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_non_object() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("list.json");
        config.write_str(r#"["uv", "pip"]"#).unwrap();

        let result = ResponseSet::load(config.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JSON object"));
    }

    #[test]
    fn test_load_coerces_scalars() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("scalars.json");
        config
            .write_str(r#"{"max_line_length": 88, "strict": true}"#)
            .unwrap();

        let responses = ResponseSet::load(config.path()).unwrap();
        assert_eq!(responses.get("max_line_length"), Some("88"));
        assert_eq!(responses.get("strict"), Some("true"));
    }

    #[test]
    fn test_load_rejects_nested_values() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("nested.json");
        config
            .write_str(r#"{"package_manager": {"name": "uv"}}"#)
            .unwrap();

        let result = ResponseSet::load(config.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("out/copilot_config.json");

        let mut responses = ResponseSet::new();
        responses.insert("package_manager", "pip");
        responses.insert("type_checker", "mypy");
        responses.save(config.path()).unwrap();

        let reloaded = ResponseSet::load(config.path()).unwrap();
        assert_eq!(reloaded, responses);
    }
}
