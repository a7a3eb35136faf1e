use crate::ConfigError;
use folio_model::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Include the built-in `commands` and `editable` extensions
    #[serde(default = "default_true")]
    pub enable_core_extensions: bool,

    /// When false, commits that change the document are rejected
    #[serde(default = "default_true")]
    pub editable: bool,

    /// Initial document (defaults to one empty paragraph)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Document>,

    /// Per-extension option overrides, keyed by extension name
    #[serde(default)]
    pub extension_options: BTreeMap<String, Value>,
}

fn default_true() -> bool {
    true
}

impl EditorConfig {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load `folio.config.json` from a directory, or the defaults if absent
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_content(mut self, content: Document) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_extension_options(mut self, name: impl Into<String>, options: Value) -> Self {
        self.extension_options.insert(name.into(), options);
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            enable_core_extensions: true,
            editable: true,
            content: None,
            extension_options: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "enableCoreExtensions": false,
            "extensionOptions": {
                "heading": { "levels": [1, 2] }
            }
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        assert!(!config.enable_core_extensions);
        assert!(config.editable);
        assert!(config.content.is_none());
        assert_eq!(
            config.extension_options["heading"]["levels"],
            serde_json::json!([1, 2])
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_config_with_content() {
        let json = r#"{
            "content": {
                "root": {
                    "type": "element",
                    "id": "doc",
                    "tag": "doc",
                    "children": [
                        { "type": "text", "id": "t-1", "text": "Hi" }
                    ]
                }
            }
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        let content = config.content.unwrap();
        assert_eq!(content.text_content(), "Hi");
    }

    #[test]
    fn test_load_from_dir_without_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_dir_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "editable": false }"#).unwrap();

        let config = EditorConfig::load_from_dir(dir.path()).unwrap();
        assert!(!config.editable);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
