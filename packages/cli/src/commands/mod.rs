pub mod list;
pub mod run;

pub use list::{list, ListArgs};
pub use run::{run, RunArgs};

use anyhow::{Context, Result};
use folio_editor::EditorConfig;
use std::path::Path;

/// Load an explicit config file, or `folio.config.json` from `cwd` when present
pub fn load_config(path: Option<&Path>, cwd: &str) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => EditorConfig::load_from_dir(cwd)
            .with_context(|| format!("Failed to load config from {}", cwd)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_default_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, &dir.path().display().to_string()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_config(Some(&missing), ".").is_err());
    }
}
