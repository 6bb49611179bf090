use pagecraft_editor::{Viewport, DEFAULT_MAX_LEVELS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per page
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Undo levels kept per editing session (at least 1)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Viewport used by `show` when none is given
    #[serde(default)]
    pub default_viewport: Viewport,
}

fn default_store_dir() -> String {
    "pages".to_string()
}

fn default_history_depth() -> usize {
    DEFAULT_MAX_LEVELS
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            anyhow::ensure!(
                config.history_depth > 0,
                "{}: historyDepth must be at least 1",
                config_path.display()
            );
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the page store
    pub fn get_store_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            history_depth: default_history_depth(),
            default_viewport: Viewport::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "content/pages",
            "historyDepth": 20,
            "defaultViewport": "mobile"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "content/pages");
        assert_eq!(config.history_depth, 20);
        assert_eq!(config.default_viewport, Viewport::Mobile);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{ "historyDepth": 5 }"#).unwrap();
        assert_eq!(config.store_dir, "pages");
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.default_viewport, Viewport::Desktop);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "storeDir": "site" }"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_store_dir(dir.path()), dir.path().join("site"));
    }

    #[test]
    fn test_zero_history_depth_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "historyDepth": 0 }"#).unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("historyDepth must be at least 1"));
    }
}
