use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cleaner::engine::CleanMode;
use crate::cleaner::finder::MatchStrategy;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "PODCLEAN_CONFIG";

/// Global podclean configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default clean mode
    #[serde(default = "default_clean_mode")]
    pub default_mode: CleanMode,

    /// How enumerated entries are matched against used paths
    #[serde(default)]
    pub match_strategy: MatchStrategy,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Show a progress bar while deleting
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_clean_mode() -> CleanMode {
    CleanMode::Delete
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: default_clean_mode(),
            match_strategy: MatchStrategy::default(),
            output_format: OutputFormat::Human,
            show_progress: default_true(),
        }
    }
}

impl Config {
    /// Get the podclean config directory (<config dir>/podclean)
    pub fn data_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("podclean")
    }

    /// Get the config file path, honoring `PODCLEAN_CONFIG`
    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => Self::data_dir().join("config.toml"),
        }
    }

    /// Load config from file, or use defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_mode, CleanMode::Delete);
        assert_eq!(config.match_strategy, MatchStrategy::Substring);
        assert_eq!(config.output_format, OutputFormat::Human);
        assert!(config.show_progress);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_mode, CleanMode::Delete);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "match_strategy = \"segment\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.match_strategy, MatchStrategy::Segment);
        assert_eq!(config.default_mode, CleanMode::Delete);
        assert!(config.show_progress);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_mode = \"shred\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = Config {
            default_mode: CleanMode::DryRun,
            match_strategy: MatchStrategy::Segment,
            output_format: OutputFormat::Json,
            show_progress: false,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_mode, CleanMode::DryRun);
        assert_eq!(loaded.match_strategy, MatchStrategy::Segment);
        assert_eq!(loaded.output_format, OutputFormat::Json);
        assert!(!loaded.show_progress);
    }
}
