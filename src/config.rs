//! Configuration for snapname runs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Application configuration, loaded from disk and overridden by CLI flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapNameConfig {
    /// Directory searched for screenshots (`~` is expanded)
    pub screenshot_dir: String,
    /// Filename prefix a screenshot must start with
    pub prefix: String,
    /// Extension a screenshot must end with (without the dot)
    pub extension: String,
    /// Chat-completion endpoint (OpenRouter-compatible)
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Environment variable holding the bearer credential
    pub api_key_env: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Whether to send the screenshot itself to the model
    pub attach_image: bool,
    /// Upper bound on kept suggestions
    pub max_candidates: usize,
    /// Encoder binary, looked up on PATH
    pub encoder: String,
    /// Encoder quality (0-100)
    pub quality: u8,
    /// Extension of the converted file (without the dot)
    pub output_extension: String,
    /// Replace an existing output file instead of refusing
    pub overwrite: bool,
}

impl SnapNameConfig {
    /// Name of the config file inside the snapname config directory
    pub const FILE_NAME: &'static str = "config.json";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snapname").join(Self::FILE_NAME))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file yields defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    log::warn!("Could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Screenshot directory with a leading `~` expanded
    pub fn screenshot_dir(&self) -> PathBuf {
        expand_home(&self.screenshot_dir)
    }

    /// Reject values no stage could work with
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(Error::Config(format!(
                "quality must be between 0 and 100, got {}",
                self.quality
            )));
        }
        if self.max_candidates == 0 {
            return Err(Error::Config("max_candidates must be at least 1".into()));
        }
        if self.prefix.is_empty() && self.extension.is_empty() {
            return Err(Error::Config("prefix and extension cannot both be empty".into()));
        }
        if self.encoder.trim().is_empty() {
            return Err(Error::Config("encoder cannot be empty".into()));
        }
        Ok(())
    }
}

impl Default for SnapNameConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: "~/Downloads/".to_string(),
            prefix: "SCR-".to_string(),
            extension: "png".to_string(),
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "google/gemma-3-27b-it:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 30,
            attach_image: true,
            max_candidates: 4,
            encoder: "cwebp".to_string(),
            quality: 80,
            output_extension: "webp".to_string(),
            // Refuse to clobber an existing file unless asked
            overwrite: false,
        }
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_screenshot_workflow() {
        let config = SnapNameConfig::default();
        assert_eq!(config.prefix, "SCR-");
        assert_eq!(config.extension, "png");
        assert_eq!(config.quality, 80);
        assert_eq!(config.output_extension, "webp");
        assert!(!config.overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SnapNameConfig::from_json(r#"{ "quality": 65, "model": "openai/gpt-4o-mini" }"#)
                .unwrap();
        assert_eq!(config.quality, 65);
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.prefix, "SCR-");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SnapNameConfig::load(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(config, SnapNameConfig::default());
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = SnapNameConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "screenshot_dir": "/srv/shots", "overwrite": true }"#).unwrap();
        let config = SnapNameConfig::load(Some(&path)).unwrap();
        assert_eq!(config.screenshot_dir(), PathBuf::from("/srv/shots"));
        assert!(config.overwrite);
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let config = SnapNameConfig {
            quality: 101,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Downloads/"), home.join("Downloads/"));
            assert_eq!(expand_home("~"), home);
        }
    }
}
