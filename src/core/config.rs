//! Runtime configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (explicit `--config` path or the default location under the user config
//! directory), then environment variables. CLI flags are applied last by the
//! app shell. Values are validated once after merging.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file '{path}' could not be read: {message}")]
    Read { path: String, message: String },
    #[error("Configuration file '{path}' is not valid TOML: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AppConfig {
    /// GitHub personal access token, empty means unauthenticated requests
    pub github_token: Option<String>,
    /// Anthropic API key for the analysis client
    pub claude_api_key: Option<String>,
    pub github_api_url: String,
    pub claude_api_url: String,
    pub model: String,
    /// Concurrent file-analysis workers per scan
    pub analysis_workers: usize,
    /// Capacity of the traversal-to-analysis channel
    pub unit_capacity: usize,
    /// Files larger than this many bytes are skipped, not analyzed
    pub max_content_bytes: usize,
    /// Timeout applied to each outbound HTTP call
    pub request_timeout_secs: u64,
    /// Overall deadline for a single scan
    pub scan_deadline_secs: u64,
    /// Capacity of the scan submission channel
    pub executor_capacity: usize,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            claude_api_key: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            claude_api_url: DEFAULT_CLAUDE_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            analysis_workers: 4,
            unit_capacity: 32,
            max_content_bytes: 1024 * 1024,
            request_timeout_secs: 120,
            scan_deadline_secs: 1800,
            executor_capacity: 64,
            log_level: None,
            log_format: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// An explicitly given path must exist; the default path is only used
    /// when present. Environment variables override file values.
    pub async fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Read {
                        path: path.display().to_string(),
                        message: "file does not exist".to_string(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Some(path),
                _ => None,
            },
        };

        let mut config = match config_path {
            Some(path) => Self::from_file(&path).await?,
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Default config file location under the user config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Repoaudit").join("repoaudit.toml"))
    }

    async fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides. Token variables follow the
    /// conventional names (`GITHUB_PAT`, `CLAUDE_API_KEY`, `CLAUDE_API_URL`).
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("GITHUB_PAT") {
            if !token.is_empty() {
                self.github_token = Some(token);
            }
        }
        if let Ok(key) = std::env::var("CLAUDE_API_KEY") {
            if !key.is_empty() {
                self.claude_api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("CLAUDE_API_URL") {
            if !url.is_empty() {
                self.claude_api_url = url;
            }
        }
        if let Ok(level) = std::env::var("REPOAUDIT_LOG_LEVEL") {
            if !level.is_empty() {
                self.log_level = Some(level);
            }
        }
    }

    /// Validate merged values, returning an actionable message on failure
    pub fn validate(&self) -> ConfigResult<()> {
        fn positive(name: &str, value: usize) -> ConfigResult<()> {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    message: format!("'{}' must be greater than 0", name),
                });
            }
            Ok(())
        }

        positive("analysis-workers", self.analysis_workers)?;
        positive("unit-capacity", self.unit_capacity)?;
        positive("max-content-bytes", self.max_content_bytes)?;
        positive("executor-capacity", self.executor_capacity)?;
        positive("request-timeout-secs", self.request_timeout_secs as usize)?;
        positive("scan-deadline-secs", self.scan_deadline_secs as usize)?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "'model' cannot be empty".to_string(),
            });
        }
        for (name, url) in [
            ("github-api-url", &self.github_api_url),
            ("claude-api-url", &self.claude_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    message: format!("'{}' must be an http(s) URL, got '{}'", name, url),
                });
            }
        }

        Ok(())
    }
}
