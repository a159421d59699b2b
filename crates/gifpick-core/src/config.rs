//! Configuration types.
//!
//! `PickerConfig` is the immutable configuration a picker is built from. It can
//! be constructed in code or loaded from `config.toml`:
//!
//! ```text
//! ~/.config/gifpick/
//! └── config.toml
//! ```
//!
//! ```toml
//! api_key = "..."
//! limit = 24
//! rating = "pg"
//! empty_query = "clear"
//!
//! [keys]
//! "ctrl-w" = "dismiss"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Giphy's GIF API root. `trending` and `search` are resolved against it.
pub const DEFAULT_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/";

/// Placeholder shown in the empty search box.
pub const DEFAULT_PLACEHOLDER: &str = "Search for gifs";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "GIPHY_API_KEY";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "GIFPICK_CONFIG";

/// Keystroke -> action name overrides, e.g. `"ctrl-w" = "dismiss"`.
pub type KeyBindingConfig = BTreeMap<String, String>;

/// What the picker shows when the search box becomes empty.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyQueryPolicy {
    /// Re-run the trending query.
    #[default]
    Trending,
    /// Show nothing until the user types again.
    Clear,
}

// =============================================================================
// PickerConfig
// =============================================================================

/// Immutable picker configuration.
#[derive(Debug, Clone)]
pub struct PickerConfig {
    api_key: String,

    /// API root; always ends with `/`.
    pub endpoint: Url,

    /// Maximum results per query, forwarded as `limit=`.
    pub limit: Option<u32>,

    /// Content rating filter, forwarded as `rating=`.
    pub rating: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Behaviour when the search box is cleared.
    pub empty_query: EmptyQueryPolicy,

    /// Whether the picker is shown.
    pub visible: bool,

    /// Overlay (modal) layout instead of inline.
    pub modal: bool,

    /// Search box placeholder.
    pub placeholder: String,

    /// Key binding overrides.
    pub keys: KeyBindingConfig,
}

impl PickerConfig {
    /// Create a configuration with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            api_key,
            endpoint: parse_endpoint(DEFAULT_ENDPOINT)?,
            limit: None,
            rating: None,
            timeout: DEFAULT_TIMEOUT,
            empty_query: EmptyQueryPolicy::default(),
            visible: true,
            modal: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            keys: KeyBindingConfig::new(),
        })
    }

    /// Use a different API root (e.g. a proxy or a test server).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the empty-query policy.
    pub fn with_empty_query(mut self, policy: EmptyQueryPolicy) -> Self {
        self.empty_query = policy;
        self
    }

    /// The static API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build a configuration from a parsed file plus an optional env override.
    ///
    /// The env key wins over the file so secrets can stay out of dotfiles.
    pub fn from_file(file: ConfigFile, env_api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = env_api_key
            .filter(|k| !k.trim().is_empty())
            .or(file.api_key)
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key)?;
        if let Some(endpoint) = file.endpoint.as_deref() {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config.limit = file.limit;
        config.rating = file.rating.filter(|r| !r.trim().is_empty());
        config.empty_query = file.empty_query.unwrap_or_default();
        config.visible = file.visible.unwrap_or(true);
        config.modal = file.modal.unwrap_or(false);
        if let Some(placeholder) = file.placeholder {
            config.placeholder = placeholder;
        }
        config.keys = file.keys;

        Ok(config)
    }

    /// Load from the default config location and the environment.
    ///
    /// A missing config file is not an error as long as `GIPHY_API_KEY` is set.
    pub fn load() -> Result<Self, ConfigError> {
        let env_key = std::env::var(API_KEY_ENV).ok();

        let file = match config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                ConfigFile::load(&path)?
            }
            Some(path) => {
                tracing::info!("No config file at {}, using defaults", path.display());
                ConfigFile::default()
            }
            None => {
                tracing::warn!("No config directory available, using defaults");
                ConfigFile::default()
            }
        };

        Self::from_file(file, env_key)
    }
}

/// Parse an endpoint and normalise it so relative joins keep the last segment.
fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

// =============================================================================
// Config File
// =============================================================================

/// On-disk configuration (`config.toml`). Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub limit: Option<u32>,
    pub rating: Option<String>,
    pub timeout_secs: Option<u64>,
    pub empty_query: Option<EmptyQueryPolicy>,
    pub visible: Option<bool>,
    pub modal: Option<bool>,
    pub placeholder: Option<String>,
    #[serde(default)]
    pub keys: KeyBindingConfig,
}

impl ConfigFile {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, path)
    }

    /// Parse config file contents. `path` is only used for error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gifpick"))
}

/// Get the config file path (`GIFPICK_CONFIG` wins over the default).
pub fn config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => config_dir().map(|p| p.join("config.toml")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(matches!(
            PickerConfig::new("  "),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults() {
        let config = PickerConfig::new("key").unwrap();
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.empty_query, EmptyQueryPolicy::Trending);
        assert!(config.visible);
        assert!(!config.modal);
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_endpoint_normalisation() {
        let config = PickerConfig::new("key")
            .unwrap()
            .with_endpoint("http://localhost:8080/v1/gifs?x=1")
            .unwrap();
        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/v1/gifs/");
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        let result = PickerConfig::new("key")
            .unwrap()
            .with_endpoint("ftp://example.com/gifs/");
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));

        let result = PickerConfig::new("key").unwrap().with_endpoint("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_from_file() {
        let file = ConfigFile::parse(
            r#"
            api_key = "file-key"
            limit = 12
            rating = "pg"
            timeout_secs = 3
            empty_query = "clear"
            modal = true

            [keys]
            "ctrl-w" = "dismiss"
            "#,
            Path::new("config.toml"),
        )
        .unwrap();

        let config = PickerConfig::from_file(file, None).unwrap();
        assert_eq!(config.api_key(), "file-key");
        assert_eq!(config.limit, Some(12));
        assert_eq!(config.rating.as_deref(), Some("pg"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.empty_query, EmptyQueryPolicy::Clear);
        assert!(config.modal);
        assert!(config.visible);
        assert_eq!(config.keys.get("ctrl-w").map(String::as_str), Some("dismiss"));
    }

    #[test]
    fn test_env_key_overrides_file() {
        let file = ConfigFile {
            api_key: Some("file-key".to_string()),
            ..Default::default()
        };
        let config = PickerConfig::from_file(file.clone(), Some("env-key".to_string())).unwrap();
        assert_eq!(config.api_key(), "env-key");

        // Blank env values are ignored
        let config = PickerConfig::from_file(file, Some(String::new())).unwrap();
        assert_eq!(config.api_key(), "file-key");
    }

    #[test]
    fn test_missing_key() {
        let result = PickerConfig::from_file(ConfigFile::default(), None);
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let result = ConfigFile::parse("api_kee = \"typo\"", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"disk-key\"\nplaceholder = \"Find a reaction\"").unwrap();

        let parsed = ConfigFile::load(file.path()).unwrap();
        let config = PickerConfig::from_file(parsed, None).unwrap();
        assert_eq!(config.api_key(), "disk-key");
        assert_eq!(config.placeholder, "Find a reaction");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigFile::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
