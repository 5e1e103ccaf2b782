//! Process configuration: optional TOML file plus environment overrides.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
//! `HOST`, `PORT` and `POSTS_REQUEST_LIMIT` from the environment win over the file.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level service configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host name used when formatting self links in generated feeds.
    pub host: String,

    /// Listening port, also used in self links.
    pub port: u16,

    /// Address the HTTP listener binds to.
    pub bind_address: String,

    /// `limit` sent with every listing request.
    pub posts_request_limit: u32,

    /// Upstream origin; listings live under `{reddit_base_url}/r/{subreddit}`.
    pub reddit_base_url: String,

    /// Subreddit served by the `/haiku` route.
    pub haiku_subreddit: String,

    /// Channel title of the `/haiku` RSS feed.
    pub haiku_title: String,

    /// Externally visible base URL. Overrides `http://{host}:{port}` in self links.
    pub public_url: Option<String>,

    /// Upper bound on a single upstream fetch, in seconds.
    pub request_timeout_secs: u64,

    /// Upstream bodies larger than this are rejected.
    pub max_listing_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "dev.home.lan".to_string(),
            port: 3234,
            bind_address: "0.0.0.0".to_string(),
            posts_request_limit: 50,
            reddit_base_url: "https://www.reddit.com".to_string(),
            haiku_subreddit: "youtubehaiku".to_string(),
            haiku_title: "Youtube Haiku".to_string(),
            public_url: None,
            request_timeout_secs: 30,
            max_listing_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "host",
        "port",
        "bind_address",
        "posts_request_limit",
        "reddit_base_url",
        "haiku_subreddit",
        "haiku_title",
        "public_url",
        "request_timeout_secs",
        "max_listing_bytes",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), port = config.port, "Loaded configuration");
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `POSTS_REQUEST_LIMIT` from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Numeric values that fail to parse are logged and skipped, leaving the
    /// previous value in place.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(value = %port, error = %e, "Ignoring invalid PORT"),
            }
        }
        if let Some(limit) = lookup("POSTS_REQUEST_LIMIT") {
            match limit.trim().parse() {
                Ok(limit) => self.posts_request_limit = limit,
                Err(e) => {
                    tracing::warn!(value = %limit, error = %e, "Ignoring invalid POSTS_REQUEST_LIMIT");
                }
            }
        }
        self
    }

    /// Base URL used for self links in generated feeds, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match self.public_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.host, self.port),
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "dev.home.lan");
        assert_eq!(config.port, 3234);
        assert_eq!(config.posts_request_limit, 50);
        assert_eq!(config.reddit_base_url, "https://www.reddit.com");
        assert_eq!(config.haiku_subreddit, "youtubehaiku");
        assert!(config.public_url.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/subfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.port, 3234);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let dir = std::env::temp_dir().join("subfeed_config_test_whitespace");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n  \n  ").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.posts_request_limit, 50);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("subfeed_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "posts_request_limit = 25\nunknown_key = 1\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.posts_request_limit, 25);
        assert_eq!(config.port, 3234); // default
        assert_eq!(config.haiku_title, "Youtube Haiku"); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("subfeed_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("subfeed_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            posts_request_limit: 10,
            ..Config::default()
        }
        .apply_env_from(env(&[
            ("HOST", "feeds.example.com"),
            ("PORT", "8080"),
            ("POSTS_REQUEST_LIMIT", "100"),
        ]));

        assert_eq!(config.host, "feeds.example.com");
        assert_eq!(config.port, 8080);
        assert_eq!(config.posts_request_limit, 100);
    }

    #[test]
    fn test_invalid_env_numbers_are_ignored() {
        let config = Config::default()
            .apply_env_from(env(&[("PORT", "http"), ("POSTS_REQUEST_LIMIT", "-3")]));
        assert_eq!(config.port, 3234);
        assert_eq!(config.posts_request_limit, 50);
    }

    #[test]
    fn test_public_base_url_formats_host_and_port() {
        let config = Config::default();
        assert_eq!(config.public_base_url(), "http://dev.home.lan:3234");

        let config = Config {
            public_url: Some("https://feeds.example.com/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.public_base_url(), "https://feeds.example.com");
    }
}
