//! Configuration file parser for ~/.config/hnreader/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though a warning is logged for each
//! one since it is usually a typo.
use crate::comments::ReplyPlacement;
use serde::Deserialize;
use std::collections::HashMap;
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

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the read API, without a trailing slash.
    pub api_base_url: String,

    /// Seconds between automatic story list refreshes.
    pub refresh_interval_secs: u64,

    /// Stories shown per ordering.
    pub story_count: usize,

    /// Comments shown in the newest-comments feed.
    pub comment_feed_count: usize,

    /// Upper bound on item requests in flight at once.
    pub max_concurrent_requests: usize,

    /// Comment levels resolved below a story. Deeper replies are counted but
    /// not fetched.
    pub max_comment_depth: usize,

    pub request_timeout_secs: u64,

    /// Author used for local comments submitted with an empty name.
    pub default_author: String,

    pub reply_placement: ReplyPlacement,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_interval_secs: 30,
            story_count: 10,
            comment_feed_count: 20,
            max_concurrent_requests: 8,
            max_comment_depth: 32,
            request_timeout_secs: 30,
            default_author: "Anonymous".to_string(),
            reply_placement: ReplyPlacement::Nested,
            theme: "dark".to_string(),
            keybindings: HashMap::new(),
        }
    }
}

const KNOWN_KEYS: [&str; 11] = [
    "api_base_url",
    "refresh_interval_secs",
    "story_count",
    "comment_feed_count",
    "max_concurrent_requests",
    "max_comment_depth",
    "request_timeout_secs",
    "default_author",
    "reply_placement",
    "theme",
    "keybindings",
];

/// Deepest comment level that will ever be resolved.
const MAX_COMMENT_DEPTH_LIMIT: usize = 128;

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Out-of-range numbers → clamped, logged as warning
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
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        let config = config.normalized();
        tracing::info!(
            api_base_url = %config.api_base_url,
            theme = %config.theme,
            placement = ?config.reply_placement,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Clamps values that would stall the app (zero periods, zero
    /// concurrency) or recurse without bound.
    pub fn normalized(mut self) -> Self {
        fn at_least_one<T: PartialOrd + From<u8> + Copy>(name: &str, value: &mut T) {
            if *value < T::from(1) {
                tracing::warn!(key = name, "Config value must be at least 1, using 1");
                *value = T::from(1);
            }
        }

        at_least_one("refresh_interval_secs", &mut self.refresh_interval_secs);
        at_least_one("story_count", &mut self.story_count);
        at_least_one("comment_feed_count", &mut self.comment_feed_count);
        at_least_one("max_concurrent_requests", &mut self.max_concurrent_requests);
        at_least_one("max_comment_depth", &mut self.max_comment_depth);
        at_least_one("request_timeout_secs", &mut self.request_timeout_secs);

        if self.max_comment_depth > MAX_COMMENT_DEPTH_LIMIT {
            tracing::warn!(
                requested = self.max_comment_depth,
                limit = MAX_COMMENT_DEPTH_LIMIT,
                "max_comment_depth too large, clamping"
            );
            self.max_comment_depth = MAX_COMMENT_DEPTH_LIMIT;
        }
        if self.default_author.trim().is_empty() {
            self.default_author = "Anonymous".to_string();
        }
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
