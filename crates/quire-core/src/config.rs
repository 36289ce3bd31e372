//! Configuration for archive access.
//!
//! Settings are stored in TOML and can be overridden through environment
//! variables.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Defaults**: built into [`Config::default`]
//! 2. **Config file**: `<config_dir>/config.toml`
//! 3. **Environment variables**: `QUIRE_HEAD_URL`, `QUIRE_DATA_DIR`
//!
//! `QUIRE_CONFIG_DIR` relocates the config directory itself.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [source]
//! head_url = "https://vorks-dev.github.io/blog/assets/articles.json"
//!
//! [cache]
//! root = "/home/user/.local/share/quire"
//! persist = true
//!
//! [fetch]
//! timeout_secs = 30
//! ```
//!
//! ```rust
//! use quire_core::Config;
//!
//! let config: Config = toml::from_str("[source]\nhead_url = \"https://example.com/articles.json\"")?;
//! assert!(config.cache.persist);
//! assert_eq!(config.fetch.timeout_secs, 30);
//! # Ok::<(), toml::de::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "QUIRE_CONFIG_DIR";
/// Environment variable overriding the cache root.
pub const DATA_DIR_ENV: &str = "QUIRE_DATA_DIR";
/// Environment variable overriding the head page location.
pub const HEAD_URL_ENV: &str = "QUIRE_HEAD_URL";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the archive lives.
    pub source: SourceConfig,
    /// Page cache settings.
    pub cache: CacheConfig,
    /// HTTP client settings.
    pub fetch: FetchConfig,
}

/// Location of the archive's head page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL or filesystem path of the newest page.
    pub head_url: Option<String>,
}

/// Page cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the durable tier.
    ///
    /// Default locations:
    /// - Linux: `~/.local/share/quire`
    /// - macOS: `~/Library/Application Support/dev.vorks.quire`
    /// - Windows: `%APPDATA%\vorks\quire\data`
    pub root: PathBuf,

    /// Keep fetched pages across runs.
    ///
    /// When disabled every run starts from an empty cache.
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_data_dir(),
            persist: true,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Custom `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply environment overrides.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    /// Apply `QUIRE_HEAD_URL` and `QUIRE_DATA_DIR` when set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(HEAD_URL_ENV).ok(),
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        )
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }

    /// Replace the head location and cache root when overrides are present.
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, head_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(head) = head_url.filter(|h| !h.trim().is_empty()) {
            self.source.head_url = Some(head.trim().to_string());
        }
        if let Some(root) = data_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.cache.root = root;
        }
        self
    }

    /// Check values that would otherwise fail later.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(Error::Config("fetch.timeout_secs must be positive".into()));
        }
        if let Some(head) = &self.source.head_url {
            parse_location(head)
                .map_err(|e| Error::Config(format!("Invalid source.head_url: {e}")))?;
        }
        Ok(())
    }

    /// Resolved head page URL.
    pub fn head_url(&self) -> Result<Url> {
        let head = self.source.head_url.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "No head page configured; set source.head_url or {HEAD_URL_ENV}"
            ))
        })?;
        parse_location(head)
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Configuration directory, honoring `QUIRE_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        directories::ProjectDirs::from("dev", "vorks", "quire")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "vorks", "quire").map_or_else(
        || {
            directories::BaseDirs::new().map_or_else(
                || PathBuf::from(".quire"),
                |base| base.home_dir().join(".quire"),
            )
        },
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Interpret `location` as an `http(s)`/`file` URL or, failing that, a filesystem path.
///
/// Relative paths are resolved against the current directory.
pub fn parse_location(location: &str) -> Result<Url> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty location".into()));
    }

    if let Ok(url) = Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            return Ok(url);
        }
    }

    let path = PathBuf::from(trimmed);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    Url::from_file_path(&absolute)
        .map_err(|()| Error::InvalidUrl(format!("Cannot use '{trimmed}' as a page location")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.source.head_url.is_none());
        assert!(config.cache.persist);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetch]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert!(config.cache.persist);
        assert_eq!(config.cache.root, CacheConfig::default().root);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.source.head_url = Some("https://example.com/blog/articles.json".into());
        config.cache.root = temp.path().join("data");
        config.cache.persist = false;
        config.fetch.user_agent = Some("test-agent".into());

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        fs::write(&path, "[fetch]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));

        fs::write(&path, "[source\nhead_url = 1").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some(" https://example.com/a.json ".into()),
            Some(PathBuf::from("/tmp/quire-cache")),
        );
        assert_eq!(
            config.source.head_url.as_deref(),
            Some("https://example.com/a.json")
        );
        assert_eq!(config.cache.root, PathBuf::from("/tmp/quire-cache"));

        let untouched = config
            .clone()
            .with_overrides(Some("   ".into()), Some(PathBuf::new()));
        assert_eq!(untouched, config);
    }

    #[test]
    fn test_head_url_required() {
        let err = Config::default().head_url().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_location() {
        let url = parse_location("https://example.com/blog/articles.json").unwrap();
        assert_eq!(url.scheme(), "https");

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("articles.json");
        let url = parse_location(file.to_str().unwrap()).unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.to_file_path().unwrap(), file);

        let relative = parse_location("site/articles.json").unwrap();
        assert_eq!(relative.scheme(), "file");
        assert!(relative.path().ends_with("/site/articles.json"));

        assert!(parse_location("  ").is_err());
    }
}
