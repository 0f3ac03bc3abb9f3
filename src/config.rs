//! Site configuration loaded from `labsite.toml`.
//!
//! Every field has a default, so a missing config file yields a working
//! (if empty) site. Relative paths are resolved against the directory of
//! the config file. `LABSITE_*` environment variables override file values.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::models::{ExternalPost, LogEntry};
use crate::ogp::DEFAULT_ENDPOINT;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "labsite.toml";

/// Thumbnail shown for external posts until an OGP image is resolved.
pub const DEFAULT_PLACEHOLDER: &str = "https://placehold.co/600x360?text=CDLE+Blog";

/// Metadata API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OgpConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Request timeout in seconds. Unset means requests may hang indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for OgpConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("labsite/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl OgpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Theme settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Stand-in for the OS `prefers-color-scheme: dark` signal.
    pub prefers_dark: bool,
    /// Where the theme preference is persisted. Defaults to the user config dir.
    pub preferences_file: Option<PathBuf>,
}

/// Site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    /// Site root; post images are resolved relative to it.
    pub root_dir: PathBuf,
    pub posts_dir: PathBuf,
    /// Experiments JSON written by `build` and read by `render`.
    pub data_file: PathBuf,
    /// Page written by `render`.
    pub output: PathBuf,
    pub placeholder_thumbnail: String,
    pub ogp: OgpConfig,
    pub theme: ThemeConfig,
    /// Lab log entries. Absent means the page has no log data.
    pub logs: Option<Vec<LogEntry>>,
    /// Blog posts hosted elsewhere. Absent means the page has no post data.
    pub external_posts: Option<Vec<ExternalPost>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "AI Experimental Lab".to_string(),
            root_dir: PathBuf::from("."),
            posts_dir: PathBuf::from("posts"),
            data_file: PathBuf::from("experiments.json"),
            output: PathBuf::from("index.html"),
            placeholder_thumbnail: DEFAULT_PLACEHOLDER.to_string(),
            ogp: OgpConfig::default(),
            theme: ThemeConfig::default(),
            logs: None,
            external_posts: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `labsite.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default().with_env_overrides());
                }
                default
            }
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::from_toml(&text, &path)?;

        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        debug!("Loaded config from {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Parse config text. `path` is only used in error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.root_dir);
        resolve(&mut self.posts_dir);
        resolve(&mut self.data_file);
        resolve(&mut self.output);
        if let Some(p) = self.theme.preferences_file.as_mut() {
            resolve(p);
        }
    }

    /// Apply `LABSITE_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = env::var("LABSITE_OGP_ENDPOINT") {
            if !endpoint.is_empty() {
                self.ogp.endpoint = endpoint;
            }
        }

        if let Ok(secs) = env::var("LABSITE_OGP_TIMEOUT") {
            if let Ok(secs) = secs.parse() {
                self.ogp.timeout_secs = Some(secs);
            }
        }

        // LABSITE_COLOR_SCHEME=dark|light stands in for the OS color scheme
        if let Ok(scheme) = env::var("LABSITE_COLOR_SCHEME") {
            match scheme.to_lowercase().as_str() {
                "dark" => self.theme.prefers_dark = true,
                "light" => self.theme.prefers_dark = false,
                _ => {}
            }
        }

        if let Ok(path) = env::var("LABSITE_PREFERENCES") {
            if !path.is_empty() {
                self.theme.preferences_file = Some(PathBuf::from(path));
            }
        }

        self
    }

    /// Location of the persisted preferences.
    pub fn preferences_path(&self) -> PathBuf {
        self.theme.preferences_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join("labsite").join("preferences.json"))
                .unwrap_or_else(|| PathBuf::from(".labsite-preferences.json"))
        })
    }
}
