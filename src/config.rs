use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CursorError, Result};

pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_SIZE: u32 = 24;
pub const DEFAULT_SEARCH_PATH: &str =
    "~/.icons:~/.local/share/icons:/usr/share/icons:/usr/share/pixmaps";

const XCURSOR_THEME: &str = "XCURSOR_THEME";
const XCURSOR_SIZE: &str = "XCURSOR_SIZE";
const XCURSOR_PATH: &str = "XCURSOR_PATH";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Directories holding `<theme>/cursors/`. Empty means `XCURSOR_PATH` or the
    /// usual defaults.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: None,
            size: DEFAULT_SIZE,
            scale: default_scale(),
            search_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Read `XCURSOR_THEME`, `XCURSOR_SIZE` and `XCURSOR_PATH`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`], with variables looked up through `var`.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let theme = var(XCURSOR_THEME).filter(|t| !t.is_empty());
        let size = var(XCURSOR_SIZE)
            .and_then(|s| s.trim().parse().ok())
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_SIZE);
        Self {
            theme,
            size,
            scale: default_scale(),
            search_paths: search_paths_from(var(XCURSOR_PATH), dirs::home_dir().as_deref()),
        }
    }

    pub fn theme_name(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    /// Pixel size to load for the configured output scale.
    pub fn scaled_size(&self) -> u32 {
        self.size.saturating_mul(self.scale).max(1)
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CursorError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| CursorError::Config(format!("{}: {}", path.display(), e)))
    }
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_scale() -> u32 {
    1
}

/// Search paths from `XCURSOR_PATH`, or the defaults when it is unset.
pub fn env_search_paths() -> Vec<PathBuf> {
    search_paths_from(env::var(XCURSOR_PATH).ok(), dirs::home_dir().as_deref())
}

fn search_paths_from(list: Option<String>, home: Option<&Path>) -> Vec<PathBuf> {
    expand_search_path(list.as_deref().unwrap_or(DEFAULT_SEARCH_PATH), home)
}

/// Split a colon-separated path list, expanding a leading `~` to `home`.
pub fn expand_search_path(list: &str, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in list.split(':').filter(|e| !e.is_empty()) {
        match entry.strip_prefix('~') {
            Some(rest) => match home {
                Some(home) => paths.push(home.join(rest.trim_start_matches('/'))),
                None => log::warn!("No home directory known; ignoring {}", entry),
            },
            None => paths.push(PathBuf::from(entry)),
        }
    }
    paths
}
