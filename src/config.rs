use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) delimiter: Option<String>,
    #[serde(default)]
    pub(crate) database: Option<PathBuf>,
    #[serde(default)]
    pub(crate) table: Option<String>,
    #[serde(default)]
    pub(crate) top: Option<usize>,
    #[serde(default)]
    pub(crate) url: Option<String>,
}

/// Where the active config came from; logged once tracing is up
#[derive(Debug)]
pub(crate) enum ConfigOrigin {
    Defaults,
    File(PathBuf),
    Invalid { path: PathBuf, reason: String },
}

impl ConfigOrigin {
    pub(crate) fn log(&self) {
        match self {
            ConfigOrigin::Defaults => debug!("no config file found, using defaults"),
            ConfigOrigin::File(path) => debug!(path = %path.display(), "loaded config"),
            ConfigOrigin::Invalid { path, reason } => {
                warn!(path = %path.display(), "failed to parse config, using defaults: {reason}");
            }
        }
    }
}

impl Config {
    /// First readable config file wins. A file that fails to parse falls back to
    /// defaults rather than trying the next location.
    pub(crate) fn load() -> (Self, ConfigOrigin) {
        for path in Self::get_config_paths() {
            if !path.exists() {
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            return match Self::parse(&content) {
                Ok(config) => (config, ConfigOrigin::File(path)),
                Err(e) => (
                    Self::default(),
                    ConfigOrigin::Invalid {
                        path,
                        reason: e.to_string(),
                    },
                ),
            };
        }
        (Self::default(), ConfigOrigin::Defaults)
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/orderlens/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("orderlens").join("config.toml"));
        }

        // 2. Platform config dir (macOS: ~/Library/Application Support/orderlens/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("orderlens").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.orderlens.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".orderlens.toml"));
        }

        paths
    }
}
