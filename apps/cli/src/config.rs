//! Application configuration.
//!
//! One JSON file under the platform config dir:
//! `~/.config/gamedock/config.json`. Parsing is tolerant — a broken file
//! logs a warning and falls back to defaults instead of refusing to start.

use std::path::{Path, PathBuf};

use gamedock_library::LibrarySource;
use serde::{Deserialize, Serialize};

/// Default game installation directory name under `$HOME`.
const DEFAULT_GAMES_DIR: &str = "Games";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configured custom library sources, in priority order.
    #[serde(default)]
    pub sources: Vec<LibrarySource>,

    /// Base directory games are installed under. `~/Games` when absent.
    #[serde(default)]
    pub install_dir: Option<PathBuf>,

    /// Wine binary for non-native run tasks.
    #[serde(default = "default_wine_binary")]
    pub wine_binary: PathBuf,

    /// `WINEPREFIX` for non-native run tasks.
    #[serde(default)]
    pub wine_prefix: Option<PathBuf>,

    /// Bound on concurrent source fetches and metadata lookups.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_wine_binary() -> PathBuf {
    PathBuf::from("wine")
}

fn default_fetch_concurrency() -> usize {
    gamedock_library::DEFAULT_FETCH_CONCURRENCY
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            install_dir: None,
            wine_binary: default_wine_binary(),
            wine_prefix: None,
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration, falling back to defaults on any failure.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Saves the configuration, creating the config dir if needed.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, &json)?;
        set_permissions_0600(path);
        Ok(())
    }

    /// Resolves the game folder for an app.
    pub fn game_folder(&self, app_id: &str) -> PathBuf {
        let base = self
            .install_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(DEFAULT_GAMES_DIR));
        base.join(app_id)
    }
}

fn config_path() -> PathBuf {
    config_base_dir().join("gamedock").join("config.json")
}

fn config_base_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
