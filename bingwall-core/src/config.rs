use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolution::Resolution;

pub const DEFAULT_BASE_URL: &str = "https://bingwallpaper.anerg.com";
pub const DEFAULT_FOLDER: &str = "BingWall";
const SETTINGS_FILE: &str = "settings.json";

/// Optional defaults read from `settings.json` in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub save_path: Option<PathBuf>,
    pub resolution: Option<String>,
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bingwall", "bingwall")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// A missing file is an empty set of settings.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line; these beat everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub save_path: Option<PathBuf>,
    pub resolution: Option<Resolution>,
    pub url: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub save_path: PathBuf,
    pub resolution: Resolution,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::resolve(Overrides::default(), Settings::load()?)
    }

    pub fn resolve(overrides: Overrides, settings: Settings) -> Result<Self> {
        let save_path = overrides
            .save_path
            .or(settings.save_path)
            .unwrap_or_else(default_save_path);

        let resolution = match (overrides.resolution, settings.resolution) {
            (Some(resolution), _) => resolution,
            (None, Some(value)) => value.parse()?,
            (None, None) => Resolution::default(),
        };

        let base_url = overrides
            .url
            .or(settings.url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = overrides
            .timeout
            .or(settings.timeout_secs.map(Duration::from_secs));

        Ok(Config {
            save_path,
            resolution,
            base_url,
            timeout,
        })
    }

    pub fn ensure_save_path(&self) -> Result<()> {
        fs::create_dir_all(&self.save_path)?;
        Ok(())
    }
}

/// `~/BingWall`, or `./BingWall` when no home directory can be found.
pub fn default_save_path() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_FOLDER))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER))
}
