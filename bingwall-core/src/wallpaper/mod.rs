//! Setting the desktop background.
//!
//! Each platform gets a [`WallpaperSetter`]. They all shell out through a
//! [`CommandRunner`], so the commands can be swapped for a double in tests.

mod linux;
mod macos;
mod windows;

pub use linux::{apply_first_success, default_strategies, desktop_environment, LinuxSetter, Strategy};
pub use macos::MacSetter;
pub use windows::WindowsSetter;

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::inventory::{self, ImageFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }
}

pub trait WallpaperSetter {
    fn apply(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stderr: String,
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs commands for real, waiting for each to exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Fails every request; used where no strategy exists for the host OS.
#[derive(Debug, Clone)]
pub struct UnsupportedSetter {
    os: String,
}

impl WallpaperSetter for UnsupportedSetter {
    fn apply(&self, _path: &Path) -> Result<()> {
        Err(Error::UnsupportedOperatingSystem(self.os.clone()))
    }
}

pub fn setter_for<'r>(platform: Platform, runner: &'r dyn CommandRunner) -> Box<dyn WallpaperSetter + 'r> {
    match platform {
        Platform::Windows => Box::new(WindowsSetter::new(runner)),
        Platform::MacOs => Box::new(MacSetter::new(runner)),
        Platform::Linux => Box::new(LinuxSetter::new(runner, desktop_environment())),
        Platform::Other(os) => Box::new(UnsupportedSetter { os }),
    }
}

/// Sets `path` as the background on the current machine.
pub fn set_wallpaper(path: &Path) -> Result<()> {
    apply_wallpaper(Platform::detect(), &SystemRunner, path)
}

/// Sets `path` as the background for `platform`, running commands through `runner`.
pub fn apply_wallpaper(platform: Platform, runner: &dyn CommandRunner, path: &Path) -> Result<()> {
    let setter = setter_for(platform, runner);
    setter.apply(path)
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Picks a wallpaper out of the download directory.
#[derive(Debug, Clone)]
pub struct WallpaperManager {
    save_path: PathBuf,
}

impl WallpaperManager {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    /// Most recently modified image. On equal times the earlier scan entry wins.
    pub fn latest(&self) -> Result<PathBuf> {
        let mut latest: Option<ImageFile> = None;
        for image in inventory::list_with_timestamps(&self.save_path) {
            if latest.as_ref().map_or(true, |current| image.modified > current.modified) {
                latest = Some(image);
            }
        }
        latest
            .map(|image| {
                log::debug!("Latest image {} ({})", image.path.display(), image.modified);
                image.path
            })
            .ok_or_else(|| Error::NoImagesFound(self.save_path.clone()))
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathBuf> {
        inventory::list_paths(&self.save_path)
            .choose(rng)
            .cloned()
            .ok_or_else(|| Error::NoImagesFound(self.save_path.clone()))
    }

    pub fn set_latest(&self, setter: &dyn WallpaperSetter) -> Result<PathBuf> {
        let path = self.latest()?;
        setter.apply(&path)?;
        Ok(path)
    }

    pub fn set_random<R: Rng + ?Sized>(&self, setter: &dyn WallpaperSetter, rng: &mut R) -> Result<PathBuf> {
        let path = self.random(rng)?;
        setter.apply(&path)?;
        Ok(path)
    }
}
