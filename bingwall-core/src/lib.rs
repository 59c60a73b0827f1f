//! Incremental mirror of a dated wallpaper gallery, plus desktop background setting.

pub mod config;
pub mod download;
pub mod error;
pub mod inventory;
pub mod remote;
pub mod report;
pub mod resolution;
pub mod scrape;
pub mod wallpaper;

pub use config::{Config, Overrides, Settings, DEFAULT_BASE_URL};
pub use download::{mirror, Downloader, RunSummary};
pub use error::{Error, Result};
pub use remote::{HttpRemote, Remote};
pub use report::{Event, LogReporter, Reporter};
pub use resolution::{classify, Resolution, Tier};
pub use scrape::{ArchiveEntry, ImageDescriptor, ImageDownload};
pub use wallpaper::{apply_wallpaper, set_wallpaper, Platform, WallpaperManager, WallpaperSetter};
