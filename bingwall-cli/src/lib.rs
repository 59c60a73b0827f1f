pub use crate::app::{BingWallApp, Cli, Command, WallpaperCommand};

mod app {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use bingwall_core::wallpaper::{setter_for, SystemRunner};
    use bingwall_core::{
        mirror, Config, Event, HttpRemote, Overrides, Platform, Reporter, Resolution, RunSummary,
        Settings, WallpaperManager,
    };
    use clap::{Parser, Subcommand};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Spelling used by earlier releases; still honoured after `BINGWALLPAPER_URL`.
    const LEGACY_URL_ENV: &str = "BingWallPaper_URL";

    #[derive(Debug, Parser)]
    #[command(name = "bingwall", version, about = "Bing Wallpaper Downloader")]
    pub struct Cli {
        /// Path to save images (default: ~/BingWall)
        #[arg(short, long, global = true)]
        pub path: Option<PathBuf>,

        /// Preferred resolution (all, 4K, 2K, FHD)
        #[arg(short, long)]
        pub resolution: Option<Resolution>,

        /// Base URL of the wallpaper gallery
        #[arg(long, env = "BINGWALLPAPER_URL")]
        pub url: Option<String>,

        /// HTTP timeout in seconds
        #[arg(long, value_name = "SECS")]
        pub timeout: Option<u64>,

        /// Log debug output
        #[arg(short, long, global = true)]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Option<Command>,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// Manage wallpapers
        #[command(subcommand)]
        Wallpaper(WallpaperCommand),
    }

    #[derive(Debug, Subcommand)]
    pub enum WallpaperCommand {
        /// Set the latest downloaded wallpaper
        Set,
        /// Rotate to a random wallpaper
        Random {
            /// Seed for a reproducible pick
            #[arg(long)]
            seed: Option<u64>,
        },
    }

    impl Cli {
        pub fn overrides(&self) -> Overrides {
            self.overrides_with_env(|key| std::env::var(key).ok())
        }

        fn overrides_with_env(&self, var: impl Fn(&str) -> Option<String>) -> Overrides {
            let url = self
                .url
                .clone()
                .or_else(|| var(LEGACY_URL_ENV).filter(|url| !url.is_empty()));
            Overrides {
                save_path: self.path.clone(),
                resolution: self.resolution,
                url,
                timeout: self.timeout.map(Duration::from_secs),
            }
        }
    }

    /// Prints crawl progress for a person watching the terminal.
    struct ConsoleReporter;

    impl Reporter for ConsoleReporter {
        fn report(&self, event: Event<'_>) {
            match event {
                Event::ArchiveStarted { label, images } => {
                    println!("Processing {} ({} images)", label, images)
                }
                Event::ImageSkipped { name } => log::debug!("Ignore: {}", name),
                Event::FileSaved { path } => println!("Save: {}", path.display()),
                Event::TierMissing { name, tier } => {
                    log::debug!("No {} version of {}", tier, name)
                }
                Event::ImageFailed { name, error } => eprintln!("Error: {}: {}", name, error),
            }
        }
    }

    pub struct BingWallApp {
        config: Config,
    }

    impl BingWallApp {
        pub fn new(cli: &Cli) -> Result<Self> {
            let settings = Settings::load().context("Failed to load settings")?;
            let config = Config::resolve(cli.overrides(), settings)?;
            Ok(Self { config })
        }

        pub fn config(&self) -> &Config {
            &self.config
        }

        pub fn run(&self, command: Option<&Command>) -> Result<()> {
            match command {
                None => self.download().map(|_| ()),
                Some(Command::Wallpaper(WallpaperCommand::Set)) => self.set_latest(),
                Some(Command::Wallpaper(WallpaperCommand::Random { seed })) => self.set_random(*seed),
            }
        }

        pub fn download(&self) -> Result<RunSummary> {
            println!("Image Store Path: {}", self.config.save_path.display());
            println!("Resolution: {}", self.config.resolution);

            let remote = HttpRemote::with_timeout(self.config.timeout);
            let summary = mirror(&remote, &self.config, &ConsoleReporter)
                .with_context(|| format!("Failed to mirror {}", self.config.base_url))?;

            println!(
                "Done: {} archives, {} new images, {} files saved, {} already present, {} errors",
                summary.archives, summary.resolved, summary.files_saved, summary.skipped, summary.failures
            );
            Ok(summary)
        }

        fn set_latest(&self) -> Result<()> {
            let runner = SystemRunner;
            let setter = setter_for(Platform::detect(), &runner);
            let path = WallpaperManager::new(&self.config.save_path)
                .set_latest(setter.as_ref())
                .context("Failed to set wallpaper")?;
            println!("Wallpaper set successfully! {}", path.display());
            Ok(())
        }

        fn set_random(&self, seed: Option<u64>) -> Result<()> {
            let runner = SystemRunner;
            let setter = setter_for(Platform::detect(), &runner);
            let manager = WallpaperManager::new(&self.config.save_path);
            let path = match seed {
                Some(seed) => manager.set_random(setter.as_ref(), &mut StdRng::seed_from_u64(seed)),
                None => manager.set_random(setter.as_ref(), &mut rand::thread_rng()),
            }
            .context("Failed to rotate wallpaper")?;
            println!("Wallpaper rotated successfully! {}", path.display());
            Ok(())
        }
    }

}
