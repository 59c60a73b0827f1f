use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inventory;
use crate::remote::{fetch_page, join_url, Remote};
use crate::report::{Event, Reporter};
use crate::resolution::{Resolution, Tier};
use crate::scrape::{build_index, list_images, resolve, ArchiveEntry, ImageDescriptor, ImageDownload};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub archives: usize,
    pub skipped: usize,
    pub resolved: usize,
    pub files_saved: usize,
    pub failures: usize,
}

/// Walks archives and saves every image not yet in the local inventory.
pub struct Downloader<'a, R: Remote + ?Sized> {
    remote: &'a R,
    base_url: &'a str,
    save_path: &'a Path,
    resolution: Resolution,
    reporter: &'a dyn Reporter,
}

impl<'a, R: Remote + ?Sized> Downloader<'a, R> {
    pub fn new(remote: &'a R, config: &'a Config, reporter: &'a dyn Reporter) -> Self {
        Self {
            remote,
            base_url: &config.base_url,
            save_path: &config.save_path,
            resolution: config.resolution,
            reporter,
        }
    }

    /// Fails only when an archive or detail page cannot be fetched.
    pub fn run(&self, archives: &[ArchiveEntry], inventory: &HashSet<String>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for archive in archives {
            let page = fetch_page(self.remote, &join_url(self.base_url, &archive.url))?;
            let images = list_images(&page);
            summary.archives += 1;
            self.reporter.report(Event::ArchiveStarted {
                label: &archive.label,
                images: images.len(),
            });

            for image in &images {
                // Decided before any request for this image goes out.
                if inventory.contains(&image.name) {
                    summary.skipped += 1;
                    self.reporter.report(Event::ImageSkipped { name: &image.name });
                    continue;
                }

                let download = match resolve(self.remote, self.base_url, image) {
                    Ok(download) => download,
                    Err(error) if error.is_image_local() => {
                        summary.failures += 1;
                        self.reporter.report(Event::ImageFailed {
                            name: &image.name,
                            error: &error,
                        });
                        continue;
                    }
                    Err(error) => return Err(error),
                };
                summary.resolved += 1;
                self.save(image, &download, &mut summary);
            }
        }

        Ok(summary)
    }

    fn wanted_tiers(&self, download: &ImageDownload) -> Vec<Tier> {
        match self.resolution {
            Resolution::All => download.urls.keys().copied().collect(),
            Resolution::Only(tier) if download.urls.contains_key(&tier) => vec![tier],
            Resolution::Only(tier) => {
                self.reporter.report(Event::TierMissing {
                    name: &download.name,
                    tier,
                });
                Vec::new()
            }
        }
    }

    fn save(&self, image: &ImageDescriptor, download: &ImageDownload, summary: &mut RunSummary) {
        for tier in self.wanted_tiers(download) {
            let url = &download.urls[&tier];
            let path = self.save_path.join(format!("{}-{}.jpg", download.name, tier));
            match self.save_image(url, &path) {
                Ok(()) => {
                    summary.files_saved += 1;
                    self.reporter.report(Event::FileSaved { path: &path });
                }
                Err(error) => {
                    summary.failures += 1;
                    self.reporter.report(Event::ImageFailed {
                        name: &download.name,
                        error: &error,
                    });
                }
            }
        }

        let caption = self.save_path.join(format!("{}.txt", image.name));
        match write_atomic(&caption, image.detail.as_bytes()) {
            Ok(()) => self.reporter.report(Event::FileSaved { path: &caption }),
            Err(error) => {
                summary.failures += 1;
                self.reporter.report(Event::ImageFailed {
                    name: &image.name,
                    error: &error,
                });
            }
        }
    }

    fn save_image(&self, url: &str, path: &Path) -> Result<()> {
        let bytes = self.remote.get_bytes(url)?;
        write_atomic(path, &bytes)
    }
}

/// Writes next to `path` and renames into place, so a killed run never
/// leaves a truncated file under the final name.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    fs::write(&partial, bytes)
        .and_then(|()| fs::rename(&partial, path))
        .map_err(|source| {
            let _ = fs::remove_file(&partial);
            Error::Persistence {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// The default action: scan, index the landing page, download what is new.
pub fn mirror<R: Remote + ?Sized>(
    remote: &R,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<RunSummary> {
    config.ensure_save_path()?;
    let inventory = inventory::scan(&config.save_path);
    log::info!(
        "{} images already in {}",
        inventory.len(),
        config.save_path.display()
    );

    let landing = fetch_page(remote, &config.base_url)?;
    let archives = build_index(&landing);
    log::info!("Found {} archives at {}", archives.len(), config.base_url);

    Downloader::new(remote, config, reporter).run(&archives, &inventory)
}
