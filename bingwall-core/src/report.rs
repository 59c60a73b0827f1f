use std::path::Path;

use crate::error::Error;
use crate::resolution::Tier;

/// Progress of a crawl, as seen by whoever is watching it.
#[derive(Debug)]
pub enum Event<'a> {
    ArchiveStarted { label: &'a str, images: usize },
    ImageSkipped { name: &'a str },
    FileSaved { path: &'a Path },
    TierMissing { name: &'a str, tier: Tier },
    ImageFailed { name: &'a str, error: &'a Error },
}

pub trait Reporter {
    fn report(&self, event: Event<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: Event<'_>) {
        match event {
            Event::ArchiveStarted { label, images } => {
                log::info!("Archive {}: {} images", label, images)
            }
            Event::ImageSkipped { name } => log::debug!("Skipping {} (already saved)", name),
            Event::FileSaved { path } => log::info!("Saved {}", path.display()),
            Event::TierMissing { name, tier } => {
                log::debug!("{} has no {} download", name, tier)
            }
            Event::ImageFailed { name, error } => log::warn!("{}: {}", name, error),
        }
    }
}
