//! What is already on disk.
//!
//! The destination directory is the only state that survives between runs,
//! so the dedup ledger is rebuilt from it every time.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Extensions counted as saved images, in scan order.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().position(|known| *known == ext)
}

/// Image files directly inside `dir`, grouped by extension then sorted by name.
///
/// A directory that cannot be read is treated as empty.
pub fn list_paths(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut images: Vec<(usize, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        // is_file follows symlinks, so linked images count
        .filter(|path| path.is_file())
        .filter_map(|path| extension_rank(&path).map(|rank| (rank, path)))
        .collect();

    images.sort_by(|(a_rank, a), (b_rank, b)| {
        a_rank.cmp(b_rank).then_with(|| a.file_name().cmp(&b.file_name()))
    });
    images.into_iter().map(|(_, path)| path).collect()
}

pub fn list_with_timestamps(dir: &Path) -> Vec<ImageFile> {
    list_paths(dir)
        .into_iter()
        .filter_map(|path| {
            let modified = match fs::metadata(&path).and_then(|meta| meta.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    log::debug!("Skipping {}: {}", path.display(), e);
                    return None;
                }
            };
            let path = std::path::absolute(&path).unwrap_or(path);
            Some(ImageFile {
                path,
                modified: DateTime::<Utc>::from(modified),
            })
        })
        .collect()
}

/// The dedup key of a saved file: its stem up to the first `-`.
///
/// `sunset-4K.jpg` and `sunset.jpg` both yield `sunset`.
pub fn base_identifier(file_name: &str) -> &str {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.split('-').next().unwrap_or(stem)
}

/// Base identifiers of every image already saved in `dir`.
pub fn scan(dir: &Path) -> HashSet<String> {
    list_paths(dir)
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .map(|name| base_identifier(name).to_string())
        .collect()
}
