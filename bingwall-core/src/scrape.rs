//! Parsers for the gallery site's markup.
//!
//! The site's HTML layout and its `w:<width>` link convention are only known
//! here; a change on the site side should not leak past this module.

use std::collections::HashMap;

use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::remote::{fetch_page, join_url, Remote};
use crate::resolution::{classify, Tier};

const ARCHIVE_LINKS: &str = ".container.mt-3.pb-3 a";
const IMAGE_LINKS: &str = ".row.align-items-start a";
const RESOLUTION_LINKS: &str = ".row.align-items-end a";
const CAPTION_ATTR: &str = "data-bs-title";
const WIDTH_MARKER: &str = "w:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub name: String,
    pub detail: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDownload {
    pub name: String,
    pub urls: HashMap<Tier, String>,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Archive links on the landing page, newest label first.
///
/// A label seen twice keeps the URL of its last occurrence.
pub fn build_index(document: &Html) -> Vec<ArchiveEntry> {
    let links = selector(ARCHIVE_LINKS);
    let mut archives: HashMap<String, String> = HashMap::new();

    for link in document.select(&links) {
        let label = link.text().collect::<String>().trim().to_string();
        let href = link.value().attr("href").unwrap_or_default().to_string();
        archives.insert(label, href);
    }

    let mut index: Vec<ArchiveEntry> = archives
        .into_iter()
        .map(|(label, url)| ArchiveEntry { label, url })
        .collect();
    index.sort_by(|a, b| b.label.cmp(&a.label));
    index
}

/// Captioned thumbnails on an archive page. Links without a caption are UI chrome.
pub fn list_images(document: &Html) -> Vec<ImageDescriptor> {
    let links = selector(IMAGE_LINKS);

    document
        .select(&links)
        .filter_map(|link| {
            let detail = link.value().attr(CAPTION_ATTR).unwrap_or_default();
            if detail.is_empty() {
                return None;
            }
            let href = link.value().attr("href").unwrap_or_default();
            Some(ImageDescriptor {
                name: image_name(href),
                detail: detail.to_string(),
                url: href.to_string(),
            })
        })
        .collect()
}

/// Last path segment of `href`, safe to use as a file name.
fn image_name(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    segment
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// The width between the `w:` marker and the following `/`.
pub fn width_token(href: &str) -> Option<&str> {
    let after = href.split(WIDTH_MARKER).nth(1)?;
    after.split('/').next()
}

/// Download links on an image detail page, keyed by tier.
///
/// Several links landing in the same tier keep the last one.
pub fn parse_resolutions(
    base_url: &str,
    image: &ImageDescriptor,
    document: &Html,
) -> Result<ImageDownload> {
    let links = selector(RESOLUTION_LINKS);
    let mut download = ImageDownload {
        name: image.name.clone(),
        urls: HashMap::new(),
    };

    for link in document.select(&links) {
        let href = link.value().attr("href").unwrap_or_default();
        let width = width_token(href).ok_or_else(|| Error::ResolutionParse {
            image: image.name.clone(),
            href: href.to_string(),
        })?;
        download.urls.insert(classify(width), join_url(base_url, href));
    }

    Ok(download)
}

/// Fetches an image's detail page and collects its download links.
pub fn resolve<R: Remote + ?Sized>(
    remote: &R,
    base_url: &str,
    image: &ImageDescriptor,
) -> Result<ImageDownload> {
    let document = fetch_page(remote, &join_url(base_url, &image.url))?;
    parse_resolutions(base_url, image, &document)
}
