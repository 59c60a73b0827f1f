//! End-to-end crawl runs against an in-memory copy of the gallery site.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use bingwall_core::{mirror, Config, Error, Event, Remote, Reporter, Resolution, Tier};
use tempfile::TempDir;

const BASE: &str = "https://gallery.test";

#[derive(Default)]
struct Site {
    pages: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl Site {
    fn page(mut self, path: &str, html: String) -> Self {
        self.pages.insert(format!("{BASE}{path}"), html);
        self
    }

    fn image(mut self, path: &str) -> Self {
        self.images.insert(format!("{BASE}{path}"), path.as_bytes().to_vec());
        self
    }

    fn take_requests(&self) -> Vec<String> {
        self.requests.borrow_mut().drain(..).collect()
    }
}

fn not_found(url: &str) -> Error {
    Error::fetch(url, io::Error::new(io::ErrorKind::NotFound, "404 Not Found"))
}

impl Remote for Site {
    fn get_text(&self, url: &str) -> bingwall_core::Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| not_found(url))
    }

    fn get_bytes(&self, url: &str) -> bingwall_core::Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.images.get(url).cloned().ok_or_else(|| not_found(url))
    }
}

#[derive(Default)]
struct Recorder {
    lines: RefCell<Vec<String>>,
}

impl Reporter for Recorder {
    fn report(&self, event: Event<'_>) {
        let line = match event {
            Event::ArchiveStarted { label, images } => format!("archive {label} {images}"),
            Event::ImageSkipped { name } => format!("skip {name}"),
            Event::FileSaved { path } => {
                format!("saved {}", path.file_name().unwrap().to_string_lossy())
            }
            Event::TierMissing { name, tier } => format!("missing {name} {tier}"),
            Event::ImageFailed { name, error } => match error {
                Error::ResolutionParse { .. } => format!("unparsable {name}"),
                _ => format!("failed {name}"),
            },
        };
        self.lines.borrow_mut().push(line);
    }
}

fn landing() -> String {
    r#"<html><body>
        <div class="container mt-3 pb-3">
            <a href="/archive/2024-04">2024-04</a>
            <a href="/archive/2024-05">2024-05</a>
        </div>
    </body></html>"#
        .to_string()
}

fn archive(images: &[(&str, &str)]) -> String {
    let links: String = images
        .iter()
        .map(|(name, caption)| {
            format!(r#"<a href="/detail/{name}" data-bs-title="{caption}"><img></a>"#)
        })
        .collect();
    format!(
        r#"<html><body><div class="row align-items-start">{links}<a href="/archive/older">More</a></div></body></html>"#
    )
}

fn detail(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">download</a>"#))
        .collect();
    format!(r#"<html><body><div class="row align-items-end">{links}</div></body></html>"#)
}

fn gallery() -> Site {
    Site::default()
        .page("", landing())
        .page(
            "/archive/2024-05",
            archive(&[("lake", "A quiet lake"), ("hill", "Rolling hills")]),
        )
        .page(
            "/archive/2024-04",
            archive(&[("broken", "No widths here"), ("field", "Sunflower field")]),
        )
        .page(
            "/detail/lake",
            detail(&["/dl/w:3840/lake.jpg", "/dl/w:1920/lake.jpg", "/dl/w:1280/lake.jpg"]),
        )
        .page("/detail/hill", detail(&["/dl/w:1920/hill.jpg"]))
        .page("/detail/broken", detail(&["/dl/w:1920/broken.jpg", "/dl/broken-original.jpg"]))
        .page("/detail/field", detail(&["/dl/w:2560/field.jpg"]))
        .image("/dl/w:3840/lake.jpg")
        .image("/dl/w:1920/lake.jpg")
        .image("/dl/w:1280/lake.jpg")
        .image("/dl/w:1920/hill.jpg")
        .image("/dl/w:1920/broken.jpg")
        .image("/dl/w:2560/field.jpg")
}

fn config(dir: &Path, resolution: Resolution) -> Config {
    Config {
        save_path: dir.to_path_buf(),
        resolution,
        base_url: BASE.to_string(),
        timeout: None,
    }
}

fn files_in(dir: &Path) -> HashSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn saves_requested_tier_and_captions() {
    let tmp = TempDir::new().unwrap();
    let site = gallery();
    let recorder = Recorder::default();

    let summary = mirror(&site, &config(tmp.path(), Resolution::Only(Tier::Fhd)), &recorder).unwrap();

    assert_eq!(
        files_in(tmp.path()),
        set(&["lake-FHD.jpg", "lake.txt", "hill-FHD.jpg", "hill.txt", "field.txt"])
    );
    assert_eq!(fs::read_to_string(tmp.path().join("lake.txt")).unwrap(), "A quiet lake");
    assert_eq!(fs::read(tmp.path().join("hill-FHD.jpg")).unwrap(), b"/dl/w:1920/hill.jpg");

    assert_eq!(summary.archives, 2);
    assert_eq!(summary.resolved, 3);
    assert_eq!(summary.files_saved, 2);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.skipped, 0);

    let lines = recorder.lines.borrow();
    assert_eq!(lines[0], "archive 2024-05 2", "newest archive first");
    assert!(lines.contains(&"missing field FHD".to_string()));
}

#[test]
fn second_run_downloads_nothing_already_saved() {
    let tmp = TempDir::new().unwrap();
    let site = gallery();
    let config = config(tmp.path(), Resolution::Only(Tier::Fhd));

    mirror(&site, &config, &Recorder::default()).unwrap();
    let after_first = files_in(tmp.path());
    site.take_requests();

    let recorder = Recorder::default();
    let summary = mirror(&site, &config, &recorder).unwrap();
    let requests = site.take_requests();

    assert_eq!(files_in(tmp.path()), after_first);
    assert_eq!(summary.files_saved, 0);
    assert_eq!(summary.skipped, 2);
    assert!(recorder.lines.borrow().contains(&"skip lake".to_string()));
    assert!(!requests.iter().any(|url| url.contains("/detail/lake") || url.contains("/detail/hill")));
    assert!(!requests.iter().any(|url| url.contains("/dl/")));
}

#[test]
fn all_saves_every_advertised_tier() {
    let tmp = TempDir::new().unwrap();
    let site = gallery();

    let summary = mirror(&site, &config(tmp.path(), Resolution::All), &Recorder::default()).unwrap();

    assert_eq!(
        files_in(tmp.path()),
        set(&[
            "lake-4K.jpg",
            "lake-FHD.jpg",
            "lake-default.jpg",
            "lake.txt",
            "hill-FHD.jpg",
            "hill.txt",
            "field-2K.jpg",
            "field.txt",
        ])
    );
    assert_eq!(summary.files_saved, 5);
}

#[test]
fn malformed_resolution_link_skips_only_that_image() {
    let tmp = TempDir::new().unwrap();
    let site = gallery();
    let recorder = Recorder::default();

    let result = mirror(&site, &config(tmp.path(), Resolution::All), &recorder);

    assert!(result.is_ok());
    let files = files_in(tmp.path());
    assert!(!files.iter().any(|f| f.starts_with("broken")));
    assert!(files.contains("field-2K.jpg"), "image after the broken one still saved");
    assert!(recorder.lines.borrow().contains(&"unparsable broken".to_string()));
}

#[test]
fn failed_tier_download_does_not_stop_the_others() {
    let tmp = TempDir::new().unwrap();
    let mut site = gallery();
    site.images.remove(&format!("{BASE}/dl/w:3840/lake.jpg"));
    let recorder = Recorder::default();

    let summary = mirror(&site, &config(tmp.path(), Resolution::All), &recorder).unwrap();

    let files = files_in(tmp.path());
    assert!(!files.contains("lake-4K.jpg"));
    assert!(!files.contains("lake-4K.jpg.part"));
    assert!(files.contains("lake-FHD.jpg"));
    assert!(files.contains("lake.txt"));
    assert!(recorder.lines.borrow().contains(&"failed lake".to_string()));
    assert_eq!(summary.failures, 2);
}

#[test]
fn images_already_on_disk_are_never_requested() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("lake-2K.jpg"), b"old").unwrap();
    let site = gallery();

    mirror(&site, &config(tmp.path(), Resolution::All), &Recorder::default()).unwrap();

    let requests = site.take_requests();
    assert!(!requests.iter().any(|url| url.contains("lake")));
    assert!(!tmp.path().join("lake-4K.jpg").exists());
    assert!(tmp.path().join("hill-FHD.jpg").exists());
}

#[test]
fn unreachable_landing_page_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let site = Site::default();

    let err = mirror(&site, &config(tmp.path(), Resolution::default()), &Recorder::default()).unwrap_err();

    assert!(matches!(err, Error::Fetch { ref url, .. } if url == BASE));
}

#[test]
fn unreachable_archive_page_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let mut site = gallery();
    site.pages.remove(&format!("{BASE}/archive/2024-04"));

    let err = mirror(&site, &config(tmp.path(), Resolution::default()), &Recorder::default()).unwrap_err();

    assert!(matches!(err, Error::Fetch { ref url, .. } if url.ends_with("/archive/2024-04")));
    assert!(tmp.path().join("lake-FHD.jpg").exists(), "earlier archive kept its downloads");
}

#[test]
fn destination_directory_is_created() {
    let tmp = TempDir::new().unwrap();
    let dest = tmp.path().join("nested").join("BingWall");
    let site = gallery();

    mirror(&site, &config(&dest, Resolution::default()), &Recorder::default()).unwrap();

    assert!(dest.join("hill-FHD.jpg").exists());
}

#[test]
fn failed_caption_write_keeps_the_run_going() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("lake.txt")).unwrap();
    let site = gallery();
    let recorder = Recorder::default();

    let summary = mirror(&site, &config(tmp.path(), Resolution::Only(Tier::Fhd)), &recorder).unwrap();

    assert!(tmp.path().join("lake-FHD.jpg").is_file());
    assert!(tmp.path().join("hill-FHD.jpg").is_file());
    assert!(tmp.path().join("hill.txt").is_file());
    assert!(tmp.path().join("lake.txt").is_dir());
    assert!(!tmp.path().join("lake.txt.part").exists());

    assert_eq!(summary.files_saved, 2);
    assert_eq!(summary.failures, 2);
    assert!(recorder.lines.borrow().contains(&"failed lake".to_string()));
}
