use std::time::Duration;

use scraper::Html;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("bingwall/", env!("CARGO_PKG_VERSION"));

/// Source of remote pages and image bytes.
pub trait Remote {
    fn get_text(&self, url: &str) -> Result<String>;
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP client for the gallery site.
#[derive(Debug, Clone, Default)]
pub struct HttpRemote {
    timeout: Option<Duration>,
}

impl HttpRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn get(&self, url: &str) -> Result<attohttpc::Response> {
        let mut request = attohttpc::get(url).header(attohttpc::header::USER_AGENT, USER_AGENT);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().map_err(|e| Error::fetch(url, e))?;
        response.error_for_status().map_err(|e| Error::fetch(url, e))
    }
}

impl Remote for HttpRemote {
    fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        self.get(url)?.text().map_err(|e| Error::fetch(url, e))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {} (bytes)", url);
        self.get(url)?.bytes().map_err(|e| Error::fetch(url, e))
    }
}

/// Fetches `url` and parses the body as an HTML document.
pub fn fetch_page<R: Remote + ?Sized>(remote: &R, url: &str) -> Result<Html> {
    let html = remote.get_text(url)?;
    Ok(Html::parse_document(&html))
}

/// Resolves an `href` from the site against its base URL.
pub fn join_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}
