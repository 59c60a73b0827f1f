use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A page the whole run depends on could not be retrieved.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed resolution link {href:?} for image {image}")]
    ResolutionParse { image: String, href: String },

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no images found in {}", .0.display())]
    NoImagesFound(PathBuf),

    #[error("image file does not exist: {}", .0.display())]
    MissingImage(PathBuf),

    #[error("`{program}` failed: {detail}")]
    Command { program: String, detail: String },

    #[error("could not set wallpaper on Linux: no supported desktop environment responded")]
    UnsupportedDesktopEnvironment,

    #[error("unsupported operating system: {0}")]
    UnsupportedOperatingSystem(String),

    #[error("invalid resolution {0:?} (expected one of all, 4K, 2K, FHD)")]
    InvalidResolution(String),

    #[error("invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn fetch<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Errors confined to a single image: the pipeline logs them and moves on.
    pub fn is_image_local(&self) -> bool {
        matches!(self, Error::ResolutionParse { .. } | Error::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_per_image_errors_are_recoverable() {
        let parse = Error::ResolutionParse {
            image: "a".into(),
            href: "/x".into(),
        };
        let write = Error::Persistence {
            path: PathBuf::from("/tmp/a.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(parse.is_image_local());
        assert!(write.is_image_local());
        assert!(!Error::NoImagesFound(PathBuf::from("/tmp")).is_image_local());
        assert!(!Error::UnsupportedDesktopEnvironment.is_image_local());
    }
}
