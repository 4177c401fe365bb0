//! Asynchronous image acquisition.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::assets::OverlayImage;
use crate::assets::decode::decode_overlay;
use crate::foundation::error::{QrStyleError, QrStyleResult};

/// Where an overlay image comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// A URI: a `data:` URI, a `file://` URI, or a plain path.
    Uri(String),
    /// A filesystem path.
    Path(PathBuf),
    /// Encoded image bytes held in memory.
    #[serde(skip)]
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// URI the vector surface may reference directly, if the source has one.
    pub fn href(&self) -> Option<String> {
        match self {
            Self::Uri(uri) => Some(uri.clone()),
            Self::Path(path) => Some(path.display().to_string()),
            Self::Bytes(_) => None,
        }
    }
}

impl From<&str> for ImageSource {
    fn from(uri: &str) -> Self {
        Self::Uri(uri.to_owned())
    }
}

/// One image fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    /// What to load.
    pub source: ImageSource,
    /// Cross-origin policy for loaders that fetch over a network.
    pub cross_origin: Option<String>,
}

/// Future yielded by [`ImageLoader::load`].
pub type ImageFuture<'a> = Pin<Box<dyn Future<Output = QrStyleResult<OverlayImage>> + Send + 'a>>;

/// Resolves an image request into decoded pixels, eventually.
pub trait ImageLoader: Send + Sync {
    /// Start loading `request`. Failures are reported as [`QrStyleError::ImageLoad`].
    fn load<'a>(&'a self, request: &'a ImageRequest) -> ImageFuture<'a>;
}

/// Loads paths, `file://` URIs, `data:` URIs and in-memory bytes.
///
/// Relative paths resolve against the loader root when one is set.
#[derive(Clone, Debug, Default)]
pub struct FsImageLoader {
    root: Option<PathBuf>,
}

impl FsImageLoader {
    /// Loader resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Load synchronously.
    #[tracing::instrument(level = "debug", skip_all, fields(href = ?request.source.href()))]
    pub fn load_now(&self, request: &ImageRequest) -> QrStyleResult<OverlayImage> {
        let bytes: Arc<[u8]> = match &request.source {
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::Path(path) => self.read(path)?.into(),
            ImageSource::Uri(uri) => self.fetch_uri(uri)?.into(),
        };
        let mut image = decode_overlay(&bytes)
            .map_err(|e| QrStyleError::image_load(format!("decode overlay image: {e}")))?;
        image.href = request.source.href();
        tracing::debug!(width = image.width, height = image.height, "overlay image decoded");
        Ok(image)
    }

    fn read(&self, path: &Path) -> QrStyleResult<Vec<u8>> {
        let resolved = match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        };
        std::fs::read(&resolved).map_err(|e| {
            QrStyleError::image_load(format!("read image '{}': {e}", resolved.display()))
        })
    }

    fn fetch_uri(&self, uri: &str) -> QrStyleResult<Vec<u8>> {
        if let Some(rest) = uri.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if let Some(path) = uri.strip_prefix("file://") {
            return self.read(Path::new(path));
        }
        if let Some((scheme, _)) = uri.split_once("://") {
            return Err(QrStyleError::image_load(format!(
                "unsupported image uri scheme '{scheme}'"
            )));
        }
        self.read(Path::new(uri))
    }
}

impl ImageLoader for FsImageLoader {
    fn load<'a>(&'a self, request: &'a ImageRequest) -> ImageFuture<'a> {
        Box::pin(async move { self.load_now(request) })
    }
}

/// Decode the part of a `data:` URI after the scheme.
fn decode_data_uri(rest: &str) -> QrStyleResult<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrStyleError::image_load("data uri has no payload"))?;
    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| QrStyleError::image_load(format!("data uri base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(s: &str) -> QrStyleResult<Vec<u8>> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| QrStyleError::image_load("data uri has a bad percent escape"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
