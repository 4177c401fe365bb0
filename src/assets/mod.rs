//! Overlay image acquisition and decoding.

use std::sync::Arc;

pub(crate) mod decode;
pub(crate) mod loader;
pub(crate) mod svg_raster;

/// A decoded overlay image.
#[derive(Clone, Debug)]
pub struct OverlayImage {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Parsed vector source, when the image is an SVG; rasterized again at draw size.
    pub svg: Option<Arc<usvg::Tree>>,
    /// URI the vector surface can reference instead of embedding pixels.
    pub href: Option<String>,
}

impl OverlayImage {
    /// Intrinsic size as floats.
    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }
}
