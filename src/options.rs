//! Styling options consumed by a render session.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::loader::ImageSource;
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::paint::color::Color;
use crate::paint::gradient::PaintSpec;
use crate::render::corners::{CornerDotStyle, CornerSquareStyle};
use crate::render::dots::DotStyle;

/// Outer silhouette of the symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrShape {
    /// Plain square symbol.
    #[default]
    Square,
    /// Matrix inscribed in a circle filled with decorative dots.
    Circle,
}

/// QR error correction level of the encoded symbol.
///
/// Only used to size the overlay image: the higher the level, the more modules may be hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    #[default]
    Q,
    /// ~30% recovery.
    H,
}

impl ErrorCorrectionLevel {
    /// Fraction of modules an overlay may cover at this level.
    pub fn cover_fraction(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }
}

fn default_dots_paint() -> Option<PaintSpec> {
    Some(PaintSpec::Solid(Color::BLACK))
}

fn default_background_paint() -> Option<PaintSpec> {
    Some(PaintSpec::Solid(Color::WHITE))
}

fn default_true() -> bool {
    true
}

fn default_size() -> u32 {
    300
}

fn default_image_size() -> f64 {
    0.4
}

/// Data-module styling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsOptions {
    /// Shape style of each module.
    pub style: DotStyle,
    /// Fill of the dots; `None` leaves them unpainted.
    pub paint: Option<PaintSpec>,
    /// Floor the dot size and matrix origin to whole pixels.
    pub round_size: bool,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self {
            style: DotStyle::default(),
            paint: default_dots_paint(),
            round_size: true,
        }
    }
}

/// Finder frame styling. `None` fields fall back to the dots' style and paint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerSquareOptions {
    /// Dedicated frame shape.
    pub style: Option<CornerSquareStyle>,
    /// Own frame fill.
    pub paint: Option<PaintSpec>,
}

/// Finder ball styling. `None` fields fall back to the dots' style and paint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerDotOptions {
    /// Dedicated ball shape.
    pub style: Option<CornerDotStyle>,
    /// Own ball fill.
    pub paint: Option<PaintSpec>,
}

/// Surface background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Fill; `None` leaves the surface transparent.
    pub paint: Option<PaintSpec>,
    /// Corner rounding of the background square, `0..=1` of half its side.
    pub round: f64,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            paint: default_background_paint(),
            round: 0.0,
        }
    }
}

/// Overlay image placed over the matrix center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Where the image comes from.
    pub source: ImageSource,
    /// Fraction of the error-correction budget the image may use, `(0, 1]`.
    #[serde(default = "default_image_size")]
    pub image_size: f64,
    /// Inset of the drawn image inside its hidden block, in pixels.
    #[serde(default)]
    pub margin: f64,
    /// Whether dots under the image are skipped.
    #[serde(default = "default_true")]
    pub hide_background_dots: bool,
    /// Cross-origin policy forwarded to the loader.
    #[serde(default)]
    pub cross_origin: Option<String>,
}

impl ImageOptions {
    /// Overlay with default sizing.
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            image_size: default_image_size(),
            margin: 0.0,
            hide_background_dots: true,
            cross_origin: None,
        }
    }
}

/// Complete styling of one QR graphic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrStyleOptions {
    /// Surface width in pixels.
    #[serde(default = "default_size")]
    pub width: u32,
    /// Surface height in pixels.
    #[serde(default = "default_size")]
    pub height: u32,
    /// Quiet zone around the matrix, in pixels.
    pub margin: f64,
    /// Outer silhouette.
    pub shape: QrShape,
    /// Level the matrix was encoded with.
    pub error_correction: ErrorCorrectionLevel,
    /// Data modules.
    pub dots: DotsOptions,
    /// Finder frames.
    pub corners_square: CornerSquareOptions,
    /// Finder balls.
    pub corners_dot: CornerDotOptions,
    /// Background fill.
    pub background: BackgroundOptions,
    /// Optional center image.
    pub image: Option<ImageOptions>,
}

impl Default for QrStyleOptions {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            margin: 0.0,
            shape: QrShape::default(),
            error_correction: ErrorCorrectionLevel::default(),
            dots: DotsOptions::default(),
            corners_square: CornerSquareOptions::default(),
            corners_dot: CornerDotOptions::default(),
            background: BackgroundOptions::default(),
            image: None,
        }
    }
}

impl QrStyleOptions {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> QrStyleResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| QrStyleError::serde(format!("parse style options JSON: {e}")))
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> QrStyleResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| QrStyleError::serde(format!("parse style options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QrStyleResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QrStyleError::serde(format!("open style options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> QrStyleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QrStyleError::serde(format!("serialize style options: {e}")))
    }

    /// Reject malformed style input before anything is drawn.
    pub fn validate(&self) -> QrStyleResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QrStyleError::validation(format!(
                "surface size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(QrStyleError::validation("margin must be a non-negative number"));
        }
        if 2.0 * self.margin >= f64::from(self.width.min(self.height)) {
            return Err(QrStyleError::validation(format!(
                "margin {} leaves no room on a {}x{} surface",
                self.margin, self.width, self.height
            )));
        }

        let regions = [
            ("dots", self.dots.paint.as_ref()),
            ("corners square", self.corners_square.paint.as_ref()),
            ("corners dot", self.corners_dot.paint.as_ref()),
            ("background", self.background.paint.as_ref()),
        ];
        for (region, paint) in regions {
            if let Some(paint) = paint {
                paint.validate().map_err(|e| match e {
                    QrStyleError::Validation(msg) => {
                        QrStyleError::validation(format!("{region} paint: {msg}"))
                    }
                    other => other,
                })?;
            }
        }

        if !(0.0..=1.0).contains(&self.background.round) {
            return Err(QrStyleError::validation(
                "background round must be within [0, 1]",
            ));
        }

        if let Some(image) = &self.image {
            if !(image.image_size > 0.0 && image.image_size <= 1.0) {
                return Err(QrStyleError::validation(
                    "image size must be within (0, 1]",
                ));
            }
            if !image.margin.is_finite() || image.margin < 0.0 {
                return Err(QrStyleError::validation(
                    "image margin must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/options.rs"]
mod tests;
