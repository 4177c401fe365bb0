use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::options::{ErrorCorrectionLevel, QrShape};

/// Number of modules on each side reserved for the finder patterns when capping the overlay.
const FINDER_AXIS_RESERVE: i64 = 14;

/// Where the matrix lands on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Matrix side length in modules.
    pub count: usize,
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Quiet zone in pixels.
    pub margin: f64,
    /// Side of the usable square: `min(width, height) - 2 * margin`.
    pub min_size: f64,
    /// Side of one module in pixels.
    pub dot_size: f64,
    /// Left edge of the matrix.
    pub x0: f64,
    /// Top edge of the matrix.
    pub y0: f64,
}

/// Floors `value` when pixel snapping is enabled.
pub fn round_size(value: f64, enabled: bool) -> f64 {
    if enabled { value.floor() } else { value }
}

impl GridLayout {
    /// Lay out a `count`-sized matrix on a `width`×`height` surface.
    ///
    /// Fails when the matrix cannot fit: more modules than pixels on either axis, or a margin
    /// that leaves no room for a single pixel per module.
    pub fn new(
        count: usize,
        width: u32,
        height: u32,
        margin: f64,
        shape: QrShape,
        round: bool,
    ) -> QrStyleResult<Self> {
        if count == 0 {
            return Err(QrStyleError::configuration("module matrix is empty"));
        }
        if count > width as usize || count > height as usize {
            return Err(QrStyleError::configuration(format!(
                "the canvas is too small: {count} modules on a {width}x{height} surface"
            )));
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let min_size = w.min(h) - 2.0 * margin;
        let real_size = match shape {
            QrShape::Square => min_size,
            QrShape::Circle => min_size / std::f64::consts::SQRT_2,
        };
        let dot_size = round_size(real_size / count as f64, round);
        if dot_size <= 0.0 || !dot_size.is_finite() {
            return Err(QrStyleError::configuration(format!(
                "the canvas is too small: margin {margin} leaves no room for {count} modules"
            )));
        }

        let n = count as f64;
        Ok(Self {
            count,
            width: w,
            height: h,
            margin,
            min_size,
            dot_size,
            x0: round_size((w - n * dot_size) / 2.0, round),
            y0: round_size((h - n * dot_size) / 2.0, round),
        })
    }

    /// Top-left corner of the matrix.
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// Top-left corner of cell `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.x0 + col as f64 * self.dot_size,
            self.y0 + row as f64 * self.dot_size,
        )
    }

    /// Side of the matrix in pixels.
    pub fn matrix_extent(&self) -> f64 {
        self.count as f64 * self.dot_size
    }

    /// The matrix square.
    pub fn matrix_rect(&self) -> Rect {
        let extent = self.matrix_extent();
        Rect::new(self.x0, self.y0, self.x0 + extent, self.y0 + extent)
    }

    /// The whole surface.
    pub fn surface_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Hidden-dot budget for an overlay using `image_size` of the level's recovery capacity.
    pub fn max_hidden_dots(&self, level: ErrorCorrectionLevel, image_size: f64) -> f64 {
        let n = self.count as f64;
        (image_size * level.cover_fraction() * n * n).floor()
    }

    /// Per-axis cap keeping the overlay clear of the finder patterns; `None` on tiny matrices.
    pub fn max_hidden_axis_dots(&self) -> Option<u32> {
        let cap = self.count as i64 - FINDER_AXIS_RESERVE;
        u32::try_from(cap).ok().filter(|&c| c > 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
