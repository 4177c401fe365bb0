use serde::{Deserialize, Serialize};

/// Inputs of [`calculate_image_size`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionRequest {
    /// Intrinsic image width in pixels.
    pub original_width: f64,
    /// Intrinsic image height in pixels.
    pub original_height: f64,
    /// Upper bound on `hide_x_dots * hide_y_dots`.
    pub max_hidden_dots: f64,
    /// Optional cap on the hidden count along either axis.
    pub max_hidden_axis_dots: Option<u32>,
    /// Size of one matrix cell in pixels.
    pub dot_size: f64,
}

/// Overlay size and the centered block of cells it hides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OcclusionResult {
    /// Overlay width in pixels.
    pub width: f64,
    /// Overlay height in pixels.
    pub height: f64,
    /// Hidden matrix columns (odd, or zero for degenerate input).
    pub hide_x_dots: u32,
    /// Hidden matrix rows (odd, or zero for degenerate input).
    pub hide_y_dots: u32,
}

impl OcclusionResult {
    /// The zero result returned for degenerate input.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        hide_x_dots: 0,
        hide_y_dots: 0,
    };

    /// Whether cell `(row, col)` of a `count`-sized matrix lies under the overlay.
    pub fn hides(&self, row: usize, col: usize, count: usize) -> bool {
        let within = |i: usize, hidden: u32| {
            let i = i as f64;
            let n = count as f64;
            let h = f64::from(hidden);
            i >= (n - h) / 2.0 && i < (n + h) / 2.0
        };
        within(row, self.hide_y_dots) && within(col, self.hide_x_dots)
    }
}

/// Fit an overlay image into the matrix.
///
/// The width axis is sized first from the aspect ratio and the hidden-dot budget, forced odd so
/// the hidden block stays centered; the height axis follows. If the pair overshoots the budget
/// or the per-axis cap, the height axis is shrunk two rows at a time until the derived pair fits
/// (or a single row is left) and the width is derived back from it.
pub fn calculate_image_size(req: OcclusionRequest) -> OcclusionResult {
    let OcclusionRequest {
        original_width,
        original_height,
        max_hidden_dots,
        max_hidden_axis_dots,
        dot_size,
    } = req;

    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !(positive(original_width)
        && positive(original_height)
        && positive(max_hidden_dots)
        && positive(dot_size))
    {
        return OcclusionResult::ZERO;
    }

    // A zero axis cap means "no cap".
    let axis_cap = max_hidden_axis_dots.filter(|&c| c > 0).map(i64::from);
    let k = original_height / original_width;

    let mut hide_x = ((max_hidden_dots / k).sqrt().floor() as i64).max(1);
    if let Some(cap) = axis_cap
        && cap < hide_x
    {
        hide_x = cap;
    }
    if hide_x % 2 == 0 {
        hide_x -= 1;
    }
    let mut width = hide_x as f64 * dot_size;

    let mut hide_y = 1 + 2 * ((hide_x as f64 * k - 1.0) / 2.0).ceil() as i64;
    let mut height = (width * k).round();

    let over_budget = (hide_x * hide_y) as f64 > max_hidden_dots;
    let over_axis = axis_cap.is_some_and(|cap| cap < hide_y);
    if over_budget || over_axis {
        match axis_cap {
            Some(cap) if cap < hide_y => {
                hide_y = cap;
                if hide_y % 2 == 0 {
                    hide_y -= 1;
                }
            }
            _ if hide_y > 1 => {
                hide_y -= 2;
                while hide_y > 1
                    && (columns_for_rows(hide_y, k) * hide_y) as f64 > max_hidden_dots
                {
                    hide_y -= 2;
                }
            }
            _ => {
                // A single hidden row is already the minimum; shrink the width axis instead.
                let mut limit = max_hidden_dots.floor() as i64;
                if let Some(cap) = axis_cap {
                    limit = limit.min(cap);
                }
                hide_x = limit.max(1);
                if hide_x % 2 == 0 {
                    hide_x -= 1;
                }
                width = hide_x as f64 * dot_size;
                height = (width * k).round();
                return OcclusionResult {
                    width,
                    height,
                    hide_x_dots: u32::try_from(hide_x).unwrap_or(1),
                    hide_y_dots: 1,
                };
            }
        }
        height = hide_y as f64 * dot_size;
        hide_x = columns_for_rows(hide_y, k);
        width = (height / k).round();
    }

    OcclusionResult {
        width,
        height,
        hide_x_dots: u32::try_from(hide_x.max(1)).unwrap_or(1),
        hide_y_dots: u32::try_from(hide_y.max(1)).unwrap_or(1),
    }
}

/// Smallest odd column count covering `rows` hidden rows at aspect ratio `k` (height / width).
fn columns_for_rows(rows: i64, k: f64) -> i64 {
    1 + 2 * ((rows as f64 / k - 1.0) / 2.0).ceil() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/layout/occlusion.rs"]
mod tests;
