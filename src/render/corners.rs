//! Finder-pattern ("eye") decoration.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rect};
use crate::layout::grid::GridLayout;
use crate::matrix::{FINDER_SIZE, in_ball_mask, in_frame_mask};
use crate::render::dots::{DotRenderer, DotStyle};
use crate::shapes::ShapeDescriptor;
use crate::shapes::corner::{ball_dot, ball_square, frame_dot, frame_extra_rounded, frame_square};
use crate::shapes::dot::CellGeometry;

/// Side of the inner ball in modules.
pub const BALL_SIZE: usize = 3;

/// Shape of the 7×7 finder frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareStyle {
    /// Circular ring.
    Dot,
    /// Square ring.
    Square,
    /// Rounded-square ring.
    ExtraRounded,
    /// A dot style tiled over the frame mask.
    Tiled(DotStyle),
}

/// Shape of the 3×3 finder ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotStyle {
    /// Disc.
    Dot,
    /// Square.
    Square,
    /// A dot style tiled over the ball mask.
    Tiled(DotStyle),
}

/// One of the three finder positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinderCorner {
    /// 0 for the left column of eyes, 1 for the right.
    pub column: u8,
    /// 0 for the top row of eyes, 1 for the bottom.
    pub row: u8,
    /// Rotation applied to dedicated shapes and linear gradients.
    pub rotation: f64,
}

/// Top-left, top-right, bottom-left.
pub const FINDER_CORNERS: [FinderCorner; 3] = [
    FinderCorner {
        column: 0,
        row: 0,
        rotation: 0.0,
    },
    FinderCorner {
        column: 1,
        row: 0,
        rotation: FRAC_PI_2,
    },
    FinderCorner {
        column: 0,
        row: 1,
        rotation: -FRAC_PI_2,
    },
];

impl FinderCorner {
    /// Top-left corner of the 7×7 region.
    pub fn origin(&self, layout: &GridLayout) -> Point {
        let span = layout.dot_size * (layout.count as f64 - FINDER_SIZE as f64);
        Point::new(
            layout.x0 + f64::from(self.column) * span,
            layout.y0 + f64::from(self.row) * span,
        )
    }

    /// Bounds of the frame; also the gradient box of the frame paint.
    pub fn frame_bounds(&self, layout: &GridLayout) -> Rect {
        let o = self.origin(layout);
        let s = layout.dot_size * FINDER_SIZE as f64;
        Rect::new(o.x, o.y, o.x + s, o.y + s)
    }

    /// Bounds of the ball, two modules inside the frame.
    pub fn ball_bounds(&self, layout: &GridLayout) -> Rect {
        let o = self.origin(layout);
        let inset = 2.0 * layout.dot_size;
        let s = layout.dot_size * BALL_SIZE as f64;
        Rect::new(o.x + inset, o.y + inset, o.x + inset + s, o.y + inset + s)
    }

    /// Resource-name suffix of this position, `"{column}-{row}"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.column, self.row)
    }
}

/// Emits frame and ball shapes for the finder positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerRenderer {
    frame: CornerSquareStyle,
    ball: CornerDotStyle,
}

impl CornerRenderer {
    /// Unconfigured parts tile `fallback` over their mask.
    pub fn new(
        frame: Option<CornerSquareStyle>,
        ball: Option<CornerDotStyle>,
        fallback: DotStyle,
    ) -> Self {
        Self {
            frame: frame.unwrap_or(CornerSquareStyle::Tiled(fallback)),
            ball: ball.unwrap_or(CornerDotStyle::Tiled(fallback)),
        }
    }

    /// Effective frame style.
    pub fn frame_style(&self) -> CornerSquareStyle {
        self.frame
    }

    /// Effective ball style.
    pub fn ball_style(&self) -> CornerDotStyle {
        self.ball
    }

    /// Frame shapes of one corner.
    pub fn frame_shapes(&self, corner: &FinderCorner, layout: &GridLayout) -> Vec<ShapeDescriptor> {
        let bounds = corner.frame_bounds(layout);
        let (x, y, s, r) = (bounds.x0, bounds.y0, bounds.width(), corner.rotation);
        match self.frame {
            CornerSquareStyle::Dot => vec![frame_dot(x, y, s, r)],
            CornerSquareStyle::Square => vec![frame_square(x, y, s, r)],
            CornerSquareStyle::ExtraRounded => vec![frame_extra_rounded(x, y, s, r)],
            CornerSquareStyle::Tiled(style) => {
                tile_mask(style, bounds.origin(), layout.dot_size, FINDER_SIZE, in_frame_mask)
            }
        }
    }

    /// Ball shapes of one corner.
    pub fn ball_shapes(&self, corner: &FinderCorner, layout: &GridLayout) -> Vec<ShapeDescriptor> {
        match self.ball {
            CornerDotStyle::Dot | CornerDotStyle::Square => {
                let bounds = corner.ball_bounds(layout);
                let (x, y, s, r) = (bounds.x0, bounds.y0, bounds.width(), corner.rotation);
                if self.ball == CornerDotStyle::Dot {
                    vec![ball_dot(x, y, s, r)]
                } else {
                    vec![ball_square(x, y, s, r)]
                }
            }
            // The ball mask is addressed in 7×7 frame coordinates.
            CornerDotStyle::Tiled(style) => tile_mask(
                style,
                corner.origin(layout),
                layout.dot_size,
                FINDER_SIZE,
                in_ball_mask,
            ),
        }
    }
}

/// Tiles `style` over the cells of a `side`×`side` mask; neighbors are read from the mask.
fn tile_mask(
    style: DotStyle,
    origin: Point,
    dot_size: f64,
    side: usize,
    mask: fn(i64, i64) -> bool,
) -> Vec<ShapeDescriptor> {
    let renderer = DotRenderer::new(style);
    let mut out = Vec::new();
    for row in 0..side as i64 {
        for col in 0..side as i64 {
            if !mask(row, col) {
                continue;
            }
            let probe = move |dx: i32, dy: i32| mask(row + i64::from(dy), col + i64::from(dx));
            let cell = CellGeometry::new(
                origin.x + col as f64 * dot_size,
                origin.y + row as f64 * dot_size,
                dot_size,
            );
            out.push(renderer.shape_at(cell, &probe));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/corners.rs"]
mod tests;
