//! Basic cell shapes shared by the dot styles.

use crate::foundation::core::{Circle, Point, Rect};
use crate::shapes::{CellPath, Primitive, ShapeDescriptor, ShapeKind};

/// Gap left on both sides of a zebra stripe, in pixels.
pub const ZEBRA_GAP: f64 = 1.0;

/// Cell placement plus rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGeometry {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Side length.
    pub size: f64,
}

impl CellGeometry {
    /// Create a cell.
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    fn center(self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

pub fn dot(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    ShapeDescriptor::new(
        ShapeKind::Dot,
        x,
        y,
        size,
        vec![Primitive::Circle(Circle::new(cell.center(), size / 2.0))],
    )
    .rotated(rotation)
}

pub fn square(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    ShapeDescriptor::new(
        ShapeKind::Square,
        x,
        y,
        size,
        vec![Primitive::Rect(Rect::new(x, y, x + size, y + size))],
    )
    .rotated(rotation)
}

/// Square whose right side is a half circle (before rotation).
pub fn side_rounded(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let half = size / 2.0;
    let path = CellPath::move_to(x, y)
        .v(size)
        .h(half)
        .arc(half, false, 0.0, -size)
        .close();
    ShapeDescriptor::new(ShapeKind::SideRounded, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
}

/// Square whose top-right corner is rounded (before rotation).
pub fn corner_rounded(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let half = size / 2.0;
    let path = CellPath::move_to(x, y)
        .v(size)
        .h(size)
        .v(-half)
        .arc(half, false, -half, -half)
        .close();
    ShapeDescriptor::new(ShapeKind::CornerRounded, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
}

/// Quarter disc anchored at the bottom-left corner (before rotation).
pub fn corner_extra_rounded(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let path = CellPath::move_to(x, y)
        .v(size)
        .h(size)
        .arc(size, false, -size, -size)
        .close();
    ShapeDescriptor::new(
        ShapeKind::CornerExtraRounded,
        x,
        y,
        size,
        vec![Primitive::Path(path)],
    )
    .rotated(rotation)
}

/// Square with its bottom-left and top-right corners rounded (before rotation).
pub fn corners_rounded(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let half = size / 2.0;
    let path = CellPath::move_to(x, y)
        .v(half)
        .arc(half, false, half, half)
        .h(half)
        .v(-half)
        .arc(half, false, -half, -half)
        .close();
    ShapeDescriptor::new(ShapeKind::CornersRounded, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
}

fn zebra_gap(size: f64) -> f64 {
    ZEBRA_GAP.min(size / 4.0)
}

/// Isolated zebra cell.
pub fn zebra_dot(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let radius = size / 2.0 - zebra_gap(size);
    ShapeDescriptor::new(
        ShapeKind::ZebraDot,
        x,
        y,
        size,
        vec![Primitive::Circle(Circle::new(cell.center(), radius))],
    )
    .rotated(rotation)
}

/// Stripe end: flat on the left, rounded on the right (before rotation).
pub fn zebra_cap(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let gap = zebra_gap(size);
    let radius = size / 2.0 - gap;
    let path = CellPath::move_to(x, y + gap)
        .h(size / 2.0)
        .arc(radius, true, 0.0, 2.0 * radius)
        .h(-size / 2.0)
        .close();
    ShapeDescriptor::new(ShapeKind::ZebraCap, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
}

/// Stripe body: full width, inset by the gap above and below (before rotation).
pub fn zebra_bar(cell: CellGeometry, rotation: f64) -> ShapeDescriptor {
    let CellGeometry { x, y, size } = cell;
    let gap = zebra_gap(size);
    ShapeDescriptor::new(
        ShapeKind::ZebraBar,
        x,
        y,
        size,
        vec![Primitive::Rect(Rect::new(x, y + gap, x + size, y + size - gap))],
    )
    .rotated(rotation)
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/dot.rs"]
mod tests;
