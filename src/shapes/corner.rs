//! Dedicated finder-pattern shapes: 7×7 frames and 3×3 balls.

use kurbo::Shape;

use crate::foundation::core::{BezPath, Circle, Point, Rect, RoundedRect};
use crate::shapes::{FillRule, PATH_TOLERANCE, Primitive, ShapeDescriptor, ShapeKind};

fn ring(outer: impl Shape, inner: impl Shape) -> BezPath {
    let mut path = outer.to_path(PATH_TOLERANCE);
    path.extend(inner.path_elements(PATH_TOLERANCE));
    path
}

fn center(x: f64, y: f64, size: f64) -> Point {
    Point::new(x + size / 2.0, y + size / 2.0)
}

/// Circular ring; `size` is the full 7-module side.
pub fn frame_dot(x: f64, y: f64, size: f64, rotation: f64) -> ShapeDescriptor {
    let thickness = size / 7.0;
    let c = center(x, y, size);
    let path = ring(
        Circle::new(c, size / 2.0),
        Circle::new(c, size / 2.0 - thickness),
    );
    ShapeDescriptor::new(ShapeKind::FrameDot, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
        .with_fill_rule(FillRule::EvenOdd)
}

/// Square ring one module thick.
pub fn frame_square(x: f64, y: f64, size: f64, rotation: f64) -> ShapeDescriptor {
    let thickness = size / 7.0;
    let path = ring(
        Rect::new(x, y, x + size, y + size),
        Rect::new(x + thickness, y + thickness, x + size - thickness, y + size - thickness),
    );
    ShapeDescriptor::new(ShapeKind::FrameSquare, x, y, size, vec![Primitive::Path(path)])
        .rotated(rotation)
        .with_fill_rule(FillRule::EvenOdd)
}

/// Rounded-square ring: outer corner radius 2.5 modules, inner 1.5.
pub fn frame_extra_rounded(x: f64, y: f64, size: f64, rotation: f64) -> ShapeDescriptor {
    let module = size / 7.0;
    let path = ring(
        RoundedRect::new(x, y, x + size, y + size, 2.5 * module),
        RoundedRect::new(
            x + module,
            y + module,
            x + size - module,
            y + size - module,
            1.5 * module,
        ),
    );
    ShapeDescriptor::new(
        ShapeKind::FrameExtraRounded,
        x,
        y,
        size,
        vec![Primitive::Path(path)],
    )
    .rotated(rotation)
    .with_fill_rule(FillRule::EvenOdd)
}

/// Disc; `size` is the 3-module side.
pub fn ball_dot(x: f64, y: f64, size: f64, rotation: f64) -> ShapeDescriptor {
    ShapeDescriptor::new(
        ShapeKind::BallDot,
        x,
        y,
        size,
        vec![Primitive::Circle(Circle::new(center(x, y, size), size / 2.0))],
    )
    .rotated(rotation)
}

pub fn ball_square(x: f64, y: f64, size: f64, rotation: f64) -> ShapeDescriptor {
    ShapeDescriptor::new(
        ShapeKind::BallSquare,
        x,
        y,
        size,
        vec![Primitive::Rect(Rect::new(x, y, x + size, y + size))],
    )
    .rotated(rotation)
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/corner.rs"]
mod tests;
