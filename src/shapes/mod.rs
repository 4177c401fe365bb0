//! Geometry of a single styled cell.
//!
//! Every shape is built in the cell's unrotated frame and carries its rotation separately; the
//! backends apply the rotation about the cell center.

pub(crate) mod corner;
pub(crate) mod dot;

use kurbo::{PathEl, Shape, SvgArc};

use crate::foundation::core::{Affine, BezPath, Circle, Point, Rect, Vec2};

/// Flattening tolerance used when shapes are turned into paths.
pub const PATH_TOLERANCE: f64 = 0.05;

/// Fill rule of a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd; used by ring shapes to punch their hole.
    EvenOdd,
}

/// A drawing primitive in the cell's unrotated frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Full circle.
    Circle(Circle),
    /// Arbitrary outline.
    Path(BezPath),
}

impl Primitive {
    /// Outline of the primitive.
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Rect(r) => r.to_path(PATH_TOLERANCE),
            Self::Circle(c) => c.to_path(PATH_TOLERANCE),
            Self::Path(p) => p.clone(),
        }
    }

    /// Axis-aligned bounds in the unrotated frame.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Circle(c) => c.bounding_box(),
            Self::Path(p) => p.bounding_box(),
        }
    }
}

/// Which library shape a descriptor holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Full circle of diameter `size`.
    Dot,
    /// Full square.
    Square,
    /// Square with one side replaced by a half circle.
    SideRounded,
    /// Square with one corner rounded with radius `size / 2`.
    CornerRounded,
    /// Quarter disc of radius `size`.
    CornerExtraRounded,
    /// Square with two opposite corners rounded.
    CornersRounded,
    /// Circle inset by the stripe gap.
    ZebraDot,
    /// Stripe end with a rounded tip.
    ZebraCap,
    /// Stripe body spanning the full cell.
    ZebraBar,
    /// 7×7 circular ring.
    FrameDot,
    /// 7×7 square ring.
    FrameSquare,
    /// 7×7 rounded-square ring.
    FrameExtraRounded,
    /// 3×3 disc.
    BallDot,
    /// 3×3 square.
    BallSquare,
}

/// A shape placed on the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDescriptor {
    /// Library shape.
    pub kind: ShapeKind,
    /// Left edge of the cell.
    pub x: f64,
    /// Top edge of the cell.
    pub y: f64,
    /// Side length of the (square) cell.
    pub size: f64,
    /// Rotation in radians about the cell center.
    pub rotation: f64,
    /// Fill rule used for all primitives together.
    pub fill_rule: FillRule,
    /// Primitives in the unrotated frame.
    pub primitives: Vec<Primitive>,
}

impl ShapeDescriptor {
    pub(crate) fn new(
        kind: ShapeKind,
        x: f64,
        y: f64,
        size: f64,
        primitives: Vec<Primitive>,
    ) -> Self {
        Self {
            kind,
            x,
            y,
            size,
            rotation: 0.0,
            fill_rule: FillRule::NonZero,
            primitives,
        }
    }

    pub(crate) fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Center of the cell; the rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    /// The cell square.
    pub fn cell(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.size, self.y + self.size)
    }

    /// Rotation transform mapping the unrotated frame onto the surface.
    pub fn transform(&self) -> Affine {
        if self.rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(self.rotation, self.center())
        }
    }

    /// All primitives merged into one surface-space outline.
    pub fn to_path(&self) -> BezPath {
        let transform = self.transform();
        let mut out = BezPath::new();
        for primitive in &self.primitives {
            out.extend(primitive.to_path().elements().iter().map(|&el| transform * el));
        }
        out
    }

    /// Surface-space bounds of the shape.
    pub fn bounds(&self) -> Rect {
        self.to_path().bounding_box()
    }
}

/// Turtle-style path builder mirroring the relative SVG commands the shapes are described with.
pub(crate) struct CellPath {
    path: BezPath,
    current: Point,
    start: Point,
}

impl CellPath {
    pub(crate) fn move_to(x: f64, y: f64) -> Self {
        let start = Point::new(x, y);
        let mut path = BezPath::new();
        path.move_to(start);
        Self {
            path,
            current: start,
            start,
        }
    }

    pub(crate) fn h(mut self, dx: f64) -> Self {
        self.line_by(Vec2::new(dx, 0.0));
        self
    }

    pub(crate) fn v(mut self, dy: f64) -> Self {
        self.line_by(Vec2::new(0.0, dy));
        self
    }

    /// Relative elliptical arc; `sweep` follows the SVG flag.
    pub(crate) fn arc(mut self, radius: f64, sweep: bool, dx: f64, dy: f64) -> Self {
        let to = self.current + Vec2::new(dx, dy);
        let arc = SvgArc {
            from: self.current,
            to,
            radii: Vec2::new(radius, radius),
            x_rotation: 0.0,
            large_arc: false,
            sweep,
        };
        match kurbo::Arc::from_svg_arc(&arc) {
            Some(arc) => {
                for el in arc.append_iter(PATH_TOLERANCE) {
                    self.path.push(el);
                }
            }
            None => self.path.line_to(to),
        }
        self.current = to;
        self
    }

    pub(crate) fn close(mut self) -> BezPath {
        self.path.push(PathEl::ClosePath);
        self.current = self.start;
        self.path
    }

    fn line_by(&mut self, delta: Vec2) {
        self.current += delta;
        self.path.line_to(self.current);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/mod.rs"]
mod tests;
