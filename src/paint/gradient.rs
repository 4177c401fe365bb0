use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::foundation::math::normalize_angle;
use crate::paint::color::Color;

/// Gradient geometry kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    /// Edge-to-edge gradient along a rotated axis through the box center.
    #[default]
    Linear,
    /// Circular gradient centered in the box.
    Radial,
}

/// One gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient, `0..=1`.
    pub offset: f64,
    /// Stop color.
    pub color: Color,
}

impl ColorStop {
    /// Create a stop.
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A user-facing gradient description.
///
/// Stops are applied in the given order; sorting them is the caller's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Linear or radial.
    #[serde(default)]
    pub kind: GradientKind,
    /// Rotation of the gradient axis in radians (linear only).
    #[serde(default)]
    pub rotation: f64,
    /// Ordered color stops. Must not be empty.
    pub color_stops: Vec<ColorStop>,
}

impl GradientSpec {
    /// Linear gradient with the given rotation.
    pub fn linear(rotation: f64, color_stops: Vec<ColorStop>) -> Self {
        Self {
            kind: GradientKind::Linear,
            rotation,
            color_stops,
        }
    }

    /// Radial gradient.
    pub fn radial(color_stops: Vec<ColorStop>) -> Self {
        Self {
            kind: GradientKind::Radial,
            rotation: 0.0,
            color_stops,
        }
    }

    /// Reject gradients that cannot be applied as a whole.
    pub fn validate(&self) -> QrStyleResult<()> {
        if self.color_stops.is_empty() {
            return Err(QrStyleError::validation(
                "gradient must have at least one color stop",
            ));
        }
        if !self.rotation.is_finite() {
            return Err(QrStyleError::validation(
                "gradient rotation must be finite",
            ));
        }
        for stop in &self.color_stops {
            if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
                return Err(QrStyleError::validation(format!(
                    "gradient stop offset {} must be within [0, 1]",
                    stop.offset
                )));
            }
        }
        Ok(())
    }
}

/// Either a solid color or a gradient, as configured for one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintSpec {
    /// Solid fill.
    Solid(Color),
    /// Gradient fill.
    Gradient(GradientSpec),
}

impl PaintSpec {
    /// Validate the gradient, if any.
    pub fn validate(&self) -> QrStyleResult<()> {
        match self {
            Self::Solid(_) => Ok(()),
            Self::Gradient(g) => g.validate(),
        }
    }
}

impl From<Color> for PaintSpec {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<GradientSpec> for PaintSpec {
    fn from(gradient: GradientSpec) -> Self {
        Self::Gradient(gradient)
    }
}

/// A paint resolved against a concrete bounding box, ready for a backend.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedPaint {
    /// Solid fill.
    Solid(Color),
    /// Linear gradient in user space.
    Linear {
        /// Axis start (offset 0).
        start: Point,
        /// Axis end (offset 1).
        end: Point,
        /// Stops in input order.
        stops: Vec<ColorStop>,
    },
    /// Radial gradient in user space.
    Radial {
        /// Gradient center.
        center: Point,
        /// Radius at offset 1.
        radius: f64,
        /// Stops in input order.
        stops: Vec<ColorStop>,
    },
}

/// Resolve a region's paint over `bounds`.
///
/// `additional_rotation` is added to a linear gradient's own rotation (finder corners pass their
/// position's rotation). Returns `None` when the region has no paint configured.
pub fn resolve_paint(
    spec: Option<&PaintSpec>,
    bounds: Rect,
    additional_rotation: f64,
) -> Option<ResolvedPaint> {
    let spec = spec?;
    let gradient = match spec {
        PaintSpec::Solid(color) => return Some(ResolvedPaint::Solid(*color)),
        PaintSpec::Gradient(g) => g,
    };

    let stops = gradient.color_stops.clone();
    Some(match gradient.kind {
        GradientKind::Radial => ResolvedPaint::Radial {
            center: bounds.center(),
            radius: bounds.width().max(bounds.height()) / 2.0,
            stops,
        },
        GradientKind::Linear => {
            let (start, end) =
                linear_gradient_endpoints(bounds, gradient.rotation + additional_rotation);
            ResolvedPaint::Linear { start, end, stops }
        }
    })
}

/// Endpoints of an edge-to-edge gradient line through the center of `bounds` at `rotation`.
///
/// The rotation is reduced into `[0, 2π)` and bucketed by the quadrants around `±π/4` and
/// `±3π/4`; in each bucket the axis runs from one box edge to the opposite one, projected along
/// the rotation's tangent.
pub fn linear_gradient_endpoints(bounds: Rect, rotation: f64) -> (Point, Point) {
    let rotation = normalize_angle(rotation);
    let c = bounds.center();
    let hw = bounds.width() / 2.0;
    let hh = bounds.height() / 2.0;
    let tan = rotation.tan();

    if rotation <= 0.25 * PI || rotation > 1.75 * PI {
        (
            Point::new(c.x - hw, c.y - hh * tan),
            Point::new(c.x + hw, c.y + hh * tan),
        )
    } else if rotation <= 0.75 * PI {
        (
            Point::new(c.x - hw / tan, c.y - hh),
            Point::new(c.x + hw / tan, c.y + hh),
        )
    } else if rotation <= 1.25 * PI {
        (
            Point::new(c.x + hw, c.y + hh * tan),
            Point::new(c.x - hw, c.y - hh * tan),
        )
    } else {
        (
            Point::new(c.x + hw / tan, c.y + hh),
            Point::new(c.x - hw / tan, c.y - hh),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
