//! Solid colors, gradient specs, and the compositor that resolves them into per-region paints.

pub(crate) mod color;
pub(crate) mod gradient;
