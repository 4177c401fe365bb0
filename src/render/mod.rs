//! Rendering: dot and corner renderers plus the raster and vector backends they draw through.

/// Drawing contract and raster frame type.
pub mod backend;
pub mod corners;
/// Raster surface backed by `vello_cpu`.
pub mod cpu;
pub mod dots;
pub mod svg;
