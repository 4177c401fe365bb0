//! qrstyle turns a QR module matrix into a styled graphic.
//!
//! The matrix itself comes from any QR encoder through [`ModuleMatrix`]; qrstyle only decides
//! how each module looks:
//!
//! - Describe the look with [`QrStyleOptions`] (dot style, finder corners, paints, overlay image)
//! - Create a [`QrStyler`] and render to a raster [`FrameRGBA`] or an [`SvgDocument`]
//! - Or drive a [`RenderSession`] directly against any [`Backend`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod layout;
pub mod matrix;
pub mod options;
pub(crate) mod paint;
pub mod render;
pub mod session;
pub mod shapes;

pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8Premul, SessionId, Vec2};
pub use crate::foundation::error::{QrStyleError, QrStyleResult};

pub use crate::assets::OverlayImage;
pub use crate::assets::decode::{decode_image, decode_overlay, decode_svg};
pub use crate::assets::loader::{FsImageLoader, ImageFuture, ImageLoader, ImageRequest, ImageSource};
pub use crate::layout::grid::GridLayout;
pub use crate::layout::occlusion::{OcclusionRequest, OcclusionResult, calculate_image_size};
pub use crate::matrix::{BitMatrix, ModuleMatrix};
pub use crate::options::{
    BackgroundOptions, CornerDotOptions, CornerSquareOptions, DotsOptions, ErrorCorrectionLevel,
    ImageOptions, QrShape, QrStyleOptions,
};
pub use crate::paint::color::Color;
pub use crate::paint::gradient::{
    ColorStop, GradientKind, GradientSpec, PaintSpec, ResolvedPaint, resolve_paint,
};
pub use crate::render::backend::{Backend, FrameRGBA, Region};
pub use crate::render::corners::{CornerDotStyle, CornerSquareStyle};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::dots::DotStyle;
pub use crate::render::svg::{SvgBackend, SvgDocument};
pub use crate::session::render_session::{
    OverlayOutcome, RenderOutput, RenderReport, RenderSession, SessionState,
};
pub use crate::session::styler::QrStyler;
pub use crate::shapes::dot::CellGeometry;
