use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::Shape as _;

use crate::assets::OverlayImage;
use crate::assets::loader::{ImageLoader, ImageRequest};
use crate::foundation::core::{Rect, RoundedRect, SessionId};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::layout::grid::GridLayout;
use crate::layout::occlusion::{OcclusionRequest, OcclusionResult, calculate_image_size};
use crate::matrix::{FilteredMatrix, ModuleMatrix, is_finder_cell};
use crate::options::{ImageOptions, QrShape, QrStyleOptions};
use crate::paint::gradient::{PaintSpec, resolve_paint};
use crate::render::backend::{Backend, Region};
use crate::render::corners::{CornerRenderer, FINDER_CORNERS};
use crate::render::dots::DotRenderer;
use crate::shapes::{FillRule, PATH_TOLERANCE, Primitive, ShapeDescriptor};

/// Orchestrator states, in the order a session may visit them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing drawn yet.
    Empty,
    /// Background committed.
    BackgroundDrawn,
    /// Finder exclusion predicate fixed for the matrix size.
    FinderMasksComputed,
    /// Suspended on overlay image acquisition.
    ImagePending,
    /// All data modules emitted.
    DotsDrawn,
    /// All three finder patterns emitted.
    CornersDrawn,
    /// Overlay image drawn.
    ImageDrawn,
    /// Surface handed over.
    Complete,
}

/// What happened to the configured overlay image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// No image configured.
    NotConfigured,
    /// Image drawn.
    Drawn,
    /// Image could not be acquired; rendered without overlay or occlusion gap.
    Failed(String),
}

/// Summary of one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    /// Session that produced the surface.
    pub session: SessionId,
    /// States visited, in order.
    pub states: Vec<SessionState>,
    /// Matrix placement.
    pub layout: GridLayout,
    /// Overlay sizing; zero without an overlay.
    pub occlusion: OcclusionResult,
    /// Overlay result.
    pub overlay: OverlayOutcome,
    /// Number of data-module shapes emitted, decorative ring included.
    pub dots_drawn: usize,
}

/// A finished surface with its report.
#[derive(Clone, Debug)]
pub struct RenderOutput<S> {
    /// The backend's surface.
    pub surface: S,
    /// How it was produced.
    pub report: RenderReport,
}

/// Detects that a newer session has been started by the same styler.
#[derive(Clone, Debug)]
pub(crate) struct SupersessionToken {
    current: Arc<AtomicU64>,
    mine: u64,
}

impl SupersessionToken {
    pub(crate) fn new(current: Arc<AtomicU64>, mine: u64) -> Self {
        Self { current, mine }
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.mine
    }
}

/// One render pass from an empty surface to a finished styled graphic.
///
/// The session owns its backend and resource namespace; every paint and clip name it creates
/// ends in its [`SessionId`].
pub struct RenderSession<M, B> {
    id: SessionId,
    options: QrStyleOptions,
    matrix: M,
    backend: B,
    token: Option<SupersessionToken>,
    states: Vec<SessionState>,
}

impl<M, B> std::fmt::Debug for RenderSession<M, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("id", &self.id)
            .field("states", &self.states)
            .finish()
    }
}

impl<M: ModuleMatrix, B: Backend> RenderSession<M, B> {
    /// Validate the options and bind them to a matrix and a surface.
    pub fn new(
        id: SessionId,
        options: QrStyleOptions,
        matrix: M,
        backend: B,
    ) -> QrStyleResult<Self> {
        options.validate()?;
        let (w, h) = backend.size();
        if (w, h) != (options.width, options.height) {
            return Err(QrStyleError::resource(format!(
                "surface is {w}x{h} but the options ask for {}x{}",
                options.width, options.height
            )));
        }
        Ok(Self {
            id,
            options,
            matrix,
            backend,
            token: None,
            states: vec![SessionState::Empty],
        })
    }

    pub(crate) fn with_token(mut self, token: SupersessionToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Identifier namespacing this session's resources.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether a newer session of the same styler exists.
    pub fn is_superseded(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_current())
    }

    fn enter(&mut self, state: SessionState) {
        tracing::debug!(session = %self.id, ?state, "session state");
        self.states.push(state);
    }

    fn ensure_current(&self) -> QrStyleResult<()> {
        if self.is_superseded() {
            tracing::debug!(session = %self.id, "session superseded, discarding");
            return Err(QrStyleError::Superseded(self.id.0));
        }
        Ok(())
    }

    /// Run the pass. The only suspension point is overlay image acquisition.
    #[tracing::instrument(skip_all, fields(session = %self.id))]
    pub async fn render(
        mut self,
        loader: &dyn ImageLoader,
    ) -> QrStyleResult<RenderOutput<B::Surface>> {
        self.ensure_current()?;
        let count = self.matrix.module_count();
        let layout = GridLayout::new(
            count,
            self.options.width,
            self.options.height,
            self.options.margin,
            self.options.shape,
            self.options.dots.round_size,
        )?;

        self.draw_background(&layout);
        self.enter(SessionState::BackgroundDrawn);

        // Finder cells are excluded by a closed-form predicate over the matrix size.
        self.enter(SessionState::FinderMasksComputed);

        let mut overlay = OverlayOutcome::NotConfigured;
        let mut image = None;
        let mut occlusion = OcclusionResult::ZERO;
        if let Some(image_options) = self.options.image.clone() {
            self.enter(SessionState::ImagePending);
            let request = ImageRequest {
                source: image_options.source.clone(),
                cross_origin: image_options.cross_origin.clone(),
            };
            let loaded = loader.load(&request).await;
            self.ensure_current()?;
            match loaded.and_then(|img| self.prepare_overlay(&layout, &image_options, img)) {
                Ok((img, sized)) => {
                    occlusion = sized;
                    image = Some((img, image_options));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "overlay image unusable, rendering without it");
                    overlay = OverlayOutcome::Failed(err.to_string());
                }
            }
        }

        let hide = image.as_ref().is_some_and(|(_, o)| o.hide_background_dots);
        let dots_drawn = self.draw_dots(&layout, |row, col| {
            !is_finder_cell(row, col, count) && !(hide && occlusion.hides(row, col, count))
        });
        self.enter(SessionState::DotsDrawn);

        self.draw_corners(&layout);
        self.enter(SessionState::CornersDrawn);

        if let Some((img, image_options)) = &image {
            let dst = overlay_rect(&layout, &occlusion, image_options.margin);
            self.backend.draw_image(img, dst)?;
            overlay = OverlayOutcome::Drawn;
            self.enter(SessionState::ImageDrawn);
        }

        let surface = self.backend.finish()?;
        self.states.push(SessionState::Complete);
        tracing::debug!(session = %self.id, dots_drawn, "render complete");

        Ok(RenderOutput {
            surface,
            report: RenderReport {
                session: self.id,
                states: self.states,
                layout,
                occlusion,
                overlay,
                dots_drawn,
            },
        })
    }

    /// Size the loaded overlay and let the backend convert it before any dot is drawn.
    fn prepare_overlay(
        &mut self,
        layout: &GridLayout,
        image_options: &ImageOptions,
        image: OverlayImage,
    ) -> QrStyleResult<(OverlayImage, OcclusionResult)> {
        let occlusion = overlay_size(layout, &self.options, image_options, &image);
        tracing::debug!(?occlusion, "overlay sized");
        let dst = overlay_rect(layout, &occlusion, image_options.margin);
        self.backend.prepare_image(&image, dst)?;
        Ok((image, occlusion))
    }

    /// Resolve `spec` over `bounds` and register it; returns the resource name when painted.
    fn define(
        &mut self,
        name: &str,
        spec: Option<&PaintSpec>,
        bounds: Rect,
        rotation: f64,
    ) -> Option<String> {
        let paint = resolve_paint(spec, bounds, rotation)?;
        self.backend.define_paint(name, &paint);
        Some(name.to_owned())
    }

    fn fill_region(
        &mut self,
        name: &str,
        paint: Option<&str>,
        bounds: Rect,
        shapes: &[ShapeDescriptor],
    ) {
        self.backend.begin_region(&Region {
            name,
            paint,
            bounds,
        });
        for shape in shapes {
            self.backend.draw_shape(shape);
        }
        self.backend.end_region();
    }

    fn draw_background(&mut self, layout: &GridLayout) {
        let name = format!("background-color-{}", self.id);
        let surface = layout.surface_rect();
        let spec = self.options.background.paint.clone();
        let Some(paint) = self.define(&name, spec.as_ref(), surface, 0.0) else {
            return;
        };

        let round = self.options.background.round;
        let primitive = if round > 0.0 {
            let side = layout.width.min(layout.height);
            let x = (layout.width - side) / 2.0;
            let y = (layout.height - side) / 2.0;
            let rr = RoundedRect::new(x, y, x + side, y + side, round * side / 2.0);
            Primitive::Path(rr.to_path(PATH_TOLERANCE))
        } else {
            Primitive::Rect(surface)
        };

        self.backend.begin_region(&Region {
            name: &name,
            paint: Some(&paint),
            bounds: surface,
        });
        self.backend.begin_shape(surface.center(), 0.0, FillRule::NonZero);
        self.backend.emit(&primitive);
        self.backend.end_shape();
        self.backend.end_region();
    }

    fn dots_paint_name(&self) -> String {
        format!("dot-color-{}", self.id)
    }

    fn draw_dots(&mut self, layout: &GridLayout, filter: impl Fn(usize, usize) -> bool) -> usize {
        let renderer = DotRenderer::new(self.options.dots.style);
        let mut shapes = {
            let filtered = FilteredMatrix::new(&self.matrix, &filter);
            renderer.shapes(&filtered, layout)
        };
        if self.options.shape == QrShape::Circle {
            shapes.extend(renderer.ring_shapes(&self.matrix, layout));
        }

        let name = self.dots_paint_name();
        let surface = layout.surface_rect();
        let paint = self.define(&name, self.options.dots.paint.clone().as_ref(), surface, 0.0);
        self.fill_region(&name, paint.as_deref(), surface, &shapes);
        shapes.len()
    }

    fn draw_corners(&mut self, layout: &GridLayout) {
        let renderer = CornerRenderer::new(
            self.options.corners_square.style,
            self.options.corners_dot.style,
            self.options.dots.style,
        );
        let dots_paint = self
            .backend
            .has_paint(&self.dots_paint_name())
            .then(|| self.dots_paint_name());
        let frame_spec = self.options.corners_square.paint.clone();
        let ball_spec = self.options.corners_dot.paint.clone();

        for corner in FINDER_CORNERS {
            let key = corner.key();

            let bounds = corner.frame_bounds(layout);
            let (name, paint) = match &frame_spec {
                Some(spec) => {
                    let name = format!("corners-square-color-{key}-{}", self.id);
                    let paint = self.define(&name, Some(spec), bounds, corner.rotation);
                    (name, paint)
                }
                None => (format!("corners-square-{key}-{}", self.id), dots_paint.clone()),
            };
            let shapes = renderer.frame_shapes(&corner, layout);
            self.fill_region(&name, paint.as_deref(), bounds, &shapes);

            let bounds = corner.ball_bounds(layout);
            let (name, paint) = match &ball_spec {
                Some(spec) => {
                    let name = format!("corners-dot-color-{key}-{}", self.id);
                    let paint = self.define(&name, Some(spec), bounds, corner.rotation);
                    (name, paint)
                }
                None => (format!("corners-dot-{key}-{}", self.id), dots_paint.clone()),
            };
            let shapes = renderer.ball_shapes(&corner, layout);
            self.fill_region(&name, paint.as_deref(), bounds, &shapes);
        }
    }
}

fn overlay_size(
    layout: &GridLayout,
    options: &QrStyleOptions,
    image_options: &ImageOptions,
    image: &OverlayImage,
) -> OcclusionResult {
    let (original_width, original_height) = image.size();
    calculate_image_size(OcclusionRequest {
        original_width,
        original_height,
        max_hidden_dots: layout.max_hidden_dots(options.error_correction, image_options.image_size),
        max_hidden_axis_dots: layout.max_hidden_axis_dots(),
        dot_size: layout.dot_size,
    })
}

/// Where the overlay lands: centered on the matrix and inset by the image margin.
pub fn overlay_rect(layout: &GridLayout, occlusion: &OcclusionResult, margin: f64) -> Rect {
    let extent = layout.matrix_extent();
    let x = layout.x0 + margin + (extent - occlusion.width) / 2.0;
    let y = layout.y0 + margin + (extent - occlusion.height) / 2.0;
    let w = (occlusion.width - 2.0 * margin).max(0.0);
    let h = (occlusion.height - 2.0 * margin).max(0.0);
    Rect::new(x, y, x + w, y + h)
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
