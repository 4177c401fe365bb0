use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::loader::{FsImageLoader, ImageLoader};
use crate::foundation::core::SessionId;
use crate::foundation::error::QrStyleResult;
use crate::matrix::ModuleMatrix;
use crate::options::QrStyleOptions;
use crate::render::backend::{Backend, FrameRGBA};
use crate::render::cpu::CpuBackend;
use crate::render::svg::{SvgBackend, SvgDocument};
use crate::session::render_session::{RenderOutput, RenderSession, SupersessionToken};

/// Long-lived styling front end.
///
/// Holds validated options and hands out [`RenderSession`]s. Starting a session, or replacing
/// the options, supersedes every session started before it: a superseded session that is still
/// waiting for its overlay image fails with [`crate::QrStyleError::Superseded`] instead of
/// drawing further.
pub struct QrStyler {
    options: QrStyleOptions,
    generation: Arc<AtomicU64>,
    loader: Arc<dyn ImageLoader>,
}

impl std::fmt::Debug for QrStyler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrStyler")
            .field("options", &self.options)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

impl QrStyler {
    /// Validate `options` and build a styler that loads images from the filesystem.
    pub fn new(options: QrStyleOptions) -> QrStyleResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            generation: Arc::new(AtomicU64::new(0)),
            loader: Arc::new(FsImageLoader::new()),
        })
    }

    /// Replace the image loader.
    pub fn with_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Current options.
    pub fn options(&self) -> &QrStyleOptions {
        &self.options
    }

    /// Loader used by the blocking render helpers.
    pub fn loader(&self) -> &dyn ImageLoader {
        self.loader.as_ref()
    }

    /// Swap in new options. In-flight sessions are superseded; invalid options leave the
    /// styler untouched.
    pub fn update(&mut self, options: QrStyleOptions) -> QrStyleResult<()> {
        options.validate()?;
        self.options = options;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "styler options updated");
        Ok(())
    }

    /// Start a session over `matrix` drawing into `backend`.
    pub fn session<M: ModuleMatrix, B: Backend>(
        &self,
        matrix: M,
        backend: B,
    ) -> QrStyleResult<RenderSession<M, B>> {
        let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let token = SupersessionToken::new(Arc::clone(&self.generation), id);
        Ok(
            RenderSession::new(SessionId(id), self.options.clone(), matrix, backend)?
                .with_token(token),
        )
    }

    /// Render to premultiplied RGBA8, blocking on the image loader.
    pub fn render_raster<M: ModuleMatrix>(
        &self,
        matrix: M,
    ) -> QrStyleResult<RenderOutput<FrameRGBA>> {
        let backend = CpuBackend::new(self.options.width, self.options.height)?;
        let session = self.session(matrix, backend)?;
        pollster::block_on(session.render(self.loader.as_ref()))
    }

    /// Render to an SVG document, blocking on the image loader.
    pub fn render_svg<M: ModuleMatrix>(
        &self,
        matrix: M,
    ) -> QrStyleResult<RenderOutput<SvgDocument>> {
        let backend = SvgBackend::new(self.options.width, self.options.height);
        let session = self.session(matrix, backend)?;
        pollster::block_on(session.render(self.loader.as_ref()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/styler.rs"]
mod tests;
