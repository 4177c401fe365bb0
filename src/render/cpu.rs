use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::OverlayImage;
use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_size};
use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::paint::color::Color;
use crate::paint::gradient::{ColorStop, ResolvedPaint};
use crate::render::backend::{Backend, FrameRGBA, Region};
use crate::shapes::{FillRule, Primitive};

/// Raster surface drawn with `vello_cpu`.
///
/// Rotation is applied to each shape's outline before it is filled, so gradients stay in surface
/// space like on the vector surface.
pub struct CpuBackend {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    paints: HashMap<String, ResolvedPaint>,
    region_paint: Option<ResolvedPaint>,
    shape: Option<PendingShape>,
    overlay: Option<PreparedOverlay>,
}

struct PreparedOverlay {
    source: Arc<Vec<u8>>,
    dst: Rect,
    pixmap: Arc<vello_cpu::Pixmap>,
}

struct PendingShape {
    transform: Affine,
    fill_rule: FillRule,
    path: BezPath,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("paints", &self.paints.len())
            .finish()
    }
}

impl CpuBackend {
    /// Transparent surface of `width`×`height` pixels.
    pub fn new(width: u32, height: u32) -> QrStyleResult<Self> {
        if width == 0 || height == 0 {
            return Err(QrStyleError::resource(format!(
                "raster surface must not be empty, got {width}x{height}"
            )));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| QrStyleError::resource("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| QrStyleError::resource("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            paints: HashMap::new(),
            region_paint: None,
            shape: None,
            overlay: None,
        })
    }

    fn apply_paint(&mut self, paint: &ResolvedPaint) {
        match paint {
            ResolvedPaint::Solid(color) => self.ctx.set_paint(color_to_cpu(*color)),
            ResolvedPaint::Linear { start, end, stops } => {
                let stops = stops_to_cpu(stops);
                self.ctx.set_paint(
                    vello_cpu::peniko::Gradient::new_linear(
                        point_to_cpu(*start),
                        point_to_cpu(*end),
                    )
                    .with_stops(stops.as_slice()),
                );
            }
            ResolvedPaint::Radial {
                center,
                radius,
                stops,
            } => {
                let stops = stops_to_cpu(stops);
                self.ctx.set_paint(
                    vello_cpu::peniko::Gradient::new_radial(point_to_cpu(*center), *radius as f32)
                        .with_stops(stops.as_slice()),
                );
            }
        }
    }
}

impl Backend for CpuBackend {
    type Surface = FrameRGBA;

    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn has_paint(&self, name: &str) -> bool {
        self.paints.contains_key(name)
    }

    fn define_paint(&mut self, name: &str, paint: &ResolvedPaint) {
        self.paints
            .entry(name.to_owned())
            .or_insert_with(|| paint.clone());
    }

    fn begin_region(&mut self, region: &Region<'_>) {
        self.region_paint = region.paint.and_then(|name| self.paints.get(name).cloned());
    }

    fn begin_shape(&mut self, center: Point, rotation: f64, fill_rule: FillRule) {
        let transform = if rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(rotation, center)
        };
        self.shape = Some(PendingShape {
            transform,
            fill_rule,
            path: BezPath::new(),
        });
    }

    fn emit(&mut self, primitive: &Primitive) {
        if let Some(shape) = self.shape.as_mut() {
            let transform = shape.transform;
            shape
                .path
                .extend(primitive.to_path().elements().iter().map(|&el| transform * el));
        }
    }

    fn end_shape(&mut self) {
        let Some(shape) = self.shape.take() else {
            return;
        };
        let Some(paint) = self.region_paint.clone() else {
            return;
        };
        self.apply_paint(&paint);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_fill_rule(match shape.fill_rule {
            FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
            FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
        });
        self.ctx.fill_path(&bezpath_to_cpu(&shape.path));
    }

    fn end_region(&mut self) {
        self.region_paint = None;
    }

    fn prepare_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()> {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }
        let pixmap = overlay_pixmap(image, dst)?;
        self.overlay = Some(PreparedOverlay {
            source: image.rgba8_premul.clone(),
            dst,
            pixmap: Arc::new(pixmap),
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()> {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }

        let pixmap = match self.overlay.take() {
            Some(prepared)
                if Arc::ptr_eq(&prepared.source, &image.rgba8_premul) && prepared.dst == dst =>
            {
                prepared.pixmap
            }
            _ => Arc::new(overlay_pixmap(image, dst)?),
        };
        let (w, h) = (f64::from(pixmap.width()), f64::from(pixmap.height()));
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(pixmap),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let transform = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / w, dst.height() / h);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn finish(mut self) -> QrStyleResult<FrameRGBA> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stops_to_cpu(stops: &[ColorStop]) -> Vec<vello_cpu::peniko::ColorStop> {
    stops
        .iter()
        .map(|s| vello_cpu::peniko::ColorStop::from((s.offset as f32, color_to_cpu(s.color))))
        .collect()
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Pixmap for drawing `image` into `dst`: SVGs are rasterized at draw size, rasters too large
/// for a `vello_cpu` pixmap are downscaled first.
fn overlay_pixmap(image: &OverlayImage, dst: Rect) -> QrStyleResult<vello_cpu::Pixmap> {
    if let Some(tree) = &image.svg {
        let (w, h) = svg_raster_size(dst.width(), dst.height())?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(tree, w, h)?;
        return image_premul_bytes_to_pixmap(&rgba8_premul, w, h);
    }

    let (w, h) = fit_pixmap_size(image.width, image.height);
    if (w, h) == (image.width, image.height) {
        return image_premul_bytes_to_pixmap(&image.rgba8_premul, w, h);
    }
    tracing::debug!(
        from = ?(image.width, image.height),
        to = ?(w, h),
        "downscaling overlay image"
    );
    let src = image::RgbaImage::from_raw(image.width, image.height, image.rgba8_premul.to_vec())
        .ok_or_else(|| QrStyleError::resource("overlay image byte length mismatch"))?;
    // Filtering premultiplied pixels with non-negative weights keeps them premultiplied.
    let scaled = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);
    image_premul_bytes_to_pixmap(scaled.as_raw(), w, h)
}

/// Largest size with the same aspect ratio whose edges fit in a `u16`.
fn fit_pixmap_size(width: u32, height: u32) -> (u32, u32) {
    let max = u32::from(u16::MAX);
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = f64::from(max) / f64::from(width.max(height));
    let fit = |v: u32| ((f64::from(v) * scale).round() as u32).clamp(1, max);
    (fit(width), fit(height))
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> QrStyleResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| QrStyleError::resource("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| QrStyleError::resource("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(QrStyleError::resource("overlay image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
