use crate::foundation::error::{QrStyleError, QrStyleResult};

/// Largest raster edge an SVG overlay may be rendered at.
const MAX_DIM: u32 = 16_384;

/// Intrinsic pixel size of an SVG, rounded up.
///
/// Sizes past `MAX_DIM` on either edge are rejected so decoding never allocates a pathological
/// pixmap.
pub fn svg_intrinsic_size(tree: &usvg::Tree) -> QrStyleResult<(u32, u32)> {
    fn to_px(v: f32) -> QrStyleResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(QrStyleError::image_load("svg has invalid width/height"));
        }
        let px = v.ceil();
        if px > MAX_DIM as f32 {
            return Err(QrStyleError::image_load(format!(
                "svg intrinsic size {v} exceeds {MAX_DIM}px"
            )));
        }
        Ok((px as u32).max(1))
    }

    let size = tree.size();
    Ok((to_px(size.width())?, to_px(size.height())?))
}

/// Raster size for drawing an SVG into `width`×`height` surface pixels.
///
/// Oversized targets keep their aspect ratio and are clamped to `MAX_DIM`; the caller stretches
/// the result over the target.
pub fn svg_raster_size(width: f64, height: f64) -> QrStyleResult<(u32, u32)> {
    if !width.is_finite() || !height.is_finite() {
        return Err(QrStyleError::resource(format!(
            "svg raster size is not finite: {width}x{height}"
        )));
    }
    let w = width.ceil().max(1.0);
    let h = height.ceil().max(1.0);
    let max = f64::from(MAX_DIM);
    let scale = (max / w.max(h)).min(1.0);
    let fit = |v: f64| (v * scale).ceil().clamp(1.0, max) as u32;
    Ok((fit(w), fit(h)))
}

/// Render the whole tree stretched over a `width`×`height` premultiplied RGBA8 buffer.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> QrStyleResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| QrStyleError::resource("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
