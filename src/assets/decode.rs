use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine;

use crate::assets::OverlayImage;
use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_intrinsic_size};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::QrStyleResult;
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decode a raster image (any format `image` understands) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> QrStyleResult<OverlayImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(OverlayImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        svg: None,
        href: None,
    })
}

pub fn parse_svg(bytes: &[u8]) -> QrStyleResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Parse an SVG and rasterize it at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> QrStyleResult<OverlayImage> {
    let tree = parse_svg(bytes)?;
    let (width, height) = svg_intrinsic_size(&tree)?;
    let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Ok(OverlayImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        svg: Some(Arc::new(tree)),
        href: None,
    })
}

/// Whether the bytes look like SVG markup rather than an encoded raster.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with('<') && text.contains("<svg"))
}

/// Decode either an SVG or a raster image.
pub fn decode_overlay(bytes: &[u8]) -> QrStyleResult<OverlayImage> {
    if looks_like_svg(bytes) {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

/// Encode the overlay pixels as a `data:image/png;base64,` URI.
pub fn png_data_uri(image: &OverlayImage) -> QrStyleResult<String> {
    let mut straight = Vec::with_capacity(image.rgba8_premul.len());
    for px in image.rgba8_premul.chunks_exact(4) {
        let p = Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        };
        straight.extend_from_slice(&p.to_straight_rgba());
    }
    let img = image::RgbaImage::from_raw(image.width, image.height, straight)
        .context("overlay pixel buffer does not match its size")?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode overlay as png")?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
