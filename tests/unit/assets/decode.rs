use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert!(prepared.svg.is_none());
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="2"></svg>"#;
    let img = decode_overlay(ok).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert!(img.svg.is_some());

    let bad = br#"<svg"#;
    assert!(parse_svg(bad).is_err());
}

#[test]
fn garbage_is_an_error() {
    assert!(decode_overlay(b"definitely not an image").is_err());
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg(b"  <svg xmlns='x'/>"));
    assert!(looks_like_svg(b"<?xml version=\"1.0\"?>\n<svg/>"));
    assert!(!looks_like_svg(&png_bytes(vec![0, 0, 0, 255], 1, 1)));
}

#[test]
fn png_data_uri_round_trips_pixels() {
    let image = decode_image(&png_bytes(vec![10, 20, 30, 255, 0, 0, 0, 0], 2, 1)).unwrap();
    let uri = png_data_uri(&image).unwrap();
    let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    let again = decode_image(&bytes).unwrap();
    assert_eq!(again.rgba8_premul, image.rgba8_premul);
}

#[test]
fn huge_svg_is_rejected_before_rasterizing() {
    let huge = br#"<svg xmlns="http://www.w3.org/2000/svg" width="50000" height="50000"></svg>"#;
    assert!(matches!(
        decode_svg(huge),
        Err(crate::foundation::error::QrStyleError::ImageLoad(_))
    ));
    assert!(decode_overlay(huge).is_err());
}
