use std::sync::Arc;

use super::*;
use crate::shapes::corner::frame_square;
use crate::shapes::dot::{CellGeometry, corner_rounded, dot, square};

fn region<'a>(name: &'a str, paint: Option<&'a str>) -> Region<'a> {
    Region {
        name,
        paint,
        bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
    }
}

#[test]
fn solid_region_becomes_a_clipped_rect() {
    let mut backend = SvgBackend::new(100, 100);
    backend.define_paint("dot-color-1", &ResolvedPaint::Solid(Color::rgb(255, 0, 0)));
    backend.begin_region(&region("dot-color-1", Some("dot-color-1")));
    backend.draw_shape(&square(CellGeometry::new(10.0, 10.0, 10.0), 0.0));
    backend.end_region();
    let doc = backend.finish().unwrap();
    let svg = doc.as_str();

    assert!(svg.contains("<clipPath id=\"clip-path-dot-color-1\" clipPathUnits=\"userSpaceOnUse\">"));
    assert!(svg.contains("<rect x=\"10\" y=\"10\" width=\"10\" height=\"10\"/>"));
    assert!(svg.contains(
        "<rect x=\"0\" y=\"0\" width=\"100\" height=\"100\" clip-path=\"url(#clip-path-dot-color-1)\" fill=\"#ff0000\"/>"
    ));
}

#[test]
fn unpainted_regions_emit_no_rect() {
    let mut backend = SvgBackend::new(100, 100);
    backend.begin_region(&region("corners", None));
    backend.draw_shape(&dot(CellGeometry::new(0.0, 0.0, 10.0), 0.0));
    backend.end_region();
    let svg = backend.finish().unwrap().into_string();
    assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"5\"/>"));
    assert!(!svg.contains("clip-path=\"url("));
}

#[test]
fn rotation_is_declarative_about_the_center() {
    let mut backend = SvgBackend::new(100, 100);
    backend.begin_region(&region("r", None));
    backend.draw_shape(&corner_rounded(
        CellGeometry::new(10.0, 20.0, 10.0),
        -std::f64::consts::FRAC_PI_2,
    ));
    backend.end_region();
    let svg = backend.finish().unwrap().into_string();
    assert!(svg.contains("transform=\"rotate(-90 15 25)\""));
    // Coordinates stay unrotated.
    assert!(svg.contains("<path d=\"M10 20L10 30L20 30L20 25"));
}

#[test]
fn rings_use_even_odd_clip_rule() {
    let mut backend = SvgBackend::new(70, 70);
    backend.begin_region(&region("frame", None));
    backend.draw_shape(&frame_square(0.0, 0.0, 70.0, 0.0));
    backend.end_region();
    let svg = backend.finish().unwrap().into_string();
    assert!(svg.contains("clip-rule=\"evenodd\""));
}

#[test]
fn gradients_are_defined_once_in_user_space() {
    let mut backend = SvgBackend::new(100, 100);
    let paint = ResolvedPaint::Linear {
        start: Point::new(0.0, 50.0),
        end: Point::new(100.0, 50.0),
        stops: vec![
            ColorStop::new(0.0, Color::rgb(255, 0, 0)),
            ColorStop::new(1.0, Color::rgba(0, 0, 255, 128)),
        ],
    };
    backend.define_paint("g", &paint);
    backend.define_paint("g", &paint);
    backend.define_paint(
        "r",
        &ResolvedPaint::Radial {
            center: Point::new(50.0, 50.0),
            radius: 50.0,
            stops: vec![ColorStop::new(0.5, Color::BLACK)],
        },
    );
    backend.begin_region(&region("dots", Some("g")));
    backend.end_region();
    let svg = backend.finish().unwrap().into_string();

    assert_eq!(svg.matches("<linearGradient").count(), 1);
    assert!(svg.contains(
        "<linearGradient id=\"g\" gradientUnits=\"userSpaceOnUse\" x1=\"0\" y1=\"50\" x2=\"100\" y2=\"50\">"
    ));
    assert!(svg.contains("<stop offset=\"0%\" stop-color=\"#ff0000\"/>"));
    assert!(svg.contains("<stop offset=\"100%\" stop-color=\"#0000ff\" stop-opacity=\"0.502\"/>"));
    assert!(svg.contains("fx=\"50\" fy=\"50\" cx=\"50\" cy=\"50\" r=\"50\""));
    assert!(svg.contains("<stop offset=\"50%\" stop-color=\"#000000\"/>"));
    assert!(svg.contains("fill=\"url(#g)\""));
}

#[test]
fn images_reference_their_source_or_embed_png() {
    let pixels = Arc::new(vec![255, 255, 255, 255]);
    let linked = OverlayImage {
        width: 1,
        height: 1,
        rgba8_premul: pixels.clone(),
        svg: None,
        href: Some("logo.png?a=1&b=2".to_owned()),
    };
    let embedded = OverlayImage {
        href: None,
        ..linked.clone()
    };

    let mut backend = SvgBackend::new(100, 100);
    backend
        .draw_image(&linked, Rect::new(40.0, 40.0, 60.0, 60.0))
        .unwrap();
    backend
        .draw_image(&embedded, Rect::new(40.0, 40.0, 60.0, 60.0))
        .unwrap();
    let svg = backend.finish().unwrap().into_string();
    assert!(svg.contains("<image href=\"logo.png?a=1&amp;b=2\" x=\"40\" y=\"40\" width=\"20\" height=\"20\""));
    assert!(svg.contains("href=\"data:image/png;base64,"));
}

#[test]
fn document_parses_as_svg() {
    let mut backend = SvgBackend::new(50, 40);
    backend.define_paint("bg", &ResolvedPaint::Solid(Color::WHITE));
    backend.begin_region(&Region {
        name: "bg",
        paint: Some("bg"),
        bounds: Rect::new(0.0, 0.0, 50.0, 40.0),
    });
    backend.draw_shape(&square(CellGeometry::new(0.0, 0.0, 40.0), 0.0));
    backend.end_region();
    let doc = backend.finish().unwrap();
    assert_eq!((doc.width, doc.height), (50, 40));
    let tree = usvg::Tree::from_str(doc.as_str(), &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 50.0);
}

#[test]
fn numbers_are_compact() {
    assert_eq!(fmt_num(3.0), "3");
    assert_eq!(fmt_num(-0.0), "0");
    assert_eq!(fmt_num(2.5), "2.5");
    assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
    assert_eq!(fmt_num(f64::NAN), "0");
}
