use super::*;
use crate::paint::gradient::{ColorStop, GradientKind, GradientSpec};

#[test]
fn defaults_match_a_plain_black_on_white_code() {
    let opts = QrStyleOptions::default();
    assert_eq!((opts.width, opts.height), (300, 300));
    assert_eq!(opts.margin, 0.0);
    assert_eq!(opts.shape, QrShape::Square);
    assert_eq!(opts.error_correction, ErrorCorrectionLevel::Q);
    assert_eq!(opts.dots.style, DotStyle::Square);
    assert_eq!(opts.dots.paint, Some(PaintSpec::Solid(Color::BLACK)));
    assert!(opts.dots.round_size);
    assert_eq!(opts.corners_square.style, None);
    assert_eq!(opts.corners_dot.paint, None);
    assert_eq!(opts.background.paint, Some(PaintSpec::Solid(Color::WHITE)));
    assert!(opts.image.is_none());
    opts.validate().unwrap();
}

#[test]
fn empty_json_is_the_default() {
    assert_eq!(QrStyleOptions::from_json_str("{}").unwrap(), QrStyleOptions::default());
}

#[test]
fn json_covers_styles_paints_and_image() {
    let opts = QrStyleOptions::from_json_str(
        r##"{
            "width": 400,
            "height": 360,
            "margin": 8,
            "shape": "circle",
            "error_correction": "H",
            "dots": {
                "style": "classy-rounded",
                "paint": {
                    "kind": "radial",
                    "color_stops": [
                        { "offset": 0, "color": "#ff0000" },
                        { "offset": 1, "color": "#00f" }
                    ]
                }
            },
            "corners_square": { "style": "extra-rounded", "paint": "#123456" },
            "corners_dot": { "style": { "tiled": "dots" } },
            "background": { "paint": null, "round": 0.5 },
            "image": { "source": { "path": "logo.png" }, "image_size": 0.3, "margin": 2 }
        }"##,
    )
    .unwrap();

    assert_eq!((opts.width, opts.height, opts.margin), (400, 360, 8.0));
    assert_eq!(opts.shape, QrShape::Circle);
    assert_eq!(opts.error_correction, ErrorCorrectionLevel::H);
    assert_eq!(opts.dots.style, DotStyle::ClassyRounded);
    assert!(opts.dots.round_size);
    match &opts.dots.paint {
        Some(PaintSpec::Gradient(g)) => {
            assert_eq!(g.kind, GradientKind::Radial);
            assert_eq!(g.color_stops[1], ColorStop::new(1.0, Color::rgb(0, 0, 255)));
        }
        other => panic!("expected gradient, got {other:?}"),
    }
    assert_eq!(opts.corners_square.style, Some(CornerSquareStyle::ExtraRounded));
    assert_eq!(
        opts.corners_square.paint,
        Some(PaintSpec::Solid(Color::rgb(0x12, 0x34, 0x56)))
    );
    assert_eq!(opts.corners_dot.style, Some(CornerDotStyle::Tiled(DotStyle::Dots)));
    assert_eq!(opts.background.paint, None);
    assert_eq!(opts.background.round, 0.5);

    let image = opts.image.as_ref().unwrap();
    assert_eq!(image.source, ImageSource::Path("logo.png".into()));
    assert_eq!(image.image_size, 0.3);
    assert_eq!(image.margin, 2.0);
    assert!(image.hide_background_dots);
    opts.validate().unwrap();
}

#[test]
fn json_round_trips() {
    let mut opts = QrStyleOptions::default();
    opts.dots.paint = Some(PaintSpec::Gradient(GradientSpec::linear(
        0.5,
        vec![
            ColorStop::new(0.0, Color::rgba(1, 2, 3, 128)),
            ColorStop::new(1.0, Color::WHITE),
        ],
    )));
    opts.image = Some(ImageOptions::new(ImageSource::Uri("data:image/png;base64,AA==".into())));
    let json = opts.to_json_string().unwrap();
    assert_eq!(QrStyleOptions::from_json_str(&json).unwrap(), opts);
}

#[test]
fn unknown_dot_style_is_a_parse_error() {
    let err = QrStyleOptions::from_json_str(r#"{ "dots": { "style": "hexagon" } }"#).unwrap_err();
    assert!(matches!(err, QrStyleError::Serde(_)));
}

type Mutate = Box<dyn Fn(&mut QrStyleOptions)>;

fn case(needle: &'static str, f: impl Fn(&mut QrStyleOptions) + 'static) -> (&'static str, Mutate) {
    (needle, Box::new(f))
}

#[test]
fn validation_rejects_malformed_input() {
    let cases = vec![
        case("surface size", |o| o.height = 0),
        case("margin must", |o| o.margin = -1.0),
        case("no room", |o| o.margin = 150.0),
        case("dots paint", |o| {
            o.dots.paint = Some(GradientSpec::linear(0.0, Vec::new()).into());
        }),
        case("background paint", |o| {
            o.background.paint =
                Some(GradientSpec::radial(vec![ColorStop::new(1.5, Color::BLACK)]).into());
        }),
        case("background round", |o| o.background.round = 2.0),
        case("image size", |o| {
            let mut image = ImageOptions::new(ImageSource::Path("a.png".into()));
            image.image_size = 0.0;
            o.image = Some(image);
        }),
        case("image margin", |o| {
            let mut image = ImageOptions::new(ImageSource::Path("a.png".into()));
            image.margin = -3.0;
            o.image = Some(image);
        }),
    ];

    for (needle, mutate) in cases {
        let mut opts = QrStyleOptions::default();
        mutate(&mut opts);
        match opts.validate() {
            Err(QrStyleError::Validation(msg)) => {
                assert!(msg.contains(needle), "{msg:?} should mention {needle:?}")
            }
            other => panic!("{needle}: expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn cover_fraction_grows_with_level() {
    let levels = [
        ErrorCorrectionLevel::L,
        ErrorCorrectionLevel::M,
        ErrorCorrectionLevel::Q,
        ErrorCorrectionLevel::H,
    ];
    let fractions: Vec<f64> = levels.iter().map(|l| l.cover_fraction()).collect();
    assert_eq!(fractions, vec![0.07, 0.15, 0.25, 0.30]);
}
