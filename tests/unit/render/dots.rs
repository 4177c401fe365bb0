use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::matrix::BitMatrix;
use crate::options::QrShape;
use crate::shapes::ShapeKind;

/// The only rotations the dot renderer ever emits.
const QUARTER_TURNS: [f64; 4] = [0.0, FRAC_PI_2, PI, -FRAC_PI_2];

fn cell() -> CellGeometry {
    CellGeometry::new(0.0, 0.0, 10.0)
}

fn emit(style: DotStyle, n: Neighbors) -> ShapeDescriptor {
    let probe = move |dx: i32, dy: i32| match (dx, dy) {
        (-1, 0) => n.left,
        (1, 0) => n.right,
        (0, -1) => n.top,
        (0, 1) => n.bottom,
        _ => false,
    };
    DotRenderer::new(style).shape_at(cell(), &probe)
}

fn all_neighbor_sets() -> impl Iterator<Item = Neighbors> {
    (0u8..16).map(|bits| Neighbors {
        left: bits & 1 != 0,
        right: bits & 2 != 0,
        top: bits & 4 != 0,
        bottom: bits & 8 != 0,
    })
}

fn n(left: bool, right: bool, top: bool, bottom: bool) -> Neighbors {
    Neighbors {
        left,
        right,
        top,
        bottom,
    }
}

#[test]
fn rotations_are_quarter_turns_only() {
    for style in DotStyle::ALL {
        for neighbors in all_neighbor_sets() {
            let shape = emit(style, neighbors);
            assert!(
                QUARTER_TURNS.contains(&shape.rotation),
                "{style:?} {neighbors:?} produced rotation {}",
                shape.rotation
            );
        }
    }
}

#[test]
fn isolated_cells_are_never_sharp_squares() {
    for style in [
        DotStyle::Rounded,
        DotStyle::ExtraRounded,
        DotStyle::Classy,
        DotStyle::ClassyRounded,
    ] {
        let shape = emit(style, Neighbors::default());
        assert_ne!(shape.kind, ShapeKind::Square, "{style:?}");
    }
}

#[test]
fn isolated_rounded_cell_is_a_full_circle() {
    let shape = emit(DotStyle::Rounded, Neighbors::default());
    assert_eq!(shape.kind, ShapeKind::Dot);
    assert_eq!(shape.rotation, 0.0);
}

#[test]
fn rounded_two_neighbor_rotations() {
    let cases = [
        (n(true, false, true, false), FRAC_PI_2),
        (n(false, true, true, false), PI),
        (n(false, true, false, true), -FRAC_PI_2),
        (n(true, false, false, true), 0.0),
    ];
    for (neighbors, rotation) in cases {
        let shape = emit(DotStyle::Rounded, neighbors);
        assert_eq!(shape.kind, ShapeKind::CornerRounded);
        assert_eq!(shape.rotation, rotation, "{neighbors:?}");

        let extra = emit(DotStyle::ExtraRounded, neighbors);
        assert_eq!(extra.kind, ShapeKind::CornerExtraRounded);
        assert_eq!(extra.rotation, rotation);
    }
}

#[test]
fn rounded_single_neighbor_rotations() {
    let cases = [
        (n(true, false, false, false), 0.0),
        (n(false, false, true, false), FRAC_PI_2),
        (n(false, true, false, false), PI),
        (n(false, false, false, true), -FRAC_PI_2),
    ];
    for (neighbors, rotation) in cases {
        let shape = emit(DotStyle::Rounded, neighbors);
        assert_eq!(shape.kind, ShapeKind::SideRounded);
        assert_eq!(shape.rotation, rotation, "{neighbors:?}");
    }
}

#[test]
fn rounded_straight_runs_and_junctions_are_squares() {
    for neighbors in [
        n(true, true, false, false),
        n(false, false, true, true),
        n(true, true, true, false),
        n(true, true, true, true),
    ] {
        assert_eq!(emit(DotStyle::Rounded, neighbors).kind, ShapeKind::Square);
    }
}

#[test]
fn classy_softens_open_diagonals() {
    let isolated = emit(DotStyle::Classy, Neighbors::default());
    assert_eq!(isolated.kind, ShapeKind::CornersRounded);
    assert_eq!(isolated.rotation, FRAC_PI_2);

    let open_top_left = emit(DotStyle::Classy, n(false, true, false, false));
    assert_eq!(open_top_left.kind, ShapeKind::CornerRounded);
    assert_eq!(open_top_left.rotation, -FRAC_PI_2);

    let open_bottom_right = emit(DotStyle::Classy, n(true, false, false, false));
    assert_eq!(open_bottom_right.kind, ShapeKind::CornerRounded);
    assert_eq!(open_bottom_right.rotation, FRAC_PI_2);

    assert_eq!(
        emit(DotStyle::Classy, n(true, false, false, true)).kind,
        ShapeKind::Square
    );
    assert_eq!(
        emit(DotStyle::ClassyRounded, n(false, false, false, true)).kind,
        ShapeKind::CornerExtraRounded
    );
}

#[test]
fn zebra_rounds_only_along_its_axis() {
    let h = DotStyle::CircleZebra;
    assert_eq!(emit(h, Neighbors::default()).kind, ShapeKind::ZebraDot);
    assert_eq!(emit(h, n(false, false, true, true)).kind, ShapeKind::ZebraDot);

    let left = emit(h, n(true, false, false, false));
    assert_eq!((left.kind, left.rotation), (ShapeKind::ZebraCap, 0.0));
    let right = emit(h, n(false, true, false, false));
    assert_eq!((right.kind, right.rotation), (ShapeKind::ZebraCap, PI));
    let both = emit(h, n(true, true, true, false));
    assert_eq!((both.kind, both.rotation), (ShapeKind::ZebraBar, 0.0));

    let v = DotStyle::CircleZebraVertical;
    assert_eq!(emit(v, n(true, true, false, false)).kind, ShapeKind::ZebraDot);
    let top = emit(v, n(false, false, true, false));
    assert_eq!((top.kind, top.rotation), (ShapeKind::ZebraCap, FRAC_PI_2));
    let bottom = emit(v, n(false, false, false, true));
    assert_eq!((bottom.kind, bottom.rotation), (ShapeKind::ZebraCap, -FRAC_PI_2));
    let bar = emit(v, n(false, false, true, true));
    assert_eq!((bar.kind, bar.rotation), (ShapeKind::ZebraBar, FRAC_PI_2));
}

#[test]
fn neighbor_independent_styles_ignore_the_probe() {
    assert!(!DotStyle::Square.uses_neighbors());
    assert!(!DotStyle::Dots.uses_neighbors());
    for neighbors in all_neighbor_sets() {
        assert_eq!(emit(DotStyle::Dots, neighbors).kind, ShapeKind::Dot);
        assert_eq!(emit(DotStyle::Square, neighbors).kind, ShapeKind::Square);
    }
}

#[test]
fn renderer_visits_active_cells_row_major() {
    let matrix = BitMatrix::from_rows(&["##.", "...", "..#"]).unwrap();
    let layout = GridLayout::new(3, 30, 30, 0.0, QrShape::Square, true).unwrap();
    let accept = |_: usize, _: usize| true;
    let filtered = FilteredMatrix::new(&matrix, &accept);
    let shapes = DotRenderer::new(DotStyle::Rounded).shapes(&filtered, &layout);
    assert_eq!(shapes.len(), 3);
    assert_eq!((shapes[0].x, shapes[0].y), (0.0, 0.0));
    assert_eq!((shapes[1].x, shapes[1].y), (10.0, 0.0));
    assert_eq!((shapes[2].x, shapes[2].y), (20.0, 20.0));
    assert_eq!(shapes[0].kind, ShapeKind::SideRounded);
    assert_eq!(shapes[0].rotation, PI);
    assert_eq!(shapes[2].kind, ShapeKind::Dot);
}

#[test]
fn filtered_cells_disappear_for_their_neighbors_too() {
    let matrix = BitMatrix::filled(3, true);
    let layout = GridLayout::new(3, 30, 30, 0.0, QrShape::Square, true).unwrap();
    let skip_center_row = |row: usize, _: usize| row != 1;
    let filtered = FilteredMatrix::new(&matrix, &skip_center_row);
    let shapes = DotRenderer::new(DotStyle::Rounded).shapes(&filtered, &layout);
    assert_eq!(shapes.len(), 6);
    // Top row: the ends have one horizontal neighbor, the middle two opposite ones.
    assert_eq!(shapes[0].kind, ShapeKind::SideRounded);
    assert_eq!(shapes[1].kind, ShapeKind::Square);
}

#[test]
fn circle_ring_surrounds_the_matrix() {
    let matrix = BitMatrix::filled(21, true);
    let layout = GridLayout::new(21, 300, 300, 0.0, QrShape::Circle, true).unwrap();
    assert_eq!(layout.dot_size, 10.0);

    let ring = DotRenderer::new(DotStyle::Square).ring_shapes(&matrix, &layout);
    assert!(!ring.is_empty());

    let keep_out = layout.matrix_rect().inflate(layout.dot_size - 0.5, layout.dot_size - 0.5);
    let center = layout.surface_rect().center();
    for shape in &ring {
        let cell = shape.cell();
        assert!(
            keep_out.intersect(cell).area() <= 0.0,
            "ring dot at ({}, {}) overlaps the matrix",
            shape.x,
            shape.y
        );
        // Every emitted cell lies within the padded grid's circle.
        assert!((cell.center() - center).hypot() <= 150.0 + layout.dot_size);
    }
}

#[test]
fn square_codes_have_no_ring() {
    let matrix = BitMatrix::filled(21, true);
    let layout = GridLayout::new(21, 300, 300, 0.0, QrShape::Square, true).unwrap();
    assert!(DotRenderer::new(DotStyle::Dots).ring_shapes(&matrix, &layout).is_empty());
}
