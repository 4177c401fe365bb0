use super::*;

fn inside(shape: &ShapeDescriptor, x: f64, y: f64) -> bool {
    let w = shape.to_path().winding(Point::new(x, y));
    match shape.fill_rule {
        FillRule::NonZero => w != 0,
        FillRule::EvenOdd => w % 2 != 0,
    }
}

#[test]
fn cell_path_traces_relative_commands() {
    let path = CellPath::move_to(2.0, 3.0).v(4.0).h(4.0).v(-4.0).close();
    let bbox = path.bounding_box();
    assert_eq!(bbox, Rect::new(2.0, 3.0, 6.0, 7.0));
    assert!(path.contains(Point::new(4.0, 5.0)));
}

#[test]
fn arc_bulges_on_the_sweep_side() {
    // Bottom-center to top-center, counter-clockwise on screen: the half disc is on the right.
    let path = CellPath::move_to(0.0, 0.0)
        .v(10.0)
        .h(5.0)
        .arc(5.0, false, 0.0, -10.0)
        .close();
    let bbox = path.bounding_box();
    assert!((bbox.x1 - 10.0).abs() < 1e-2);
    assert!(path.contains(Point::new(9.0, 5.0)));
    assert!(!path.contains(Point::new(9.5, 0.5)));
}

#[test]
fn rotation_pivots_on_cell_center() {
    let shape = dot::side_rounded(dot::CellGeometry::new(10.0, 10.0, 10.0), std::f64::consts::PI);
    assert_eq!(shape.center(), Point::new(15.0, 15.0));
    let bounds = shape.bounds();
    assert!((bounds.x0 - 10.0).abs() < 1e-2);
    assert!((bounds.y1 - 20.0).abs() < 1e-2);
    // Rounded side now faces left.
    assert!(!inside(&shape, 10.5, 10.5));
    assert!(inside(&shape, 19.5, 10.5));
}

#[test]
fn transform_is_identity_without_rotation() {
    let shape = dot::square(dot::CellGeometry::new(0.0, 0.0, 4.0), 0.0);
    assert_eq!(shape.transform(), Affine::IDENTITY);
    assert_eq!(shape.cell(), Rect::new(0.0, 0.0, 4.0, 4.0));
}
