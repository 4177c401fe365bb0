use super::*;

fn req(w: f64, h: f64, max: f64, dot: f64) -> OcclusionRequest {
    OcclusionRequest {
        original_width: w,
        original_height: h,
        max_hidden_dots: max,
        max_hidden_axis_dots: None,
        dot_size: dot,
    }
}

#[test]
fn wide_image_fits_budget() {
    let r = calculate_image_size(req(2020.0, 1000.0, 50.0, 10.0));
    assert_eq!(
        r,
        OcclusionResult {
            width: 90.0,
            height: 45.0,
            hide_x_dots: 9,
            hide_y_dots: 5,
        }
    );
}

#[test]
fn non_positive_inputs_yield_zero() {
    let cases = [
        req(0.0, 1000.0, 50.0, 10.0),
        req(2020.0, 0.0, 50.0, 10.0),
        req(2020.0, 1000.0, 0.0, 10.0),
        req(2020.0, 1000.0, 50.0, 0.0),
        req(-1.0, 1000.0, 50.0, 10.0),
        req(2020.0, 1000.0, -50.0, 10.0),
        req(f64::NAN, 1000.0, 50.0, 10.0),
    ];
    for c in cases {
        assert_eq!(calculate_image_size(c), OcclusionResult::ZERO, "{c:?}");
    }
}

#[test]
fn hidden_counts_are_odd_and_within_budget() {
    for w in 1..=60 {
        for h in 1..=60 {
            for max in 1..=80 {
                let r = calculate_image_size(req(f64::from(w), f64::from(h), f64::from(max), 4.0));
                assert_eq!(r.hide_x_dots % 2, 1, "x even for {w}x{h} max {max}: {r:?}");
                assert_eq!(r.hide_y_dots % 2, 1, "y even for {w}x{h} max {max}: {r:?}");
                assert!(
                    r.hide_x_dots * r.hide_y_dots <= max,
                    "over budget for {w}x{h} max {max}: {r:?}"
                );
            }
        }
    }
}

#[test]
fn tall_image_keeps_shrinking_rows_until_it_fits() {
    let r = calculate_image_size(req(1.0, 4.0, 1.0, 10.0));
    assert_eq!((r.hide_x_dots, r.hide_y_dots), (1, 1));
    assert_eq!(r.height, 10.0);

    let r = calculate_image_size(req(10.0, 60.0, 9.0, 2.0));
    assert!(r.hide_x_dots * r.hide_y_dots <= 9, "{r:?}");
    assert!(r.hide_y_dots > r.hide_x_dots);
}

#[test]
fn axis_cap_limits_both_axes() {
    let capped = calculate_image_size(OcclusionRequest {
        max_hidden_axis_dots: Some(7),
        ..req(100.0, 100.0, 1000.0, 3.0)
    });
    assert_eq!(capped.hide_x_dots, 7);
    assert_eq!(capped.hide_y_dots, 7);
    assert_eq!(capped.width, 21.0);
    assert_eq!(capped.height, 21.0);

    let tall = calculate_image_size(OcclusionRequest {
        max_hidden_axis_dots: Some(5),
        ..req(100.0, 300.0, 1000.0, 2.0)
    });
    assert!(tall.hide_y_dots <= 5);
    assert_eq!(tall.hide_y_dots % 2, 1);
    assert_eq!(tall.hide_x_dots % 2, 1);
}

#[test]
fn even_axis_cap_is_forced_odd() {
    let r = calculate_image_size(OcclusionRequest {
        max_hidden_axis_dots: Some(6),
        ..req(100.0, 100.0, 1000.0, 1.0)
    });
    assert_eq!(r.hide_x_dots, 5);
    assert_eq!(r.hide_y_dots, 5);
}

#[test]
fn zero_axis_cap_means_uncapped() {
    let a = calculate_image_size(OcclusionRequest {
        max_hidden_axis_dots: Some(0),
        ..req(100.0, 100.0, 49.0, 1.0)
    });
    let b = calculate_image_size(req(100.0, 100.0, 49.0, 1.0));
    assert_eq!(a, b);
    assert_eq!(a.hide_x_dots, 7);
}

#[test]
fn is_idempotent() {
    let r = req(333.0, 200.0, 77.0, 6.0);
    assert_eq!(calculate_image_size(r), calculate_image_size(r));
}

#[test]
fn hides_a_centered_block() {
    let r = OcclusionResult {
        width: 30.0,
        height: 10.0,
        hide_x_dots: 3,
        hide_y_dots: 1,
    };
    let count = 21;
    let hidden: Vec<(usize, usize)> = (0..count)
        .flat_map(|row| (0..count).map(move |col| (row, col)))
        .filter(|&(row, col)| r.hides(row, col, count))
        .collect();
    assert_eq!(hidden, vec![(10, 9), (10, 10), (10, 11)]);
    assert!(!OcclusionResult::ZERO.hides(10, 10, count));
}
