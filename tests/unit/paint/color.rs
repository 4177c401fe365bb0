use serde_json::json;

use super::*;

#[test]
fn parses_hex_forms() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgb(255, 0, 0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));

    let c: Color = serde_json::from_value(json!("#fa0")).unwrap();
    assert_eq!(c, Color::rgb(0xff, 0xaa, 0x00));

    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#gg0000").is_err());
}

#[test]
fn parses_unit_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 0.5, "b": 0.0})).unwrap();
    assert_eq!(c, Color::rgb(255, 128, 0));

    let c: Color = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));

    assert!(serde_json::from_value::<Color>(json!([0.0, 1.0])).is_err());
}

#[test]
fn serializes_as_hex() {
    assert_eq!(serde_json::to_value(Color::rgb(1, 2, 3)).unwrap(), json!("#010203"));
    assert_eq!(
        serde_json::to_value(Color::rgba(1, 2, 3, 4)).unwrap(),
        json!("#01020304")
    );
}

#[test]
fn svg_hex_and_opacity() {
    let c = Color::rgba(0xab, 0xcd, 0xef, 51);
    assert_eq!(c.to_hex_rgb(), "#abcdef");
    assert!((c.opacity() - 0.2).abs() < 1e-9);
}
