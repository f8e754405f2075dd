use super::*;

#[test]
fn size_clamps_non_positive_components_to_minimum() {
    assert_eq!(Size::new(0, -5).clamped(), Size::new(100, 100));
    assert_eq!(Size::new(640, 0).clamped(), Size::new(640, 100));
    assert_eq!(Size::new(1, 2).clamped(), Size::new(1, 2));
}

#[test]
fn insets_clamp_negative_sides() {
    let i = Insets {
        left: -3,
        top: 4,
        right: -1,
        bottom: 0,
    }
    .clamped();
    assert_eq!(
        i,
        Insets {
            left: 0,
            top: 4,
            right: 0,
            bottom: 0
        }
    );
    assert_eq!(Insets::uniform(5).horizontal(), 10);
}

#[test]
fn premultiplied_background_scales_color_by_alpha() {
    assert_eq!(Rgba8::new(255, 128, 0, 128).premultiplied(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::new(10, 20, 30, 255).premultiplied(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::new(10, 20, 30, 0).premultiplied(), [0, 0, 0, 0]);
}

#[test]
fn color_parses_hex_with_optional_alpha() {
    assert_eq!("#ff8000".parse::<Rgba8>().unwrap(), Rgba8::new(255, 128, 0, 255));
    assert_eq!("00000080".parse::<Rgba8>().unwrap(), Rgba8::new(0, 0, 0, 128));
    assert!("#12345".parse::<Rgba8>().is_err());
    assert!("#gg0000".parse::<Rgba8>().is_err());
}

#[test]
fn viewport_maps_visible_area_onto_surface() {
    let v = Viewport::new(Point::new(50.0, 50.0), Vec2::new(100.0, 100.0));
    let t = v.transform(200, 200);
    let p = t * Point::new(0.0, 0.0);
    assert!((p.x - 0.0).abs() < 1e-9 && (p.y - 0.0).abs() < 1e-9);
    let p = t * Point::new(100.0, 100.0);
    assert!((p.x - 200.0).abs() < 1e-9 && (p.y - 200.0).abs() < 1e-9);
}

#[test]
fn flipped_viewport_renders_world_up_toward_top() {
    let v = Viewport::flipped_from_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
    let t = v.transform(10, 10);
    let top = t * Point::new(5.0, 10.0);
    assert!(top.y.abs() < 1e-9);
    let bottom = t * Point::new(5.0, 0.0);
    assert!((bottom.y - 10.0).abs() < 1e-9);
}

#[test]
fn viewport_target_limits_mapping_to_sub_rect() {
    let mut v = Viewport::new(Point::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    v.target = Some(PixelRect {
        x: 5,
        y: 5,
        width: 10,
        height: 10,
    });
    let t = v.transform(20, 20);
    let p = t * Point::new(-5.0, -5.0);
    assert!((p.x - 5.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
    assert_eq!(v.target_rect(12, 12).width, 7);
}
