use super::*;

fn img() -> SourceImage {
    SourceImage::new(PixelBuffer::filled(4, 2, [1, 2, 3, 255]).unwrap())
}

#[test]
fn new_layer_has_editor_defaults() {
    let layer = Layer::new(LayerId(3), "Layer 1", Some(img()));
    assert_eq!(layer.id(), LayerId(3));
    assert!(layer.visible);
    assert_eq!(layer.filter, FilterKind::Normal);
    assert_eq!(layer.blend_mode, BlendMode::Normal);
    assert_eq!(layer.opacity, 100);
    assert!(layer.adjustments.is_identity());
    assert_eq!(layer.scale, 1.0);
    assert!(layer.is_drawable());
    assert!(layer.validate().is_ok());
}

#[test]
fn pending_or_hidden_layers_are_not_drawable() {
    assert!(!Layer::new(LayerId(0), "pending", None).is_drawable());
    assert!(
        !Layer::new(LayerId(0), "hidden", Some(img()))
            .with_visible(false)
            .is_drawable()
    );
}

#[test]
fn validate_rejects_bad_scale_and_opacity() {
    let base = Layer::new(LayerId(0), "x", Some(img()));
    assert!(base.clone().with_scale(0.0).validate().is_err());
    assert!(base.clone().with_scale(-2.0).validate().is_err());
    assert!(base.clone().with_scale(f64::NAN).validate().is_err());
    assert!(base.clone().with_opacity(101).validate().is_err());
    assert!(
        base.with_position(Point::new(f64::INFINITY, 0.0))
            .validate()
            .is_err()
    );
}

#[test]
fn validate_rejects_blank_names() {
    let base = Layer::new(LayerId(3), "x", Some(img()));
    assert!(Layer { name: String::new(), ..base.clone() }.validate().is_err());
    assert!(Layer { name: "  ".into(), ..base }.validate().is_err());
}

#[test]
fn patch_only_touches_given_fields() {
    let mut layer = Layer::new(LayerId(0), "x", Some(img())).with_opacity(40);
    LayerPatch {
        blend_mode: Some(BlendMode::Screen),
        scale: Some(2.0),
        ..LayerPatch::default()
    }
    .apply_to(&mut layer);
    assert_eq!(layer.blend_mode, BlendMode::Screen);
    assert_eq!(layer.scale, 2.0);
    assert_eq!(layer.opacity, 40);
    assert_eq!(layer.name, "x");
}

#[test]
fn source_clones_share_pixels() {
    let a = img();
    let b = a.clone();
    assert!(std::ptr::eq(a.pixels(), b.pixels()));
    assert_eq!((a.width(), a.height()), (4, 2));
}
