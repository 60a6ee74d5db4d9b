use super::*;

fn ch(x1: u8, x2: u8, mode: BlendMode) -> u8 {
    blend_channel(x1, x2, mode)
}

#[test]
fn separable_modes_match_reference_values() {
    assert_eq!(ch(200, 100, BlendMode::Normal), 100);
    assert_eq!(ch(200, 100, BlendMode::Multiply), 78);
    assert_eq!(ch(200, 100, BlendMode::Screen), 222);
    assert_eq!(ch(200, 100, BlendMode::Overlay), 188);
    assert_eq!(ch(100, 200, BlendMode::Overlay), 157);
    assert_eq!(ch(200, 100, BlendMode::Darken), 100);
    assert_eq!(ch(200, 100, BlendMode::Lighten), 200);
    assert_eq!(ch(100, 200, BlendMode::HardLight), 188);
    assert_eq!(ch(200, 100, BlendMode::HardLight), 157);
    assert_eq!(ch(100, 64, BlendMode::SoftLight), 70);
    assert_eq!(ch(100, 200, BlendMode::SoftLight), 134);
    assert_eq!(ch(200, 100, BlendMode::Difference), 100);
    assert_eq!(ch(200, 100, BlendMode::Exclusion), 143);
}

#[test]
fn dodge_and_burn_boundaries_never_divide_by_zero() {
    assert_eq!(ch(0, 255, BlendMode::ColorDodge), 0);
    assert_eq!(ch(10, 255, BlendMode::ColorDodge), 255);
    assert_eq!(ch(100, 200, BlendMode::ColorDodge), 255);
    assert_eq!(ch(100, 100, BlendMode::ColorDodge), 165);

    assert_eq!(ch(255, 0, BlendMode::ColorBurn), 255);
    assert_eq!(ch(10, 0, BlendMode::ColorBurn), 0);
    assert_eq!(ch(100, 200, BlendMode::ColorBurn), 57);
    assert_eq!(ch(0, 1, BlendMode::ColorBurn), 0);
}

#[test]
fn hsl_family_is_the_channel_average() {
    for mode in [
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ] {
        assert_eq!(ch(200, 100, mode), 150);
        assert_eq!(ch(0, 255, mode), 128);
    }
}

#[test]
fn normal_with_opaque_top_replaces_base() {
    let base = PixelBuffer::filled(3, 2, [10, 20, 30, 90]).unwrap();
    let top = PixelBuffer::filled(3, 2, [200, 150, 100, 255]).unwrap();
    assert_eq!(blend(&base, &top, BlendMode::Normal).unwrap(), top);
}

#[test]
fn transparent_top_pixels_pass_base_through_for_every_mode() {
    let base = PixelBuffer::from_rgba8(2, 1, vec![12, 34, 56, 78, 90, 80, 70, 255]).unwrap();
    let top = PixelBuffer::from_rgba8(2, 1, vec![255, 255, 255, 0, 1, 2, 3, 0]).unwrap();
    for mode in BlendMode::ALL {
        assert_eq!(blend(&base, &top, mode).unwrap(), base, "{mode}");
    }
}

#[test]
fn alpha_uses_over_formula() {
    let out = blend_px([0, 0, 0, 128], [0, 0, 0, 128], BlendMode::Normal);
    // 128 + 128 - 128*128/255 = 191.75
    assert_eq!(out[3], 192);
    let out = blend_px([0, 0, 0, 0], [9, 9, 9, 40], BlendMode::Multiply);
    assert_eq!(out[3], 40);
}

#[test]
fn difference_and_exclusion_commute() {
    let a = PixelBuffer::from_rgba8(2, 1, vec![200, 13, 90, 255, 0, 255, 128, 255]).unwrap();
    let b = PixelBuffer::from_rgba8(2, 1, vec![17, 240, 90, 255, 64, 3, 200, 255]).unwrap();
    for mode in [BlendMode::Difference, BlendMode::Exclusion] {
        assert_eq!(
            blend(&a, &b, mode).unwrap(),
            blend(&b, &a, mode).unwrap(),
            "{mode}"
        );
    }
}

#[test]
fn blend_rejects_mismatched_dimensions() {
    let a = PixelBuffer::transparent(2, 2).unwrap();
    let b = PixelBuffer::transparent(2, 3).unwrap();
    assert!(matches!(
        blend(&a, &b, BlendMode::Normal),
        Err(LayercompError::Validation(_))
    ));
}

#[test]
fn accumulate_takes_first_layer_as_is() {
    let layer = PixelBuffer::filled(2, 2, [200, 100, 50, 255]).unwrap();
    let out = accumulate(None, layer.clone(), BlendMode::Multiply).unwrap();
    assert_eq!(out, layer);

    let blank = PixelBuffer::transparent(2, 2).unwrap();
    let out = accumulate(Some(blank), layer.clone(), BlendMode::Multiply).unwrap();
    assert_eq!(out, layer);

    let invisible = PixelBuffer::filled(2, 2, [90, 90, 90, 0]).unwrap();
    let out = accumulate(Some(invisible), layer.clone(), BlendMode::Multiply).unwrap();
    assert_eq!(out, layer);

    let base = PixelBuffer::filled(2, 2, [100, 100, 100, 255]).unwrap();
    let out = accumulate(Some(base), layer, BlendMode::Multiply).unwrap();
    assert_eq!(out.pixel(0, 0), Some([78, 39, 20, 255]));
}

#[test]
fn mode_names_round_trip() {
    for mode in BlendMode::ALL {
        assert_eq!(mode.to_string().parse::<BlendMode>().unwrap(), mode);
    }
    assert_eq!(
        "Color_Dodge".parse::<BlendMode>().unwrap(),
        BlendMode::ColorDodge
    );
    assert!("add".parse::<BlendMode>().is_err());
    assert_eq!(
        serde_json::to_string(&BlendMode::SoftLight).unwrap(),
        "\"soft-light\""
    );
}
