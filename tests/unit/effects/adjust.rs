use super::*;

fn sample() -> PixelBuffer {
    PixelBuffer::from_rgba8(
        3,
        1,
        vec![
            10, 20, 30, 255, //
            200, 100, 50, 200, //
            128, 128, 128, 64,
        ],
    )
    .unwrap()
}

fn adj(f: impl FnOnce(&mut Adjustments)) -> Adjustments {
    let mut a = Adjustments::default();
    f(&mut a);
    a
}

#[test]
fn default_adjustments_are_identity() {
    let a = Adjustments::default();
    assert!(a.is_identity());
    assert_eq!(apply_adjustments(sample(), &a), sample());
}

#[test]
fn brightness_extremes_saturate() {
    let out = apply_adjustments(sample(), &adj(|a| a.brightness = 100));
    for px in out.pixels() {
        assert_eq!(&px[..3], &[255, 255, 255]);
    }
    let out = apply_adjustments(sample(), &adj(|a| a.brightness = -100));
    for px in out.pixels() {
        assert_eq!(&px[..3], &[0, 0, 0]);
    }
}

#[test]
fn contrast_pivots_on_mid_gray() {
    let src = PixelBuffer::from_rgba8(
        3,
        1,
        vec![28, 28, 28, 255, 128, 128, 128, 255, 200, 200, 200, 255],
    )
    .unwrap();
    let out = apply_adjustments(src, &adj(|a| a.contrast = 100));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([128, 128, 128, 255]));
    assert_eq!(out.pixel(2, 0), Some([255, 255, 255, 255]));
}

#[test]
fn full_desaturation_collapses_to_luma() {
    let out = apply_adjustments(sample(), &adj(|a| a.saturation = -100));
    // 0.2989*200 + 0.587*100 + 0.114*50 = 124.18
    assert_eq!(out.pixel(1, 0), Some([124, 124, 124, 200]));
}

#[test]
fn opacity_scales_alpha_linearly() {
    let full = apply_adjustments(sample(), &Adjustments::default());
    let half = apply_adjustments(sample(), &adj(|a| a.opacity = 50));
    for (f, h) in full.pixels().zip(half.pixels()) {
        let expected = f32::from(f[3]) / 2.0;
        assert!((f32::from(h[3]) - expected).abs() <= 0.5 + f32::EPSILON);
        assert_eq!(&f[..3], &h[..3]);
    }

    let none = apply_adjustments(sample(), &adj(|a| a.opacity = 0));
    assert!(none.pixels().all(|px| px[3] == 0));
}

#[test]
fn hue_rotation_moves_primaries() {
    let red = PixelBuffer::filled(1, 1, [255, 0, 0, 255]).unwrap();
    let green = apply_adjustments(red.clone(), &adj(|a| a.hue = 120));
    assert_eq!(green.pixel(0, 0), Some([0, 255, 0, 255]));

    let cyan = apply_adjustments(red, &adj(|a| a.hue = -180));
    assert_eq!(cyan.pixel(0, 0), Some([0, 255, 255, 255]));
}

#[test]
fn hue_rotation_leaves_grays_alone() {
    let mut buf = PixelBuffer::filled(2, 2, [90, 90, 90, 255]).unwrap();
    rotate_hue(&mut buf, 73.0);
    assert!(buf.pixels().all(|px| px == [90, 90, 90, 255]));
}

#[test]
fn validate_enforces_documented_bounds() {
    assert!(Adjustments::default().validate().is_ok());
    assert!(adj(|a| a.brightness = 101).validate().is_err());
    assert!(adj(|a| a.contrast = -101).validate().is_err());
    assert!(adj(|a| a.saturation = 150).validate().is_err());
    assert!(adj(|a| a.hue = 181).validate().is_err());
    assert!(adj(|a| a.opacity = -1).validate().is_err());
    assert!(adj(|a| a.hue = -180).validate().is_ok());
}
