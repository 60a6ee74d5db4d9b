use super::*;

fn sample() -> PixelBuffer {
    PixelBuffer::from_rgba8(
        2,
        2,
        vec![
            10, 20, 30, 255, //
            200, 100, 50, 128, //
            0, 0, 0, 0, //
            255, 255, 255, 255,
        ],
    )
    .unwrap()
}

fn run(kind: FilterKind, buf: PixelBuffer) -> PixelBuffer {
    apply_filter(buf, kind, &FilterSettings::default()).unwrap()
}

#[test]
fn normal_is_a_noop() {
    assert_eq!(run(FilterKind::Normal, sample()), sample());
}

#[test]
fn invert_is_an_involution() {
    let once = run(FilterKind::Invert, sample());
    assert_eq!(once.pixel(0, 0), Some([245, 235, 225, 255]));
    assert_eq!(run(FilterKind::Invert, once), sample());
}

#[test]
fn grayscale_averages_channels() {
    let out = run(FilterKind::Grayscale, sample());
    assert_eq!(out.pixel(0, 0), Some([20, 20, 20, 255]));
    // (200 + 100 + 50) / 3 = 116.67
    assert_eq!(out.pixel(1, 0), Some([117, 117, 117, 128]));
}

#[test]
fn sepia_matches_matrix_and_clamps() {
    let out = run(FilterKind::Sepia, sample());
    // r = .393*10 + .769*20 + .189*30 = 24.98
    // g = .349*10 + .686*20 + .168*30 = 22.25
    // b = .272*10 + .534*20 + .131*30 = 17.33
    assert_eq!(out.pixel(0, 0), Some([25, 22, 17, 255]));
    let white = out.pixel(1, 1).unwrap();
    assert_eq!(&white[..2], &[255, 255]);
    // .272 + .534 + .131 = .937
    assert_eq!(white[2], 239);
}

#[test]
fn vintage_cool_warm_shift_channels() {
    let vintage = run(FilterKind::Vintage, sample());
    assert_eq!(vintage.pixel(0, 0), Some([29, 26, 21, 255]));
    assert_eq!(vintage.pixel(1, 0), Some([200, 90, 35, 128]));

    let cool = run(FilterKind::Cool, sample());
    assert_eq!(cool.pixel(0, 0), Some([10, 20, 60, 255]));
    assert_eq!(cool.pixel(1, 1), Some([255, 255, 255, 255]));

    let warm = run(FilterKind::Warm, sample());
    assert_eq!(warm.pixel(0, 0), Some([40, 35, 30, 255]));
    assert_eq!(warm.pixel(1, 0), Some([230, 115, 50, 128]));
}

#[test]
fn per_pixel_filters_leave_alpha_alone() {
    for kind in [
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::Vintage,
        FilterKind::Cool,
        FilterKind::Warm,
        FilterKind::Sharpen,
    ] {
        let out = run(kind, sample());
        let alphas: Vec<u8> = out.pixels().map(|px| px[3]).collect();
        assert_eq!(alphas, vec![255, 128, 0, 255], "{kind}");
    }
}

#[test]
fn blur_softens_a_hard_edge() {
    let mut data = Vec::new();
    for x in 0..12 {
        let v = if x < 6 { 0 } else { 255 };
        data.extend_from_slice(&[v, v, v, 255]);
    }
    let src = PixelBuffer::from_rgba8(12, 1, data).unwrap();
    let out = run(FilterKind::Blur, src);
    let left = out.pixel(5, 0).unwrap()[0];
    let right = out.pixel(6, 0).unwrap()[0];
    assert!(left > 0 && left < 128, "left={left}");
    assert!(right > 128 && right < 255, "right={right}");
}

#[test]
fn sharpen_increases_edge_contrast() {
    let mut data = Vec::new();
    for x in 0..6 {
        let v = if x < 3 { 50 } else { 200 };
        data.extend_from_slice(&[v, v, v, 255]);
    }
    let src = PixelBuffer::from_rgba8(6, 1, data).unwrap();
    let out = run(FilterKind::Sharpen, src);
    assert_eq!(out.pixel(0, 0).unwrap()[0], 50);
    assert!(out.pixel(2, 0).unwrap()[0] < 50);
    assert!(out.pixel(3, 0).unwrap()[0] > 200);
    assert_eq!(out.pixel(5, 0).unwrap()[0], 200);
}

#[test]
fn filter_names_round_trip() {
    for kind in FilterKind::ALL {
        assert_eq!(kind.to_string().parse::<FilterKind>().unwrap(), kind);
    }
    assert_eq!(" Sepia ".parse::<FilterKind>().unwrap(), FilterKind::Sepia);
    assert!("emboss".parse::<FilterKind>().is_err());
}

#[test]
fn settings_validate_bounds() {
    assert!(FilterSettings::default().validate().is_ok());
    let bad = FilterSettings {
        blur_sigma: 0.0,
        ..FilterSettings::default()
    };
    assert!(bad.validate().is_err());
    let bad = FilterSettings {
        sharpen_amount: -1.0,
        ..FilterSettings::default()
    };
    assert!(bad.validate().is_err());
}
