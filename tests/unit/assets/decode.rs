use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let src = PixelBuffer::from_rgba8(1, 1, vec![100, 50, 200, 128]).unwrap();
    let png = encode_png(&src).unwrap();

    let decoded = decode_image(&png).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_bytes(), &[100, 50, 200, 128]);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(LayercompError::Decode(_))
    ));
}
