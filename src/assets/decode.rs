use crate::foundation::{
    buffer::PixelBuffer,
    error::{LayercompError, LayercompResult},
};

/// Decode encoded image bytes (any format the `image` crate reads) to straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> LayercompResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LayercompError::decode(format!("decode image from memory: {e}")))?;
    PixelBuffer::from_rgba_image(dyn_img.to_rgba8())
}

/// Encode a buffer as PNG bytes.
pub fn encode_png(buf: &PixelBuffer) -> LayercompResult<Vec<u8>> {
    let img = buf.to_rgba_image()?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| LayercompError::Other(anyhow::Error::new(e).context("encode png")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
