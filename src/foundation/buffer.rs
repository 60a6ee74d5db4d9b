use crate::foundation::{
    core::Canvas,
    error::{LayercompError, LayercompResult},
};

/// Straight-alpha RGBA8 pixels, row-major, tightly packed.
///
/// `data.len() == width * height * 4` always holds; every constructor checks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> LayercompResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn for_canvas(canvas: Canvas) -> LayercompResult<Self> {
        Self::transparent(canvas.width, canvas.height)
    }

    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> LayercompResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(LayercompError::validation(format!(
                "pixel buffer expects {len} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with a single pixel value.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> LayercompResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> LayercompResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Copy out as an `image` buffer for display or encoding.
    pub fn to_rgba_image(&self) -> LayercompResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| LayercompError::evaluation("pixel buffer does not fit an RgbaImage"))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(4)
    }

    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) -> LayercompResult<()> {
        if x >= self.width || y >= self.height {
            return Err(LayercompError::validation(format!(
                "pixel ({x}, {y}) is outside {}x{}",
                self.width, self.height
            )));
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&px);
        Ok(())
    }

    /// True when nothing is visible: every pixel has zero alpha, whatever its color bytes.
    pub fn is_blank(&self) -> bool {
        self.pixels().all(|px| px[3] == 0)
    }

    pub fn same_dimensions(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> LayercompResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LayercompError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/buffer.rs"]
mod tests;
