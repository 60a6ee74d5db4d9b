use crate::foundation::{
    buffer::PixelBuffer,
    error::{LayercompError, LayercompResult},
    math::{channel_u8, hsl_to_rgb, rgb_to_hsl},
};

/// Tonal parameters applied uniformly across a layer.
///
/// Bounds: brightness, contrast and saturation in `[-100, 100]`, hue in `[-180, 180]` degrees,
/// opacity in `[0, 100]` percent. [`apply_adjustments`] assumes these hold; check them with
/// [`Adjustments::validate`] where values enter the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub hue: i32,
    pub opacity: i32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
            saturation: 0,
            hue: 0,
            opacity: 100,
        }
    }
}

impl Adjustments {
    pub fn validate(&self) -> LayercompResult<()> {
        check_range("brightness", self.brightness, -100, 100)?;
        // The contrast factor has a pole at 259; the bound keeps us well clear of it.
        check_range("contrast", self.contrast, -100, 100)?;
        check_range("saturation", self.saturation, -100, 100)?;
        check_range("hue", self.hue, -180, 180)?;
        check_range("opacity", self.opacity, 0, 100)?;
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

fn check_range(name: &str, v: i32, min: i32, max: i32) -> LayercompResult<()> {
    if v < min || v > max {
        return Err(LayercompError::validation(format!(
            "{name} must be in [{min}, {max}], got {v}"
        )));
    }
    Ok(())
}

/// Brightness, contrast, saturation, clamp, opacity, then hue rotation.
pub fn apply_adjustments(mut buf: PixelBuffer, adj: &Adjustments) -> PixelBuffer {
    let brightness = adj.brightness as f32 * 2.55;
    let contrast = adj.contrast as f32;
    let contrast_factor = (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast));
    let sat_factor = 1.0 + adj.saturation as f32 / 100.0;
    let opacity = adj.opacity as f32 / 100.0;

    for px in buf.pixels_mut() {
        let mut rgb = [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])];

        for c in &mut rgb {
            *c += brightness;
            *c = contrast_factor * (*c - 128.0) + 128.0;
        }

        let gray = 0.2989 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        for (dst, c) in px.iter_mut().zip(rgb) {
            *dst = channel_u8(gray + sat_factor * (c - gray));
        }

        px[3] = channel_u8(f32::from(px[3]) * opacity);
    }

    if adj.hue != 0 {
        rotate_hue(&mut buf, adj.hue as f32);
    }
    buf
}

/// Rotate every pixel's hue by `degrees`, keeping HSL saturation and lightness.
pub fn rotate_hue(buf: &mut PixelBuffer, degrees: f32) {
    let shift = degrees / 360.0;
    for px in buf.pixels_mut() {
        let (h, s, l) = rgb_to_hsl(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        );
        if s == 0.0 {
            continue;
        }
        let (r, g, b) = hsl_to_rgb((h + shift).rem_euclid(1.0), s, l);
        px[0] = channel_u8(r * 255.0);
        px[1] = channel_u8(g * 255.0);
        px[2] = channel_u8(b * 255.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/adjust.rs"]
mod tests;
