use std::{fmt, str::FromStr};

use crate::{
    effects::blur::gaussian_blur,
    foundation::{
        buffer::PixelBuffer,
        error::{LayercompError, LayercompResult},
        math::channel_u8,
    },
};

/// Named stylistic filter; one per layer.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Identity.
    #[default]
    Normal,
    Grayscale,
    Sepia,
    Invert,
    Blur,
    Vintage,
    Cool,
    Warm,
    Sharpen,
}

impl FilterKind {
    pub const ALL: [FilterKind; 9] = [
        FilterKind::Normal,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::Blur,
        FilterKind::Vintage,
        FilterKind::Cool,
        FilterKind::Warm,
        FilterKind::Sharpen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Normal => "normal",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
            FilterKind::Blur => "blur",
            FilterKind::Vintage => "vintage",
            FilterKind::Cool => "cool",
            FilterKind::Warm => "warm",
            FilterKind::Sharpen => "sharpen",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = LayercompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.trim().to_ascii_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|f| f.as_str() == kind)
            .ok_or_else(|| LayercompError::validation(format!("unknown filter '{kind}'")))
    }
}

/// Tunables for the kernel-based filters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub blur_radius_px: u32,
    pub blur_sigma: f32,
    pub sharpen_radius_px: u32,
    pub sharpen_sigma: f32,
    /// Unsharp-mask strength; 1.0 adds the full high-pass detail back once.
    pub sharpen_amount: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            blur_radius_px: 4,
            blur_sigma: 2.0,
            sharpen_radius_px: 1,
            sharpen_sigma: 1.0,
            sharpen_amount: 1.0,
        }
    }
}

impl FilterSettings {
    pub fn validate(&self) -> LayercompResult<()> {
        if self.blur_radius_px > 256 || self.sharpen_radius_px > 256 {
            return Err(LayercompError::validation("filter radius must be <= 256"));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(LayercompError::validation("blur_sigma must be finite and > 0"));
        }
        if !self.sharpen_sigma.is_finite() || self.sharpen_sigma <= 0.0 {
            return Err(LayercompError::validation(
                "sharpen_sigma must be finite and > 0",
            ));
        }
        if !self.sharpen_amount.is_finite() || self.sharpen_amount < 0.0 {
            return Err(LayercompError::validation(
                "sharpen_amount must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Apply `kind` to every pixel of `buf`. Alpha is only touched by `blur`.
pub fn apply_filter(
    mut buf: PixelBuffer,
    kind: FilterKind,
    settings: &FilterSettings,
) -> LayercompResult<PixelBuffer> {
    match kind {
        FilterKind::Normal => {}
        FilterKind::Grayscale => map_rgb(&mut buf, |r, g, b| {
            let avg = (r + g + b) / 3.0;
            (avg, avg, avg)
        }),
        FilterKind::Sepia => map_rgb(&mut buf, |r, g, b| {
            (
                r * 0.393 + g * 0.769 + b * 0.189,
                r * 0.349 + g * 0.686 + b * 0.168,
                r * 0.272 + g * 0.534 + b * 0.131,
            )
        }),
        FilterKind::Invert => map_rgb(&mut buf, |r, g, b| (255.0 - r, 255.0 - g, 255.0 - b)),
        FilterKind::Vintage => map_rgb(&mut buf, |r, g, b| {
            (r * 0.9 + 20.0, g * 0.8 + 10.0, b * 0.7)
        }),
        FilterKind::Cool => map_rgb(&mut buf, |r, g, b| (r, g, b + 30.0)),
        FilterKind::Warm => map_rgb(&mut buf, |r, g, b| (r + 30.0, g + 15.0, b)),
        FilterKind::Blur => {
            return gaussian_blur(buf, settings.blur_radius_px, settings.blur_sigma);
        }
        FilterKind::Sharpen => return unsharp_mask(buf, settings),
    }
    Ok(buf)
}

fn map_rgb(buf: &mut PixelBuffer, f: impl Fn(f32, f32, f32) -> (f32, f32, f32)) {
    for px in buf.pixels_mut() {
        let (r, g, b) = f(f32::from(px[0]), f32::from(px[1]), f32::from(px[2]));
        px[0] = channel_u8(r);
        px[1] = channel_u8(g);
        px[2] = channel_u8(b);
    }
}

// c' = c + amount * (c - blur(c)) on color; alpha is preserved.
fn unsharp_mask(buf: PixelBuffer, settings: &FilterSettings) -> LayercompResult<PixelBuffer> {
    if settings.sharpen_radius_px == 0 || settings.sharpen_amount == 0.0 {
        return Ok(buf);
    }
    let blurred = gaussian_blur(
        buf.clone(),
        settings.sharpen_radius_px,
        settings.sharpen_sigma,
    )?;

    let amount = settings.sharpen_amount;
    let mut out = buf;
    for (px, bl) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let v = f32::from(px[c]);
            px[c] = channel_u8(v + amount * (v - f32::from(bl[c])));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
