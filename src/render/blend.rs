use std::{fmt, str::FromStr};

use crate::foundation::{
    buffer::PixelBuffer,
    error::{LayercompError, LayercompResult},
    math::{channel_u8, mul_div255_u8},
};

pub type Rgba8 = [u8; 4];

/// Per-pixel color-combination rule used when merging a layer with everything beneath it.
///
/// `Hue`, `Saturation`, `Color` and `Luminosity` are not blended in HSL space: they average the
/// two colors channel by channel. Existing output depends on that, so it is kept as is.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = LayercompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = s.trim().to_ascii_lowercase().replace('_', "-");
        BlendMode::ALL
            .into_iter()
            .find(|m| m.as_str() == mode)
            .ok_or_else(|| LayercompError::validation(format!("unknown blend mode '{mode}'")))
    }
}

/// Blend one color channel of `top` (x2) onto `base` (x1), both in 0..=255.
pub fn blend_channel(x1: u8, x2: u8, mode: BlendMode) -> u8 {
    let a = f32::from(x1);
    let b = f32::from(x2);
    let v = match mode {
        BlendMode::Normal => b,
        BlendMode::Multiply => a * b / 255.0,
        BlendMode::Screen => 255.0 - (255.0 - a) * (255.0 - b) / 255.0,
        BlendMode::Overlay => {
            if x1 < 128 {
                2.0 * a * b / 255.0
            } else {
                255.0 - 2.0 * (255.0 - a) * (255.0 - b) / 255.0
            }
        }
        BlendMode::Darken => a.min(b),
        BlendMode::Lighten => a.max(b),
        BlendMode::ColorDodge => {
            if x1 == 0 {
                0.0
            } else if x2 == 255 {
                255.0
            } else {
                (a * 255.0 / (255.0 - b)).min(255.0)
            }
        }
        BlendMode::ColorBurn => {
            if x1 == 255 {
                255.0
            } else if x2 == 0 {
                0.0
            } else {
                (255.0 - (255.0 - a) * 255.0 / b).max(0.0)
            }
        }
        BlendMode::HardLight => {
            if x2 < 128 {
                2.0 * b * a / 255.0
            } else {
                255.0 - 2.0 * (255.0 - b) * (255.0 - a) / 255.0
            }
        }
        BlendMode::SoftLight => {
            if x2 < 128 {
                2.0 * a * b / 255.0 + a * a * (1.0 - 2.0 * b / 255.0) / 255.0
            } else {
                2.0 * a * (255.0 - b) / 255.0 + (a / 255.0).sqrt() * (2.0 * b - 255.0)
            }
        }
        BlendMode::Difference => (a - b).abs(),
        BlendMode::Exclusion => a + b - 2.0 * a * b / 255.0,
        BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity => {
            (a + b) / 2.0
        }
    };
    channel_u8(v)
}

/// Blend a single pixel. A fully transparent `top` leaves `base` untouched, alpha included.
pub fn blend_px(base: Rgba8, top: Rgba8, mode: BlendMode) -> Rgba8 {
    if top[3] == 0 {
        return base;
    }
    let (a1, a2) = (u16::from(base[3]), u16::from(top[3]));
    // a1 + a2 - a1*a2, in 0..=255 fixed point.
    let alpha = (a1 + a2 - u16::from(mul_div255_u8(a1, a2))) as u8;
    [
        blend_channel(base[0], top[0], mode),
        blend_channel(base[1], top[1], mode),
        blend_channel(base[2], top[2], mode),
        alpha,
    ]
}

/// Blend `top` onto `base`, consuming and returning the base buffer.
pub fn blend_onto(
    mut base: PixelBuffer,
    top: &PixelBuffer,
    mode: BlendMode,
) -> LayercompResult<PixelBuffer> {
    if !base.same_dimensions(top) {
        return Err(LayercompError::validation(format!(
            "blend expects equal buffer dimensions, got {}x{} and {}x{}",
            base.width(),
            base.height(),
            top.width(),
            top.height()
        )));
    }
    for (d, s) in base.pixels_mut().zip(top.pixels()) {
        let out = blend_px([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode);
        d.copy_from_slice(&out);
    }
    Ok(base)
}

/// Pure form of [`blend_onto`]: neither input is modified.
pub fn blend(base: &PixelBuffer, top: &PixelBuffer, mode: BlendMode) -> LayercompResult<PixelBuffer> {
    blend_onto(base.clone(), top, mode)
}

/// Fold one rasterized layer into the running composite.
///
/// An accumulator without visible content (none yet, or zero alpha everywhere) is replaced by
/// the layer as-is. Color left under zero alpha by filters or opacity 0 does not count.
pub fn accumulate(
    acc: Option<PixelBuffer>,
    layer: PixelBuffer,
    mode: BlendMode,
) -> LayercompResult<PixelBuffer> {
    match acc {
        Some(acc) if !acc.is_blank() => blend_onto(acc, &layer, mode),
        Some(acc) if !acc.same_dimensions(&layer) => Err(LayercompError::validation(
            "accumulator and layer dimensions differ",
        )),
        _ => Ok(layer),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
