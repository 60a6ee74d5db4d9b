use crate::foundation::error::{LayercompError, LayercompResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output dimensions shared by every layer of a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> LayercompResult<Self> {
        if width == 0 || height == 0 {
            return Err(LayercompError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Size a canvas for the first image of a stack.
    ///
    /// The image is never upscaled. Width is constrained first, then height, each step
    /// preserving the aspect ratio of the previous one.
    pub fn fit(image_width: u32, image_height: u32, bounds: CanvasBounds) -> LayercompResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(LayercompError::validation("image dimensions must be > 0"));
        }
        bounds.validate()?;

        let max_w = f64::from(bounds.max_width.min(image_width));
        let max_h = f64::from(bounds.max_height.min(image_height));
        let mut w = f64::from(image_width);
        let mut h = f64::from(image_height);

        if w > max_w {
            h *= max_w / w;
            w = max_w;
        }
        if h > max_h {
            w *= max_h / h;
            h = max_h;
        }

        Self::new((w.round() as u32).max(1), (h.round() as u32).max(1))
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Bounding box the first loaded image is fitted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for CanvasBounds {
    // 80% x 60% of a 1920x1080 viewport.
    fn default() -> Self {
        Self {
            max_width: 1536,
            max_height: 648,
        }
    }
}

impl CanvasBounds {
    pub fn validate(self) -> LayercompResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(LayercompError::validation("canvas bounds must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
