use std::{fmt, sync::Arc};

use crate::{
    effects::{adjust::Adjustments, filter::FilterKind},
    foundation::{
        buffer::PixelBuffer,
        core::Point,
        error::{LayercompError, LayercompResult},
    },
    render::blend::BlendMode,
};

/// Stable identifier of a layer within its stack.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Decoded bitmap owned by a layer. Immutable once set; clones share the pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage(Arc<PixelBuffer>);

impl SourceImage {
    pub fn new(pixels: PixelBuffer) -> Self {
        Self(Arc::new(pixels))
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }
}

impl From<PixelBuffer> for SourceImage {
    fn from(pixels: PixelBuffer) -> Self {
        Self::new(pixels)
    }
}

/// One editable image unit of a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    id: LayerId,
    pub name: String,
    pub visible: bool,
    /// `None` while the image is still loading; such layers are skipped when compositing.
    pub source: Option<SourceImage>,
    pub filter: FilterKind,
    pub adjustments: Adjustments,
    /// Layer opacity in percent. Takes precedence over `adjustments.opacity` when rasterizing.
    pub opacity: i32,
    pub blend_mode: BlendMode,
    /// Canvas coordinate of the image center.
    pub position: Point,
    pub scale: f64,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, source: Option<SourceImage>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            source,
            filter: FilterKind::Normal,
            adjustments: Adjustments::default(),
            opacity: 100,
            blend_mode: BlendMode::Normal,
            position: Point::ZERO,
            scale: 1.0,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_opacity(mut self, opacity: i32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Whether the compositor would draw this layer.
    pub fn is_drawable(&self) -> bool {
        self.visible && self.source.is_some()
    }

    pub fn validate(&self) -> LayercompResult<()> {
        if self.name.trim().is_empty() {
            return Err(LayercompError::validation(format!(
                "{}: name must not be empty",
                self.id
            )));
        }
        self.adjustments.validate()?;
        validate_opacity(self.opacity)?;
        validate_scale(self.scale)?;
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            return Err(LayercompError::validation(format!(
                "{}: position must be finite",
                self.id
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_opacity(opacity: i32) -> LayercompResult<()> {
    if !(0..=100).contains(&opacity) {
        return Err(LayercompError::validation(format!(
            "opacity must be in [0, 100], got {opacity}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_scale(scale: f64) -> LayercompResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LayercompError::validation(format!(
            "scale must be finite and > 0, got {scale}"
        )));
    }
    Ok(())
}

/// Partial update applied by [`LayerStack::update_layer`](crate::LayerStack::update_layer).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub filter: Option<FilterKind>,
    pub adjustments: Option<Adjustments>,
    pub opacity: Option<i32>,
    pub blend_mode: Option<BlendMode>,
    pub position: Option<Point>,
    pub scale: Option<f64>,
}

impl LayerPatch {
    pub(crate) fn apply_to(self, layer: &mut Layer) {
        let LayerPatch {
            name,
            visible,
            filter,
            adjustments,
            opacity,
            blend_mode,
            position,
            scale,
        } = self;
        if let Some(v) = name {
            layer.name = v;
        }
        if let Some(v) = visible {
            layer.visible = v;
        }
        if let Some(v) = filter {
            layer.filter = v;
        }
        if let Some(v) = adjustments {
            layer.adjustments = v;
        }
        if let Some(v) = opacity {
            layer.opacity = v;
        }
        if let Some(v) = blend_mode {
            layer.blend_mode = v;
        }
        if let Some(v) = position {
            layer.position = v;
        }
        if let Some(v) = scale {
            layer.scale = v;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/layer.rs"]
mod tests;
