use crate::{
    composition::{
        layer::{Layer, LayerId, LayerPatch, SourceImage},
        settings::EditorSettings,
    },
    effects::{adjust::Adjustments, filter::FilterKind},
    foundation::{
        core::{Canvas, Point},
        error::{LayercompError, LayercompResult},
    },
    render::{
        blend::BlendMode,
        pipeline::{Composite, composite_layers},
    },
};

/// Ordered layer collection plus the active-layer pointer.
///
/// Layers are stored bottom-to-top: index 0 is the bottom of the stack and the last element is
/// drawn last. "Up" moves a layer towards the top (a higher index), "down" towards the bottom.
///
/// Every edit takes `&self` and returns a new stack with the target layer replaced, so a
/// snapshot being composited is never affected by a concurrent edit. Source images are shared
/// between snapshots.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    settings: EditorSettings,
    canvas: Option<Canvas>,
    layers: Vec<Layer>,
    active: Option<LayerId>,
    next_id: u64,
}

impl LayerStack {
    /// Empty stack; the canvas is sized by the first image added.
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Empty stack with a fixed canvas.
    pub fn with_canvas(settings: EditorSettings, canvas: Canvas) -> Self {
        Self {
            settings,
            canvas: Some(canvas),
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Layers bottom to top (compositing order).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers top to bottom (the order a layer panel lists them).
    pub fn layers_top_down(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Position counted from the bottom of the stack.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    pub fn active(&self) -> Option<LayerId> {
        self.active
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active.and_then(|id| self.get(id))
    }

    /// Put a decoded image on top of the stack and make it the active layer.
    ///
    /// The first image fixes the canvas size. New layers are centered on the canvas and scaled
    /// down (never up) to fit inside it.
    pub fn add_layer(
        &self,
        source: SourceImage,
        name: Option<&str>,
    ) -> LayercompResult<(Self, LayerId)> {
        let mut next = self.clone();
        let canvas = next.ensure_canvas(&source)?;
        let id = next.alloc_id();
        let layer = Layer::new(id, next.layer_name(name), None);
        next.layers.push(place_source(layer, source, canvas));
        next.active = Some(id);
        tracing::debug!(%id, layers = next.layers.len(), "layer added");
        Ok((next, id))
    }

    /// Add a layer whose image is still loading. It is skipped when compositing until
    /// [`LayerStack::set_source`] provides the pixels.
    pub fn add_pending_layer(&self, name: Option<&str>) -> (Self, LayerId) {
        let mut next = self.clone();
        let id = next.alloc_id();
        let mut layer = Layer::new(id, next.layer_name(name), None);
        if let Some(canvas) = next.canvas {
            layer.position = canvas.center();
        }
        next.layers.push(layer);
        next.active = Some(id);
        (next, id)
    }

    /// Attach the decoded image of a pending layer and apply the default placement.
    ///
    /// A layer's image is set once; a layer that already has one is rejected.
    pub fn set_source(&self, id: LayerId, source: SourceImage) -> LayercompResult<Self> {
        let idx = self.require(id)?;
        if self.layers[idx].source.is_some() {
            return Err(LayercompError::validation(format!(
                "{id} already has a source image"
            )));
        }
        let mut next = self.clone();
        let canvas = next.ensure_canvas(&source)?;
        let layer = next.layers[idx].clone();
        next.layers[idx] = place_source(layer, source, canvas);
        Ok(next)
    }

    /// Remove a layer. Clears the active pointer if it referenced the removed layer.
    pub fn remove_layer(&self, id: LayerId) -> LayercompResult<Self> {
        let idx = self.require(id)?;
        let mut next = self.clone();
        next.layers.remove(idx);
        if next.active == Some(id) {
            next.active = None;
        }
        tracing::debug!(%id, layers = next.layers.len(), "layer removed");
        Ok(next)
    }

    /// Apply a partial update; the resulting layer must validate.
    pub fn update_layer(&self, id: LayerId, patch: LayerPatch) -> LayercompResult<Self> {
        self.modify(id, |layer| {
            patch.apply_to(layer);
            Ok(())
        })
    }

    pub fn toggle_visibility(&self, id: LayerId) -> LayercompResult<Self> {
        self.modify(id, |layer| {
            layer.visible = !layer.visible;
            Ok(())
        })
    }

    pub fn set_visibility(&self, id: LayerId, visible: bool) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            visible: Some(visible),
            ..LayerPatch::default()
        })
    }

    pub fn set_blend_mode(&self, id: LayerId, blend_mode: BlendMode) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            blend_mode: Some(blend_mode),
            ..LayerPatch::default()
        })
    }

    pub fn set_filter(&self, id: LayerId, filter: FilterKind) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            filter: Some(filter),
            ..LayerPatch::default()
        })
    }

    pub fn set_adjustments(&self, id: LayerId, adjustments: Adjustments) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            adjustments: Some(adjustments),
            ..LayerPatch::default()
        })
    }

    pub fn set_opacity(&self, id: LayerId, opacity: i32) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            opacity: Some(opacity),
            ..LayerPatch::default()
        })
    }

    pub fn set_position(&self, id: LayerId, position: Point) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            position: Some(position),
            ..LayerPatch::default()
        })
    }

    pub fn set_scale(&self, id: LayerId, scale: f64) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            scale: Some(scale),
            ..LayerPatch::default()
        })
    }

    pub fn rename(&self, id: LayerId, name: impl Into<String>) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            name: Some(name.into()),
            ..LayerPatch::default()
        })
    }

    /// Back to no filter and neutral adjustments. Placement, blend mode and layer opacity stay.
    pub fn reset_edits(&self, id: LayerId) -> LayercompResult<Self> {
        self.update_layer(id, LayerPatch {
            filter: Some(FilterKind::Normal),
            adjustments: Some(Adjustments::default()),
            ..LayerPatch::default()
        })
    }

    /// Swap with the layer above. No-op for the top layer.
    pub fn move_layer_up(&self, id: LayerId) -> LayercompResult<Self> {
        let idx = self.require(id)?;
        let mut next = self.clone();
        if idx + 1 < next.layers.len() {
            next.layers.swap(idx, idx + 1);
        }
        Ok(next)
    }

    /// Swap with the layer below. No-op for the bottom layer.
    pub fn move_layer_down(&self, id: LayerId) -> LayercompResult<Self> {
        let idx = self.require(id)?;
        let mut next = self.clone();
        if idx > 0 {
            next.layers.swap(idx, idx - 1);
        }
        Ok(next)
    }

    pub fn set_active(&self, id: Option<LayerId>) -> LayercompResult<Self> {
        if let Some(id) = id {
            self.require(id)?;
        }
        let mut next = self.clone();
        next.active = id;
        Ok(next)
    }

    /// Composite the current snapshot.
    pub fn composite(&self) -> LayercompResult<Composite> {
        let canvas = self.canvas.ok_or_else(|| {
            LayercompError::evaluation("stack has no canvas yet; add an image first")
        })?;
        composite_layers(&self.layers, canvas, &self.settings.filters)
    }

    fn require(&self, id: LayerId) -> LayercompResult<usize> {
        self.index_of(id).ok_or(LayercompError::UnknownLayer(id))
    }

    fn modify(
        &self,
        id: LayerId,
        f: impl FnOnce(&mut Layer) -> LayercompResult<()>,
    ) -> LayercompResult<Self> {
        let idx = self.require(id)?;
        let mut layer = self.layers[idx].clone();
        f(&mut layer)?;
        layer.validate()?;
        let mut next = self.clone();
        next.layers[idx] = layer;
        Ok(next)
    }

    fn ensure_canvas(&mut self, source: &SourceImage) -> LayercompResult<Canvas> {
        if source.width() == 0 || source.height() == 0 {
            return Err(LayercompError::validation("source image must not be empty"));
        }
        if let Some(canvas) = self.canvas {
            return Ok(canvas);
        }
        let canvas = Canvas::fit(source.width(), source.height(), self.settings.canvas_bounds)?;
        tracing::debug!(width = canvas.width, height = canvas.height, "canvas sized");
        self.canvas = Some(canvas);
        Ok(canvas)
    }

    fn alloc_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn layer_name(&self, name: Option<&str>) -> String {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!("Layer {}", self.layers.len() + 1),
        }
    }
}

fn place_source(mut layer: Layer, source: SourceImage, canvas: Canvas) -> Layer {
    let fit = (f64::from(canvas.width) / f64::from(source.width()))
        .min(f64::from(canvas.height) / f64::from(source.height()))
        .min(1.0);
    layer.position = canvas.center();
    layer.scale = fit;
    layer.source = Some(source);
    layer
}

#[cfg(test)]
#[path = "../../tests/unit/composition/stack.rs"]
mod tests;
