use rayon::prelude::*;

use crate::{
    composition::{layer::Layer, stack::LayerStack},
    effects::{
        adjust::{Adjustments, apply_adjustments},
        filter::{FilterKind, FilterSettings, apply_filter},
    },
    foundation::{buffer::PixelBuffer, core::Canvas, error::LayercompResult},
    render::{
        blend::accumulate,
        rasterize::{rasterize_layer, stretch_to_canvas},
    },
};

/// Final composite of one stack snapshot.
///
/// Display and export both read `buffer`; there is no second render path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    pub buffer: PixelBuffer,
    /// Layers rasterized and folded into `buffer`.
    pub layers_drawn: usize,
    /// Layers skipped because they were hidden or had no image yet.
    pub layers_skipped: usize,
}

/// Composite `layers` (bottom to top) onto a transparent canvas.
///
/// Hidden layers and layers still waiting for their image are skipped without being
/// rasterized. Each drawn layer merges with everything beneath it using its own blend mode.
#[tracing::instrument(skip(layers, settings), fields(layer_count = layers.len()))]
pub fn composite_layers(
    layers: &[Layer],
    canvas: Canvas,
    settings: &FilterSettings,
) -> LayercompResult<Composite> {
    let mut acc: Option<PixelBuffer> = None;
    let mut layers_drawn = 0usize;
    let mut layers_skipped = 0usize;

    for layer in layers {
        if !layer.visible {
            tracing::trace!(layer = %layer.id(), "skip hidden layer");
            layers_skipped += 1;
            continue;
        }
        if layer.source.is_none() {
            tracing::debug!(layer = %layer.id(), "skip layer without image");
            layers_skipped += 1;
            continue;
        }

        let raster = rasterize_layer(layer, canvas, settings)?;
        acc = Some(accumulate(acc, raster, layer.blend_mode)?);
        layers_drawn += 1;
    }

    let buffer = match acc {
        Some(buf) => buf,
        None => PixelBuffer::for_canvas(canvas)?,
    };
    tracing::debug!(layers_drawn, layers_skipped, "composite done");

    Ok(Composite {
        buffer,
        layers_drawn,
        layers_skipped,
    })
}

/// Single-image path without a layer stack: stretch to the canvas, filter, adjust.
#[tracing::instrument(skip(image, settings))]
pub fn composite_image(
    image: &PixelBuffer,
    canvas: Canvas,
    filter: FilterKind,
    adjustments: &Adjustments,
    settings: &FilterSettings,
) -> LayercompResult<Composite> {
    adjustments.validate()?;
    let mut buf = stretch_to_canvas(image, canvas)?;
    if filter != FilterKind::Normal {
        buf = apply_filter(buf, filter, settings)?;
    }
    Ok(Composite {
        buffer: apply_adjustments(buf, adjustments),
        layers_drawn: 1,
        layers_skipped: 0,
    })
}

/// Composite independent snapshots in parallel. Output order matches `stacks`.
pub fn composite_batch(stacks: &[LayerStack]) -> LayercompResult<Vec<Composite>> {
    stacks.par_iter().map(LayerStack::composite).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
