//! layercomp composites an ordered stack of image layers into a single RGBA8 buffer.
//!
//! Each layer carries its own placement, filter, tonal adjustments, opacity and blend mode.
//!
//! # Pipeline overview
//!
//! For every visible layer, bottom to top:
//!
//! 1. **Rasterize**: place the source image on a transparent canvas-sized buffer
//!    (centered at `position`, scaled by `scale`), run its [`FilterKind`], then its
//!    [`Adjustments`] with the layer opacity.
//! 2. **Blend**: fold the raster into the running composite with the layer's [`BlendMode`].
//!
//! The first drawn layer is taken as-is instead of being blended against an empty canvas.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure composites**: a composite is a function of a [`LayerStack`] snapshot. No IO and no
//!   shared mutable state; buffers move between stages by value.
//! - **Straight alpha** at the API boundary: [`PixelBuffer`] holds non-premultiplied RGBA8.
//! - **Bottom-to-top storage**: index 0 of [`LayerStack::layers`] is the bottom layer.
#![forbid(unsafe_code)]

mod assets;
mod composition;
mod effects;
mod foundation;
mod render;

pub use assets::decode::{decode_image, encode_png};
pub use composition::layer::{Layer, LayerId, LayerPatch, SourceImage};
pub use composition::settings::EditorSettings;
pub use composition::stack::LayerStack;
pub use effects::adjust::{Adjustments, apply_adjustments, rotate_hue};
pub use effects::blur::gaussian_blur;
pub use effects::filter::{FilterKind, FilterSettings, apply_filter};
pub use foundation::buffer::PixelBuffer;
pub use foundation::core::{Affine, Canvas, CanvasBounds, Point, Rect, Vec2};
pub use foundation::error::{LayercompError, LayercompResult};
pub use render::blend::{BlendMode, Rgba8, accumulate, blend, blend_channel, blend_onto, blend_px};
pub use render::pipeline::{Composite, composite_batch, composite_image, composite_layers};
pub use render::rasterize::{placement, rasterize_layer, stretch_to_canvas};
