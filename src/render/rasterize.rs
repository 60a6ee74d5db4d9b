use crate::{
    composition::layer::{Layer, validate_scale},
    effects::{
        adjust::{Adjustments, apply_adjustments},
        filter::{FilterKind, FilterSettings, apply_filter},
    },
    foundation::{
        buffer::PixelBuffer,
        core::{Affine, Canvas, Point, Rect},
        error::{LayercompError, LayercompResult},
        math::channel_u8,
    },
};

/// Render one layer into a canvas-sized buffer: placement, then filter, then adjustments.
///
/// The layer's own `opacity` replaces `adjustments.opacity`. Callers skip invisible layers
/// before getting here; a layer without a source image is an error.
#[tracing::instrument(level = "trace", skip_all, fields(layer = %layer.id()))]
pub fn rasterize_layer(
    layer: &Layer,
    canvas: Canvas,
    settings: &FilterSettings,
) -> LayercompResult<PixelBuffer> {
    let Some(source) = layer.source.as_ref() else {
        return Err(LayercompError::evaluation(format!(
            "{} has no source image to rasterize",
            layer.id()
        )));
    };

    let xf = placement(source.width(), source.height(), layer.position, layer.scale)?;
    let mut buf = PixelBuffer::for_canvas(canvas)?;
    draw_transformed(&mut buf, source.pixels(), xf)?;

    if layer.filter != FilterKind::Normal {
        buf = apply_filter(buf, layer.filter, settings)?;
    }

    let adjustments = Adjustments {
        opacity: layer.opacity,
        ..layer.adjustments
    };
    Ok(apply_adjustments(buf, &adjustments))
}

/// Image-space to canvas-space transform placing the image center at `position`.
pub fn placement(
    image_width: u32,
    image_height: u32,
    position: Point,
    scale: f64,
) -> LayercompResult<Affine> {
    validate_scale(scale)?;
    let w = f64::from(image_width) * scale;
    let h = f64::from(image_height) * scale;
    let origin = (position.x - w / 2.0, position.y - h / 2.0);
    Ok(Affine::translate(origin) * Affine::scale(scale))
}

/// Stretch `src` over the whole canvas, ignoring its aspect ratio.
pub fn stretch_to_canvas(src: &PixelBuffer, canvas: Canvas) -> LayercompResult<PixelBuffer> {
    let mut buf = PixelBuffer::for_canvas(canvas)?;
    if src.width() == 0 || src.height() == 0 {
        return Ok(buf);
    }
    let xf = Affine::scale_non_uniform(
        f64::from(canvas.width) / f64::from(src.width()),
        f64::from(canvas.height) / f64::from(src.height()),
    );
    draw_transformed(&mut buf, src, xf)?;
    Ok(buf)
}

// Bilinear, premultiplied resampling. Only destination pixels whose centers land inside the
// source rectangle are written; taps are clamped to the source edge.
fn draw_transformed(dst: &mut PixelBuffer, src: &PixelBuffer, xf: Affine) -> LayercompResult<()> {
    if xf.determinant().abs() < f64::EPSILON {
        return Err(LayercompError::validation("placement transform is degenerate"));
    }
    let (sw, sh) = (src.width(), src.height());
    if sw == 0 || sh == 0 {
        return Ok(());
    }
    let (dw, dh) = dst.dimensions();
    let inv = xf.inverse();

    let bbox = xf
        .transform_rect_bbox(Rect::new(0.0, 0.0, f64::from(sw), f64::from(sh)))
        .intersect(Rect::new(0.0, 0.0, f64::from(dw), f64::from(dh)));
    let x_start = bbox.x0.floor().max(0.0) as u32;
    let y_start = bbox.y0.floor().max(0.0) as u32;
    let x_end = (bbox.x1.ceil().max(0.0) as u32).min(dw);
    let y_end = (bbox.y1.ceil().max(0.0) as u32).min(dh);

    let (swf, shf) = (f64::from(sw), f64::from(sh));
    for y in y_start..y_end {
        for x in x_start..x_end {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= swf || p.y >= shf {
                continue;
            }
            let px = sample_bilinear(src, p.x - 0.5, p.y - 0.5);
            dst.set_pixel(x, y, px)?;
        }
    }
    Ok(())
}

fn sample_bilinear(src: &PixelBuffer, u: f64, v: f64) -> [u8; 4] {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);
    let (x0, y0) = (u.floor(), v.floor());
    let (fx, fy) = (u - x0, v - y0);
    let (x0, y0) = (x0 as u32, y0 as u32);

    let fetch = |x: u32, y: u32| src.pixel(x, y).unwrap_or([0; 4]);

    if fx < 1e-9 && fy < 1e-9 {
        return fetch(x0, y0);
    }

    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let taps = [
        (fetch(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (fetch(x1, y0), fx * (1.0 - fy)),
        (fetch(x0, y1), (1.0 - fx) * fy),
        (fetch(x1, y1), fx * fy),
    ];

    let mut alpha = 0.0f64;
    let mut color = [0.0f64; 3];
    for (px, w) in taps {
        let a = f64::from(px[3]) * w;
        alpha += a;
        for c in 0..3 {
            color[c] += f64::from(px[c]) * a;
        }
    }
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        channel_u8((color[0] / alpha) as f32),
        channel_u8((color[1] / alpha) as f32),
        channel_u8((color[2] / alpha) as f32),
        channel_u8(alpha as f32),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterize.rs"]
mod tests;
