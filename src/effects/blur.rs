use crate::foundation::{
    buffer::PixelBuffer,
    error::{LayercompError, LayercompResult},
    math::{premultiply_px, unpremultiply_px},
};

/// Separable Gaussian blur of all four channels.
///
/// Color is blurred premultiplied so fully transparent neighbours only lower alpha and never
/// pull edge colors towards black.
pub fn gaussian_blur(buf: PixelBuffer, radius: u32, sigma: f32) -> LayercompResult<PixelBuffer> {
    if radius == 0 || buf.width() == 0 || buf.height() == 0 {
        return Ok(buf);
    }
    let kernel = blur_kernel(radius, sigma)?;
    let (width, height) = buf.dimensions();

    let mut src = buf.into_raw();
    for px in src.chunks_exact_mut(4) {
        premultiply_px(px);
    }

    let w = width as usize;
    let h = height as usize;
    let mut line = Vec::with_capacity(w.max(h) * 4);
    for y in 0..h {
        convolve_line(&mut src, y * w, 1, w, &kernel, &mut line);
    }
    for x in 0..w {
        convolve_line(&mut src, x, w, h, &kernel, &mut line);
    }

    for px in src.chunks_exact_mut(4) {
        unpremultiply_px(px);
    }
    PixelBuffer::from_rgba8(width, height, src)
}

const Q16_ONE: u32 = 1 << 16;

/// Normalized Gaussian weights in Q16, `2 * radius + 1` taps summing to exactly `Q16_ONE`.
///
/// Weights are quantized from the running cumulative sum, so rounding error never piles up on
/// a single tap.
fn blur_kernel(radius: u32, sigma: f32) -> LayercompResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LayercompError::validation("blur sigma must be > 0"));
    }
    let r = i64::from(radius);
    let two_s2 = 2.0 * f64::from(sigma).powi(2);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_s2).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(LayercompError::evaluation("blur kernel has no weight"));
    }

    let mut taps = Vec::with_capacity(raw.len());
    let mut cumulative = 0.0f64;
    let mut emitted = 0u32;
    for (i, w) in raw.iter().enumerate() {
        cumulative += w / total;
        let target = if i + 1 == raw.len() {
            Q16_ONE
        } else {
            ((cumulative * f64::from(Q16_ONE)).round() as u32).clamp(emitted, Q16_ONE)
        };
        taps.push(target - emitted);
        emitted = target;
    }
    Ok(taps)
}

// Convolve `len` pixels starting at pixel `first`, `step` pixels apart, in place. Samples past
// either end repeat the edge pixel. `line` is scratch space holding the unfiltered input.
fn convolve_line(
    data: &mut [u8],
    first: usize,
    step: usize,
    len: usize,
    kernel: &[u32],
    line: &mut Vec<u8>,
) {
    line.clear();
    for i in 0..len {
        let at = (first + i * step) * 4;
        line.extend_from_slice(&data[at..at + 4]);
    }

    let radius = kernel.len() / 2;
    let last = len - 1;
    for i in 0..len {
        let mut sum = [0u32; 4];
        for (k, &weight) in kernel.iter().enumerate() {
            let j = (i + k).saturating_sub(radius).min(last);
            let px = &line[j * 4..j * 4 + 4];
            for (acc, &v) in sum.iter_mut().zip(px) {
                *acc += weight * u32::from(v);
            }
        }
        let at = (first + i * step) * 4;
        for (dst, acc) in data[at..at + 4].iter_mut().zip(sum) {
            *dst = ((acc + Q16_ONE / 2) >> 16).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
