//! Tone mapping of the accumulated energy surface
//!
//! Brings the unclamped high-dynamic-range buffer into an 8-bit raster:
//! each channel is first rescaled linearly against its own observed
//! minimum and maximum, then run through contrast-limited adaptive
//! histogram equalization to lift faint structure without blowing out
//! saturated cores. Channels are processed independently and recombined.
//! The mapping is deterministic given the buffer contents.

use image::{Rgb, RgbImage};
use ndarray::{Array2, ArrayView2};

use super::buffer::{AccumulationBuffer, CHANNELS};
use super::clahe::equalize_adaptive;

/// Min-max normalize one channel plane into the full 8-bit range.
///
/// A constant channel (max == min, including the all-zero buffer of an
/// empty render) maps to zero rather than dividing by zero.
pub fn normalize_channel_to_u8(channel: &ArrayView2<f64>) -> Array2<u8> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in channel.iter() {
        min = min.min(value);
        max = max.max(value);
    }

    if !(max > min) {
        return Array2::zeros(channel.dim());
    }

    let scale = 255.0 / (max - min);
    channel.mapv(|value| ((value - min) * scale).round().clamp(0.0, 255.0) as u8)
}

/// Tone map the buffer into the final displayable raster
pub fn tone_map(buffer: &AccumulationBuffer, clip_limit: f64, grid: (usize, usize)) -> RgbImage {
    let width = buffer.width();
    let height = buffer.height();

    let planes: Vec<Array2<u8>> = (0..CHANNELS)
        .map(|channel| {
            let normalized = normalize_channel_to_u8(&buffer.channel(channel));
            equalize_adaptive(&normalized, clip_limit, grid)
        })
        .collect();

    let mut raster = RgbImage::new(width as u32, height as u32);
    for (x, y, pixel) in raster.enumerate_pixels_mut() {
        let (row, col) = (y as usize, x as usize);
        *pixel = Rgb([
            planes[0][[row, col]],
            planes[1][[row, col]],
            planes[2][[row, col]],
        ]);
    }

    raster
}
