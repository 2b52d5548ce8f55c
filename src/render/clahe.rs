//! Contrast-limited adaptive histogram equalization
//!
//! Tile-based CLAHE over an 8-bit channel: the image is divided into a
//! grid of tiles, each tile gets a clipped-histogram equalization lookup
//! table, and every output pixel bilinearly interpolates between the four
//! nearest tile tables. The clip limit caps how much any single intensity
//! bin can steepen the mapping, which boosts faint structure without
//! blowing out saturated cores.

use ndarray::Array2;

const BINS: usize = 256;

/// Equalize one 8-bit channel in place of a global histogram stretch.
///
/// `clip_limit` is the multiple of the mean bin height at which tile
/// histograms are clipped (2.0 is a conventional default); `grid` is the
/// `(columns, rows)` tile layout and is shrunk automatically for images
/// smaller than the grid.
pub fn equalize_adaptive(channel: &Array2<u8>, clip_limit: f64, grid: (usize, usize)) -> Array2<u8> {
    let (height, width) = channel.dim();
    if height == 0 || width == 0 {
        return channel.clone();
    }

    let grid_x = grid.0.clamp(1, width);
    let grid_y = grid.1.clamp(1, height);
    let tile_w = width.div_ceil(grid_x);
    let tile_h = height.div_ceil(grid_y);

    // One equalization lookup table per tile
    let mut luts = vec![[0u8; BINS]; grid_x * grid_y];
    for ty in 0..grid_y {
        for tx in 0..grid_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            luts[ty * grid_x + tx] = tile_lut(channel, x0, x1, y0, y1, clip_limit);
        }
    }

    // Bilinear interpolation between the four surrounding tile tables,
    // measured from tile centers; border pixels clamp to the edge tiles.
    Array2::from_shape_fn((height, width), |(y, x)| {
        let fx = (x as f64 / tile_w as f64 - 0.5).clamp(0.0, (grid_x - 1) as f64);
        let fy = (y as f64 / tile_h as f64 - 0.5).clamp(0.0, (grid_y - 1) as f64);

        let tx0 = fx.floor() as usize;
        let ty0 = fy.floor() as usize;
        let tx1 = (tx0 + 1).min(grid_x - 1);
        let ty1 = (ty0 + 1).min(grid_y - 1);

        let wx = fx - tx0 as f64;
        let wy = fy - ty0 as f64;

        let value = channel[[y, x]] as usize;
        let top = (1.0 - wx) * luts[ty0 * grid_x + tx0][value] as f64
            + wx * luts[ty0 * grid_x + tx1][value] as f64;
        let bottom = (1.0 - wx) * luts[ty1 * grid_x + tx0][value] as f64
            + wx * luts[ty1 * grid_x + tx1][value] as f64;

        ((1.0 - wy) * top + wy * bottom).round().clamp(0.0, 255.0) as u8
    })
}

/// Build the clipped-histogram equalization table for one tile
fn tile_lut(
    channel: &Array2<u8>,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    clip_limit: f64,
) -> [u8; BINS] {
    let area = (x1 - x0) * (y1 - y0);
    if area == 0 {
        // Degenerate tile from an over-wide grid: identity mapping
        let mut identity = [0u8; BINS];
        for (value, entry) in identity.iter_mut().enumerate() {
            *entry = value as u8;
        }
        return identity;
    }

    let mut histogram = [0usize; BINS];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[channel[[y, x]] as usize] += 1;
        }
    }

    // Clip each bin at clip_limit times the mean height and hand the
    // excess back uniformly, so the CDF slope stays bounded.
    let clip_at = ((clip_limit * area as f64 / BINS as f64).round() as usize).max(1);
    let mut excess = 0usize;
    for count in &mut histogram {
        if *count > clip_at {
            excess += *count - clip_at;
            *count = clip_at;
        }
    }
    let bonus = excess / BINS;
    let remainder = excess % BINS;
    for (bin, count) in histogram.iter_mut().enumerate() {
        *count += bonus + usize::from(bin < remainder);
    }

    let mut lut = [0u8; BINS];
    let scale = 255.0 / area as f64;
    let mut cumulative = 0usize;
    for (value, &count) in histogram.iter().enumerate() {
        cumulative += count;
        lut[value] = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    lut
}
