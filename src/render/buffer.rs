//! High-dynamic-range accumulation buffer
//!
//! Per-pixel RGB energy surface that sources are additively splatted onto.
//! Values are left unclamped during accumulation so that overlapping bright
//! sources represent saturation physics correctly; clamping and
//! normalization happen only at tone-mapping time. The buffer is owned
//! exclusively by one render call and carries no internal locking.

use ndarray::{Array3, ArrayView2, Axis};
use rand::Rng;

use super::psf::MoffatKernel;

/// Number of color channels in the buffer and the output raster
pub const CHANNELS: usize = 3;

/// Floating-point RGB energy buffer of shape `(height, width, 3)`
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    data: Array3<f64>,
}

impl AccumulationBuffer {
    /// Create a zero-initialized buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, CHANNELS)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Read one channel plane
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(2), channel)
    }

    /// Energy of one pixel across all channels
    pub fn pixel(&self, x: usize, y: usize) -> [f64; CHANNELS] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    /// Total accumulated energy over all pixels and channels
    pub fn total_energy(&self) -> f64 {
        self.data.sum()
    }

    /// Splat one source onto the buffer.
    ///
    /// The splat center `(x, y)` is perturbed by one positional jitter
    /// sample per axis drawn from `U(-jitter, jitter)` before rounding to
    /// integer pixel coordinates. Each kernel entry then deposits
    /// `luminosity * (1 + noise) * weight` into all channels of its target
    /// pixel, with an independent brightness noise sample per pixel write
    /// drawn from `U(-noise_amplitude, noise_amplitude)`.
    ///
    /// Out-of-bounds targets are silently dropped, not clamped; partial
    /// kernels at the image edge are the expected behavior.
    pub fn splat<R: Rng>(
        &mut self,
        x: f64,
        y: f64,
        kernel: &MoffatKernel,
        luminosity: f64,
        jitter: f64,
        noise_amplitude: f64,
        rng: &mut R,
    ) {
        let (jitter_x, jitter_y) = if jitter > 0.0 {
            (
                rng.gen_range(-jitter..jitter),
                rng.gen_range(-jitter..jitter),
            )
        } else {
            (0.0, 0.0)
        };

        let center_x = (x + jitter_x).round() as i64;
        let center_y = (y + jitter_y).round() as i64;

        let width = self.width() as i64;
        let height = self.height() as i64;

        for &(dx, dy, weight) in &kernel.weights {
            let px = center_x + dx as i64;
            let py = center_y + dy as i64;

            // Silent drop of out-of-window contributions
            if px < 0 || px >= width || py < 0 || py >= height {
                continue;
            }

            let noise = if noise_amplitude > 0.0 {
                rng.gen_range(-noise_amplitude..noise_amplitude)
            } else {
                0.0
            };
            let value = luminosity * (1.0 + noise) * weight;

            let (px, py) = (px as usize, py as usize);
            for channel in 0..CHANNELS {
                self.data[[py, px, channel]] += value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kernel(fwhm: f64) -> MoffatKernel {
        MoffatKernel::synthesize(fwhm, 2.0, 3.0).unwrap()
    }

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = AccumulationBuffer::new(16, 9);
        assert_eq!(buffer.width(), 16);
        assert_eq!(buffer.height(), 9);
        assert_relative_eq!(buffer.total_energy(), 0.0);
    }

    #[test]
    fn test_splat_conserves_energy_when_fully_inside() {
        let mut buffer = AccumulationBuffer::new(64, 64);
        let mut rng = StdRng::seed_from_u64(42);
        let luminosity = 100.0;

        buffer.splat(32.0, 32.0, &kernel(2.0), luminosity, 0.0, 0.0, &mut rng);

        // Normalized kernel fully inside the image deposits the whole
        // luminosity into each of the three channels.
        assert_relative_eq!(
            buffer.total_energy(),
            luminosity * CHANNELS as f64,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_splat_is_additive_across_sources() {
        let mut buffer = AccumulationBuffer::new(64, 64);
        let mut rng = StdRng::seed_from_u64(1);
        let k = kernel(2.0);

        buffer.splat(32.0, 32.0, &k, 50.0, 0.0, 0.0, &mut rng);
        let first = buffer.pixel(32, 32)[0];

        buffer.splat(32.0, 32.0, &k, 50.0, 0.0, 0.0, &mut rng);
        let second = buffer.pixel(32, 32)[0];

        assert_relative_eq!(second, 2.0 * first, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_bounds_contributions_are_dropped() {
        let mut buffer = AccumulationBuffer::new(32, 32);
        let mut rng = StdRng::seed_from_u64(3);

        // Fully outside and far from the edge: nothing lands
        buffer.splat(200.0, 200.0, &kernel(2.0), 100.0, 0.0, 0.0, &mut rng);
        assert_relative_eq!(buffer.total_energy(), 0.0);

        // Straddling the edge: some energy lands, the rest is dropped
        buffer.splat(0.0, 16.0, &kernel(2.0), 100.0, 0.0, 0.0, &mut rng);
        let energy = buffer.total_energy();
        assert!(energy > 0.0);
        assert!(energy < 100.0 * CHANNELS as f64);
    }

    #[test]
    fn test_channels_receive_equal_energy() {
        let mut buffer = AccumulationBuffer::new(32, 32);
        let mut rng = StdRng::seed_from_u64(9);

        buffer.splat(16.0, 16.0, &kernel(3.0), 80.0, 0.2, 0.05, &mut rng);

        for y in 0..32 {
            for x in 0..32 {
                let [r, g, b] = buffer.pixel(x, y);
                assert_relative_eq!(r, g, epsilon = 1e-12);
                assert_relative_eq!(g, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_brightness_noise_stays_in_band() {
        let mut buffer = AccumulationBuffer::new(64, 64);
        let mut rng = StdRng::seed_from_u64(17);
        let luminosity = 100.0;
        let noise = 0.05;

        buffer.splat(32.0, 32.0, &kernel(2.0), luminosity, 0.0, noise, &mut rng);

        // Every pixel write was scaled by (1 + U(-0.05, 0.05)), so the
        // total lands within the noise band around the exact luminosity.
        let per_channel = buffer.total_energy() / CHANNELS as f64;
        assert!(per_channel > luminosity * (1.0 - noise));
        assert!(per_channel < luminosity * (1.0 + noise));
    }

    #[test]
    fn test_positional_jitter_moves_center_at_most_one_pixel() {
        // Jitter of 0.2 cannot move the rounded center by more than one
        // pixel; the peak must stay in the 3x3 neighborhood.
        for seed in 0..20 {
            let mut buffer = AccumulationBuffer::new(64, 64);
            let mut rng = StdRng::seed_from_u64(seed);
            buffer.splat(32.0, 32.0, &kernel(2.0), 100.0, 0.2, 0.0, &mut rng);

            let mut peak = (0usize, 0usize);
            let mut peak_value = f64::MIN;
            for y in 0..64 {
                for x in 0..64 {
                    let value = buffer.pixel(x, y)[0];
                    if value > peak_value {
                        peak_value = value;
                        peak = (x, y);
                    }
                }
            }

            assert!((peak.0 as i64 - 32).abs() <= 1, "peak at {:?}", peak);
            assert!((peak.1 as i64 - 32).abs() <= 1, "peak at {:?}", peak);
        }
    }

    #[test]
    fn test_splat_with_same_seed_is_reproducible() {
        let k = kernel(2.5);

        let mut first = AccumulationBuffer::new(48, 48);
        let mut rng = StdRng::seed_from_u64(77);
        first.splat(24.3, 20.7, &k, 60.0, 0.2, 0.05, &mut rng);

        let mut second = AccumulationBuffer::new(48, 48);
        let mut rng = StdRng::seed_from_u64(77);
        second.splat(24.3, 20.7, &k, 60.0, 0.2, 0.05, &mut rng);

        for y in 0..48 {
            for x in 0..48 {
                assert_relative_eq!(first.pixel(x, y)[0], second.pixel(x, y)[0]);
            }
        }
    }
}
