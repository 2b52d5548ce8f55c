//! Moffat-profile point spread function kernels
//!
//! The Moffat profile `(1 + r^2/alpha^2)^(-beta)` approximates the light
//! distribution a point source produces on a sensor, with heavier wings
//! than a Gaussian. The shape parameter beta controls how fast the wings
//! fall; alpha sets the spatial scale and is derived from the desired FWHM:
//!
//! ```text
//! alpha = FWHM / (2 * sqrt(2^(1/beta) - 1))
//! ```
//!
//! Kernels are discretized over a square window of integer offsets and
//! normalized so the weights sum to exactly 1, conserving each source's
//! total brightness contribution regardless of kernel size.

/// A discrete, normalized Moffat kernel for one source.
///
/// Ephemeral: recomputed per source because the FWHM depends on that
/// source's display radius. Covers all integer offsets with
/// `|dx|, |dy| <= kernel_radius`.
#[derive(Debug, Clone)]
pub struct MoffatKernel {
    /// Half-size of the square kernel window in pixels
    pub kernel_radius: i32,
    /// `(dx, dy, weight)` triples; weights sum to 1.0
    pub weights: Vec<(i32, i32, f64)>,
}

impl MoffatKernel {
    /// Synthesize a kernel for the given FWHM (pixels).
    ///
    /// Returns `None` when the derived alpha is non-positive or non-finite
    /// (degenerate PSF); such sources are skipped rather than splatted with
    /// an empty kernel.
    pub fn synthesize(fwhm: f64, beta: f64, kernel_size_multiplier: f64) -> Option<Self> {
        let alpha = fwhm / (2.0 * (2f64.powf(1.0 / beta) - 1.0).sqrt());
        if !alpha.is_finite() || alpha <= 0.0 {
            return None;
        }

        let kernel_radius = (kernel_size_multiplier * alpha).ceil() as i32;
        let alpha_sq = alpha * alpha;

        let mut weights =
            Vec::with_capacity(((2 * kernel_radius + 1) * (2 * kernel_radius + 1)) as usize);
        let mut sum = 0.0;

        for dy in -kernel_radius..=kernel_radius {
            for dx in -kernel_radius..=kernel_radius {
                let r_sq = (dx * dx + dy * dy) as f64;
                let weight = (1.0 + r_sq / alpha_sq).powf(-beta);
                weights.push((dx, dy, weight));
                sum += weight;
            }
        }

        for (_, _, weight) in &mut weights {
            *weight /= sum;
        }

        Some(Self {
            kernel_radius,
            weights,
        })
    }

    /// Weight at a given offset, zero outside the window. Test convenience.
    pub fn weight_at(&self, dx: i32, dy: i32) -> f64 {
        self.weights
            .iter()
            .find(|(x, y, _)| *x == dx && *y == dy)
            .map(|(_, _, w)| *w)
            .unwrap_or(0.0)
    }
}
