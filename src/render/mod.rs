//! Star field rendering engine
//!
//! Turns a list of point sources and an observer window into a tone-mapped
//! raster. The pipeline per source: faint-end cutoff, projection into pixel
//! coordinates, magnitude-to-brightness conversion, Moffat kernel synthesis
//! and additive splatting into a high-dynamic-range buffer. Once all
//! sources are accumulated, the buffer is min-max normalized and equalized
//! into the final 8-bit image.

pub mod brightness;
pub mod buffer;
pub mod clahe;
pub mod projector;
pub mod psf;
pub mod tonemap;

use image::RgbImage;
use log::debug;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use thiserror::Error;

use crate::catalog::StarRecord;
use crate::observer::ObserverWindow;

pub use brightness::{intensity_from_magnitude, photometry_for, SourcePhotometry};
pub use buffer::{AccumulationBuffer, CHANNELS};
pub use clahe::equalize_adaptive;
pub use projector::WindowProjector;
pub use psf::MoffatKernel;
pub use tonemap::tone_map;

/// Errors from render precondition checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("field of view must be positive, got {fov_ra_deg} x {fov_dec_deg} degrees")]
    InvalidFieldOfView { fov_ra_deg: f64, fov_dec_deg: f64 },

    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidImageDimensions { width: usize, height: usize },
}

/// Tunable parameters of the rendering model.
///
/// The defaults reproduce the reference appearance; most callers only ever
/// override the stochastic amplitudes (for deterministic output) or the
/// tone-mapping strength.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Exponent scale of the magnitude-to-intensity law
    pub magnitude_scale: f64,
    /// Base luminosity deposited by an unsaturated source, energy units
    pub base_luminosity: f64,
    /// Multiple of the base luminosity assigned to saturated sources
    pub saturation_factor: f64,
    /// Magnitude at and below which sources saturate
    pub saturation_magnitude: f64,
    /// Smallest display radius in pixels
    pub min_radius: f64,
    /// Largest display radius in pixels at the reference resolution
    pub base_max_radius: f64,
    /// FWHM per unit display radius at the reference resolution
    pub base_fwhm_scale: f64,
    /// Moffat shape parameter
    pub psf_beta: f64,
    /// Kernel half-size in units of the Moffat alpha
    pub kernel_size_multiplier: f64,
    /// Image side length at which the base radii apply, pixels
    pub reference_resolution: usize,
    /// Positional jitter amplitude in pixels, `U(-a, a)` per axis
    pub position_jitter: f64,
    /// Brightness noise amplitude, `U(-a, a)` relative, per pixel write
    pub brightness_noise: f64,
    /// CLAHE clip limit as a multiple of the mean histogram bin
    pub clahe_clip_limit: f64,
    /// CLAHE tile grid, `(columns, rows)`
    pub clahe_grid: (usize, usize),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            magnitude_scale: 0.4,
            base_luminosity: 255.0,
            saturation_factor: 3.0,
            saturation_magnitude: 6.0,
            min_radius: 0.5,
            base_max_radius: 8.0,
            base_fwhm_scale: 2.5,
            psf_beta: 2.0,
            kernel_size_multiplier: 3.0,
            reference_resolution: 512,
            position_jitter: 0.2,
            brightness_noise: 0.05,
            clahe_clip_limit: 2.0,
            clahe_grid: (8, 8),
        }
    }
}

/// Renders star fields from source lists.
///
/// Holds only configuration; each render call owns its buffer and RNG, so a
/// renderer is reusable across calls and cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct StarMapRenderer {
    config: RenderConfig,
}

impl StarMapRenderer {
    /// Renderer with the default model parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with explicit model parameters
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a star field with OS-sourced randomness.
    ///
    /// Sources fainter than `magnitude_threshold` (strictly greater) are
    /// excluded; a source exactly at the threshold is rendered at zero
    /// luminosity.
    pub fn render(
        &self,
        sources: &[StarRecord],
        window: &ObserverWindow,
        width: usize,
        height: usize,
        magnitude_threshold: f64,
    ) -> Result<RgbImage, RenderError> {
        self.render_with_seed(sources, window, width, height, magnitude_threshold, None)
    }

    /// Render a star field, optionally with a fixed RNG seed.
    ///
    /// Two calls with the same seed, sources and parameters produce
    /// byte-identical images.
    pub fn render_with_seed(
        &self,
        sources: &[StarRecord],
        window: &ObserverWindow,
        width: usize,
        height: usize,
        magnitude_threshold: f64,
        seed: Option<u64>,
    ) -> Result<RgbImage, RenderError> {
        let buffer =
            self.render_buffer(sources, window, width, height, magnitude_threshold, seed)?;
        Ok(tone_map(
            &buffer,
            self.config.clahe_clip_limit,
            self.config.clahe_grid,
        ))
    }

    /// Accumulate sources into an HDR buffer without tone mapping.
    ///
    /// Useful when the caller wants raw energy values, e.g. for analysis or
    /// a custom display transform.
    pub fn render_buffer(
        &self,
        sources: &[StarRecord],
        window: &ObserverWindow,
        width: usize,
        height: usize,
        magnitude_threshold: f64,
        seed: Option<u64>,
    ) -> Result<AccumulationBuffer, RenderError> {
        window.validate()?;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidImageDimensions { width, height });
        }

        let seed = seed.unwrap_or_else(|| thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        debug!("rendering {} sources with seed {seed}", sources.len());

        // Radii and PSF widths scale with the output resolution so a star
        // occupies the same visual fraction of the frame at any size.
        let resolution_scale =
            width.max(height) as f64 / self.config.reference_resolution as f64;
        let max_radius = self.config.base_max_radius * resolution_scale;
        let fwhm_scale = self.config.base_fwhm_scale * resolution_scale;

        let projector = WindowProjector::new(*window, width, height);
        let mut buffer = AccumulationBuffer::new(width, height);

        let mut too_faint = 0usize;
        let mut out_of_view = 0usize;
        let mut degenerate = 0usize;

        for source in sources {
            if source.magnitude > magnitude_threshold {
                too_faint += 1;
                continue;
            }

            let (x, y) = match projector.project(source) {
                Some(coords) => coords,
                None => {
                    out_of_view += 1;
                    continue;
                }
            };

            let photometry =
                photometry_for(source.magnitude, magnitude_threshold, max_radius, &self.config);

            let kernel = match MoffatKernel::synthesize(
                fwhm_scale * photometry.radius,
                self.config.psf_beta,
                self.config.kernel_size_multiplier,
            ) {
                Some(kernel) => kernel,
                None => {
                    degenerate += 1;
                    continue;
                }
            };

            buffer.splat(
                x,
                y,
                &kernel,
                photometry.luminosity,
                self.config.position_jitter,
                self.config.brightness_noise,
                &mut rng,
            );
        }

        debug!(
            "skipped {too_faint} faint, {out_of_view} out of view, {degenerate} degenerate"
        );

        Ok(buffer)
    }
}
