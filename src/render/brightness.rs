//! Magnitude-to-brightness conversion
//!
//! Maps a catalog magnitude onto the quantities the splatting stage needs:
//! a display radius in pixels and a base luminosity in buffer energy units.
//! Sources at or brighter than the saturation magnitude receive one fixed
//! high luminosity, simulating a saturated sensor response that no longer
//! resolves magnitude differences.

use super::RenderConfig;

/// Display radius and base luminosity for one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePhotometry {
    /// Display radius in pixels, clamped to the configured range
    pub radius: f64,
    /// Base luminosity in buffer energy units, >= 0
    pub luminosity: f64,
}

/// Dimensionless intensity for a magnitude: `10^(-scale * magnitude)`.
///
/// Smaller (or negative) magnitudes are exponentially brighter.
pub fn intensity_from_magnitude(magnitude: f64, magnitude_scale: f64) -> f64 {
    10f64.powf(-magnitude_scale * magnitude)
}

/// Compute the photometry for a source that already passed the faint-end
/// cutoff.
///
/// `max_radius` is the resolution-scaled radius ceiling; `threshold` is the
/// same faint-end cutoff used for exclusion, which anchors the luminosity
/// falloff so that a source exactly at the threshold renders with zero
/// luminosity rather than being excluded.
pub fn photometry_for(
    magnitude: f64,
    threshold: f64,
    max_radius: f64,
    config: &RenderConfig,
) -> SourcePhotometry {
    let intensity = intensity_from_magnitude(magnitude, config.magnitude_scale);
    // Tiny output rasters can scale the radius ceiling below the floor;
    // the floor wins so the clamp bounds stay ordered.
    let radius_ceiling = max_radius.max(config.min_radius);
    let radius = (intensity * max_radius).clamp(config.min_radius, radius_ceiling);

    // The saturation branch is inclusive (<=) while the exclusion cutoff is
    // strict (>); the two boundaries intentionally differ.
    let luminosity = if magnitude <= config.saturation_magnitude {
        config.base_luminosity * config.saturation_factor
    } else {
        let falloff = (1.0 - magnitude / threshold).clamp(0.0, 1.0);
        config.base_luminosity * falloff * falloff
    };

    SourcePhotometry { radius, luminosity }
}
