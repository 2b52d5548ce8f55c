//! Observer pointing and field-of-view selection
//!
//! An [`ObserverWindow`] describes where the observer is looking and how
//! wide the rendered window is. Candidate selection walks a materialized
//! record list, either serially or partitioned across rayon workers; the
//! render engine re-checks membership, so candidates only need to be a
//! superset of the visible set.

use rayon::prelude::*;

use crate::catalog::StarRecord;
use crate::render::RenderError;

/// Wrap a right-ascension difference into (-180, 180] degrees.
///
/// Handles the 0/360 seam: a source at RA 359.9 viewed from RA 0.1 is a
/// 0.2 degree offset, not 359.8.
pub fn wrap_delta_ra_deg(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Observer pointing direction and angular field of view.
///
/// Field-of-view values are full width/height in degrees. The window is
/// immutable for the duration of one render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverWindow {
    /// Right ascension of the window center, degrees
    pub center_ra_deg: f64,
    /// Declination of the window center, degrees
    pub center_dec_deg: f64,
    /// Full angular width of the window, degrees
    pub fov_ra_deg: f64,
    /// Full angular height of the window, degrees
    pub fov_dec_deg: f64,
}

impl ObserverWindow {
    /// Create a new window
    pub fn new(center_ra_deg: f64, center_dec_deg: f64, fov_ra_deg: f64, fov_dec_deg: f64) -> Self {
        Self {
            center_ra_deg,
            center_dec_deg,
            fov_ra_deg,
            fov_dec_deg,
        }
    }

    /// Check the configuration preconditions, failing fast before any
    /// rendering work starts.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.fov_ra_deg <= 0.0 || self.fov_dec_deg <= 0.0 {
            return Err(RenderError::InvalidFieldOfView {
                fov_ra_deg: self.fov_ra_deg,
                fov_dec_deg: self.fov_dec_deg,
            });
        }
        Ok(())
    }

    /// Signed RA offset of a source from the window center, degrees,
    /// wrapped into (-180, 180]
    pub fn delta_ra_deg(&self, ra_deg: f64) -> f64 {
        wrap_delta_ra_deg(ra_deg - self.center_ra_deg)
    }

    /// Whether a sky position falls inside the window
    pub fn contains(&self, ra_deg: f64, dec_deg: f64) -> bool {
        let in_ra = self.delta_ra_deg(ra_deg).abs() <= self.fov_ra_deg / 2.0;
        let in_dec = dec_deg >= self.center_dec_deg - self.fov_dec_deg / 2.0
            && dec_deg <= self.center_dec_deg + self.fov_dec_deg / 2.0;
        in_ra && in_dec
    }

    /// Select the records that fall inside the window
    pub fn filter_in_view<'a>(&self, records: &'a [StarRecord]) -> Vec<&'a StarRecord> {
        records
            .iter()
            .filter(|r| self.contains(r.ra_deg, r.dec_deg))
            .collect()
    }

    /// Select the records that fall inside the window, partitioned across
    /// rayon workers. Yields the same records as [`Self::filter_in_view`]
    /// in the same order.
    pub fn par_filter_in_view<'a>(&self, records: &'a [StarRecord]) -> Vec<&'a StarRecord> {
        records
            .par_iter()
            .filter(|r| self.contains(r.ra_deg, r.dec_deg))
            .collect()
    }
}
