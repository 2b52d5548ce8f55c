//! Star catalog records and ingestion
//!
//! This module defines the source record consumed by the render engine and
//! provides ingestion of fixed-column Tycho-2 astrometric catalog files,
//! including proper-motion correction to a requested target epoch.

pub mod tycho2;

pub use tycho2::{load_tycho2_file, CatalogError, Tycho2Entry};

/// A single point source as consumed by the render engine.
///
/// Positions are in the catalog's native equatorial frame, already
/// epoch-corrected; the render engine performs no further astrometric
/// correction. Duplicate records are legal and simply accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    /// Right ascension in degrees, [0, 360)
    pub ra_deg: f64,
    /// Declination in degrees, [-90, 90]
    pub dec_deg: f64,
    /// Apparent magnitude (smaller / more negative = brighter)
    pub magnitude: f64,
}

impl StarRecord {
    /// Create a new star record
    pub fn new(ra_deg: f64, dec_deg: f64, magnitude: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            magnitude,
        }
    }
}
