//! Fixed-column Tycho-2 catalog parsing
//!
//! Tycho-2 ships as fixed-width text records. Each field lives at a known
//! byte offset, so extraction is a typed column table rather than runtime
//! field-name dispatch. Mean positions are ICRS J2000.0 at a per-star mean
//! epoch; [`Tycho2Entry::to_star_record`] applies proper motion to bring a
//! position to a requested target epoch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use super::StarRecord;

/// Errors that can occur while reading Tycho-2 records
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error reading catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("field {name} spans bytes {start}..{end} but line is {line_len} bytes")]
    FieldOutOfBounds {
        name: &'static str,
        start: usize,
        end: usize,
        line_len: usize,
    },
    #[error("invalid {name} value: {raw:?}")]
    InvalidNumber { name: &'static str, raw: String },
}

// Byte offsets (0-based) into a Tycho-2 main catalog record.
const TYC1: (usize, usize) = (0, 4);
const TYC2: (usize, usize) = (5, 5);
const TYC3: (usize, usize) = (11, 1);
const MEAN_RA_DEG: (usize, usize) = (15, 12);
const MEAN_DEC_DEG: (usize, usize) = (28, 12);
const PM_RA_MAS: (usize, usize) = (41, 7);
const PM_DEC_MAS: (usize, usize) = (49, 7);
const EPOCH_RA: (usize, usize) = (76, 7);
const EPOCH_DEC: (usize, usize) = (83, 7);
const BT_MAG: (usize, usize) = (111, 6);
const VT_MAG: (usize, usize) = (124, 6);

/// One parsed Tycho-2 record with the fields the renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct Tycho2Entry {
    /// TYC region / running / component identifiers
    pub tyc1: u32,
    pub tyc2: u32,
    pub tyc3: u32,
    /// Mean right ascension, ICRS, degrees
    pub mean_ra_deg: f64,
    /// Mean declination, ICRS, degrees
    pub mean_dec_deg: f64,
    /// Proper motion in RA (mu_alpha * cos dec), arcsec/yr
    pub pm_ra_arcsec: f64,
    /// Proper motion in Dec, arcsec/yr
    pub pm_dec_arcsec: f64,
    /// Mean epoch of the RA solution, Julian years
    pub epoch_ra: f64,
    /// Mean epoch of the Dec solution, Julian years
    pub epoch_dec: f64,
    /// Tycho BT magnitude, blank for some stars
    pub bt_mag: Option<f64>,
    /// Tycho VT magnitude, blank for a small number of stars
    pub vt_mag: Option<f64>,
}

impl Tycho2Entry {
    /// Tycho identifier string, e.g. "1-1435-1"
    pub fn tyc_id(&self) -> String {
        format!("{}-{}-{}", self.tyc1, self.tyc2, self.tyc3)
    }

    /// Approximate Johnson V magnitude from Tycho photometry.
    ///
    /// Uses `V = VT - 0.090 * (BT - VT)`; falls back to VT alone when BT is
    /// blank. Returns `None` when VT itself is missing.
    pub fn johnson_v(&self) -> Option<f64> {
        let vt = self.vt_mag?;
        match self.bt_mag {
            Some(bt) => Some(vt - 0.090 * (bt - vt)),
            None => Some(vt),
        }
    }

    /// Convert to a render-ready record, propagating the mean position to
    /// `target_epoch` (Julian years) with the catalog proper motions.
    ///
    /// Returns `None` for entries without usable photometry.
    pub fn to_star_record(&self, target_epoch: f64) -> Option<StarRecord> {
        let magnitude = self.johnson_v()?;

        let cos_dec = self.mean_dec_deg.to_radians().cos();
        // pmRA is mu_alpha * cos(dec), so divide the cos factor back out
        // when shifting the RA coordinate itself.
        let ra_deg = if cos_dec.abs() > 1e-9 {
            self.mean_ra_deg
                + (self.pm_ra_arcsec / 3600.0) * (target_epoch - self.epoch_ra) / cos_dec
        } else {
            self.mean_ra_deg
        };
        let dec_deg =
            self.mean_dec_deg + (self.pm_dec_arcsec / 3600.0) * (target_epoch - self.epoch_dec);

        Some(StarRecord {
            ra_deg: ra_deg.rem_euclid(360.0),
            dec_deg,
            magnitude,
        })
    }
}

fn field<'a>(
    line: &'a str,
    (start, len): (usize, usize),
    name: &'static str,
) -> Result<&'a str, CatalogError> {
    let end = start + len;
    line.get(start..end)
        .map(str::trim)
        .ok_or(CatalogError::FieldOutOfBounds {
            name,
            start,
            end,
            line_len: line.len(),
        })
}

fn parse_f64(
    line: &str,
    column: (usize, usize),
    name: &'static str,
) -> Result<f64, CatalogError> {
    let raw = field(line, column, name)?;
    raw.parse().map_err(|_| CatalogError::InvalidNumber {
        name,
        raw: raw.to_string(),
    })
}

fn parse_u32(
    line: &str,
    column: (usize, usize),
    name: &'static str,
) -> Result<u32, CatalogError> {
    let raw = field(line, column, name)?;
    raw.parse().map_err(|_| CatalogError::InvalidNumber {
        name,
        raw: raw.to_string(),
    })
}

fn parse_optional_f64(line: &str, column: (usize, usize)) -> Option<f64> {
    let (start, len) = column;
    line.get(start..start + len)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse().ok())
}

/// Parse a single fixed-width Tycho-2 record
pub fn parse_line(line: &str) -> Result<Tycho2Entry, CatalogError> {
    Ok(Tycho2Entry {
        tyc1: parse_u32(line, TYC1, "TYC1")?,
        tyc2: parse_u32(line, TYC2, "TYC2")?,
        tyc3: parse_u32(line, TYC3, "TYC3")?,
        mean_ra_deg: parse_f64(line, MEAN_RA_DEG, "mRAdeg")?,
        mean_dec_deg: parse_f64(line, MEAN_DEC_DEG, "mDEdeg")?,
        // Catalog stores milliarcsec/yr; keep arcsec/yr internally
        pm_ra_arcsec: parse_f64(line, PM_RA_MAS, "pmRA")? * 0.001,
        pm_dec_arcsec: parse_f64(line, PM_DEC_MAS, "pmDE")? * 0.001,
        epoch_ra: parse_f64(line, EPOCH_RA, "mepRA")?,
        epoch_dec: parse_f64(line, EPOCH_DEC, "mepDE")?,
        bt_mag: parse_optional_f64(line, BT_MAG),
        vt_mag: parse_optional_f64(line, VT_MAG),
    })
}

/// Load one Tycho-2 data file into render-ready records.
///
/// Positions are propagated to `target_epoch`. Lines that fail to parse and
/// entries without photometry are skipped and counted, not fatal; a file
/// that cannot be opened is an error.
pub fn load_tycho2_file<P: AsRef<Path>>(
    path: P,
    target_epoch: f64,
) -> Result<Vec<StarRecord>, CatalogError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(entry) => match entry.to_star_record(target_epoch) {
                Some(record) => records.push(record),
                None => skipped += 1,
            },
            Err(err) => {
                debug!("skipping malformed catalog line: {err}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            "{}: skipped {} unusable records ({} loaded)",
            path.display(),
            skipped,
            records.len()
        );
    }

    Ok(records)
}
