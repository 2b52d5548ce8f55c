//! Window-relative projection of sky positions into pixel coordinates

use crate::catalog::StarRecord;
use crate::observer::ObserverWindow;

/// Projects sky coordinates into the pixel space of one render window.
///
/// The projection is a flat plate-carree mapping of the window: RA offsets
/// map linearly to columns and declination maps linearly to rows, flipped
/// so that north is up (declination increases upward on the sky but row
/// indices increase downward in the raster).
#[derive(Debug, Clone, Copy)]
pub struct WindowProjector {
    window: ObserverWindow,
    image_width: usize,
    image_height: usize,
}

impl WindowProjector {
    /// Create a projector for a window and raster size.
    ///
    /// The window must already be validated; the projector assumes positive
    /// fields of view.
    pub fn new(window: ObserverWindow, image_width: usize, image_height: usize) -> Self {
        Self {
            window,
            image_width,
            image_height,
        }
    }

    /// Project a source into pixel coordinates.
    ///
    /// Returns `None` for sources outside the window, by wrapped RA offset
    /// or declination bounds. Rejection is a normal outcome, not an error.
    /// Accepted coordinates are sub-pixel precise and lie in
    /// `[0, width] x [0, height]`.
    pub fn project(&self, source: &StarRecord) -> Option<(f64, f64)> {
        let delta_ra = self.window.delta_ra_deg(source.ra_deg);

        if !self.window.contains(source.ra_deg, source.dec_deg) {
            return None;
        }

        let norm_x = (delta_ra + self.window.fov_ra_deg / 2.0) / self.window.fov_ra_deg;
        let norm_y = (self.window.center_dec_deg + self.window.fov_dec_deg / 2.0
            - source.dec_deg)
            / self.window.fov_dec_deg;

        Some((
            norm_x * self.image_width as f64,
            norm_y * self.image_height as f64,
        ))
    }
}
