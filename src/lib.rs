//! Synthetic star field rendering from astrometric catalogs
//!
//! This crate takes a catalog of point sources (sky position + magnitude)
//! and an observer's pointing direction and field of view, and produces a
//! raster image depicting those sources as realistic stellar images. The
//! light distribution of each star is modeled with a Moffat profile,
//! accumulated in a high-dynamic-range buffer and tone-mapped with
//! contrast-limited adaptive histogram equalization.

pub mod catalog;
pub mod imageio;
pub mod observer;
pub mod render;

// Re-exports for easier access
pub use catalog::{StarRecord, Tycho2Entry};
pub use observer::ObserverWindow;
pub use render::{RenderConfig, RenderError, StarMapRenderer};
