#![doc = include_str!("../README.md")]

// Public modules
pub mod error;
pub mod geodesy;
pub mod geometry;
pub mod homography;
pub mod overlay;
pub mod tiepoint;
pub mod types;

// Tool support
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{OverlayError, Result};
pub use crate::geodesy::{DistanceModel, GeodesicDistance, Haversine, Vincenty};
pub use crate::geometry::{Bounds, MetricFrame, MetricSize, OverlayGeometry};
pub use crate::overlay::{GroundOverlay, SourceRef};
pub use crate::tiepoint::{Tiepoint, TiepointSet};
pub use crate::types::{Corner, GeoPointE6, ImagePoint, LonLat, Quad};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use geo_overlay::prelude::*;
///
/// let mut overlay = GroundOverlay::new(SourceRef::new("park.kml"), "park.jpg");
/// overlay.set_bounds(Bounds::new(10.0, 0.0, 10.0, 0.0));
/// assert!(overlay.contains(5.0, 5.0));
/// assert!(overlay.distance_from(15.0, 5.0) > 0.0);
/// ```
pub mod prelude {
    pub use crate::geometry::Bounds;
    pub use crate::overlay::{GroundOverlay, SourceRef};
    pub use crate::tiepoint::Tiepoint;
    pub use crate::types::{Corner, ImagePoint, LonLat, Quad};
}
