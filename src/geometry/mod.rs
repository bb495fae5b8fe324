//! Overlay footprint geometry.
//!
//! [`OverlayGeometry`] owns the raw geographic definition of an overlay:
//! bounds plus rotation, and optionally four explicit corners which take
//! precedence once all four are set. Everything metric is derived from that
//! definition into a [`MetricFrame`] on first use and cached until the next
//! mutation.
//!
//! Queries:
//! - `contains`: strict containment; the unrotated bounds case is answered
//!   directly in degrees, everything else through the frame.
//! - `distance_from`: approximate ground distance to the footprint edge,
//!   zero inside.
//! - `area_km2`: width × height of the metric frame.
//!
//! Known limitations: footprints crossing the antimeridian or a pole are not
//! handled, and distances are exact only for small, unrotated, unskewed
//! footprints.

pub mod frame;


pub use frame::{metric_size, Bounds, Footprint, MetricFrame, MetricSize, Region};

use crate::geodesy::{GeodesicDistance, Vincenty};
use crate::types::{Corner, LonLat, Quad};
use log::debug;
use std::cell::OnceCell;

/// Geographic footprint of an overlay with a lazily derived metric frame.
///
/// The cache lives in a [`OnceCell`], so shared references can fill it but
/// the type is not `Sync`. Build a frame with [`OverlayGeometry::frame`] and
/// share that instead when querying from several threads.
#[derive(Clone, Debug, Default)]
pub struct OverlayGeometry<D = Vincenty> {
    bounds: Bounds,
    rotation_deg: f64,
    corners: [Option<LonLat>; 4],
    model: D,
    frame: OnceCell<MetricFrame>,
}

impl OverlayGeometry<Vincenty> {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_model(bounds, Vincenty)
    }
}

impl<D: GeodesicDistance> OverlayGeometry<D> {
    pub fn with_model(bounds: Bounds, model: D) -> Self {
        Self {
            bounds,
            rotation_deg: 0.0,
            corners: [None; 4],
            model,
            frame: OnceCell::new(),
        }
    }

    pub fn model(&self) -> &D {
        &self.model
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn north(&self) -> f64 {
        self.bounds.north
    }

    pub fn south(&self) -> f64 {
        self.bounds.south
    }

    pub fn east(&self) -> f64 {
        self.bounds.east
    }

    pub fn west(&self) -> f64 {
        self.bounds.west
    }

    /// Rotation in degrees; 0 means none.
    pub fn rotation(&self) -> f64 {
        self.rotation_deg
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.invalidate();
    }

    pub fn set_north(&mut self, north: f64) {
        self.bounds.north = north;
        self.invalidate();
    }

    pub fn set_south(&mut self, south: f64) {
        self.bounds.south = south;
        self.invalidate();
    }

    pub fn set_east(&mut self, east: f64) {
        self.bounds.east = east;
        self.invalidate();
    }

    pub fn set_west(&mut self, west: f64) {
        self.bounds.west = west;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation_deg = degrees;
        self.invalidate();
    }

    pub fn corner(&self, corner: Corner) -> Option<LonLat> {
        self.corners[corner.index()]
    }

    /// Sets one corner. The corners only take effect once all four are set.
    pub fn set_corner(&mut self, corner: Corner, location: LonLat) {
        self.corners[corner.index()] = Some(location);
        self.invalidate();
    }

    pub fn set_corners(&mut self, quad: Quad) {
        self.corners[Corner::NorthWest.index()] = Some(quad.nw);
        self.corners[Corner::NorthEast.index()] = Some(quad.ne);
        self.corners[Corner::SouthEast.index()] = Some(quad.se);
        self.corners[Corner::SouthWest.index()] = Some(quad.sw);
        self.invalidate();
    }

    /// Drops all corners, returning to bounds + rotation.
    pub fn clear_corners(&mut self) {
        self.corners = [None; 4];
        self.invalidate();
    }

    /// True iff all four corners are set.
    pub fn has_corner_tiepoints(&self) -> bool {
        self.corners.iter().all(Option::is_some)
    }

    /// The corner quad, only when complete.
    pub fn corner_quad(&self) -> Option<Quad> {
        Some(Quad {
            nw: self.corner(Corner::NorthWest)?,
            ne: self.corner(Corner::NorthEast)?,
            se: self.corner(Corner::SouthEast)?,
            sw: self.corner(Corner::SouthWest)?,
        })
    }

    pub fn footprint(&self) -> Footprint {
        match self.corner_quad() {
            Some(q) => Footprint::Corners(q),
            None => Footprint::Bounds {
                bounds: self.bounds,
                rotation_deg: self.rotation_deg,
            },
        }
    }

    /// Returns the cached metric frame, building it if needed.
    pub fn frame(&self) -> &MetricFrame {
        self.frame
            .get_or_init(|| MetricFrame::build(&self.model, &self.footprint()))
    }

    /// Whether a frame is currently cached.
    pub fn has_cached_frame(&self) -> bool {
        self.frame.get().is_some()
    }

    pub fn metric_size(&self) -> MetricSize {
        self.frame().size()
    }

    /// Maps a position into the metric frame (origin at the north-west corner).
    pub fn to_metric(&self, lon: f64, lat: f64) -> Option<[f64; 2]> {
        self.frame().to_metric(LonLat::new(lon, lat))
    }

    /// Strict containment test; points on the footprint edge are outside.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if !self.has_corner_tiepoints() && self.rotation_deg == 0.0 {
            return self.bounds.contains(lon, lat);
        }
        self.frame().contains(LonLat::new(lon, lat))
    }

    /// Approximate distance in meters from the position to the footprint,
    /// zero when contained.
    pub fn distance_from(&self, lon: f64, lat: f64) -> f64 {
        if self.contains(lon, lat) {
            return 0.0;
        }
        self.frame().distance_from(LonLat::new(lon, lat))
    }

    /// Approximate covered area in km², treating the footprint as a
    /// rectangle of the metric size.
    pub fn area_km2(&self) -> f64 {
        self.metric_size().area_km2()
    }

    fn invalidate(&mut self) {
        if self.frame.take().is_some() {
            debug!("OverlayGeometry: metric frame invalidated");
        }
    }
}
