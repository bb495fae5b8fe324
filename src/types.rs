//! Plain value types shared across the overlay model.

use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};

/// Micro-degrees per degree used by the fixed-point geo encoding.
pub const E6: f64 = 1_000_000.0;

const MAX_LAT_E6: i32 = 90_000_000;
const MAX_LON_E6: i32 = 180_000_000;

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Geographic position stored as integer micro-degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoPointE6 {
    latitude_e6: i32,
    longitude_e6: i32,
}

impl GeoPointE6 {
    /// Builds a point from micro-degree components, rejecting values outside
    /// ±90° latitude / ±180° longitude.
    pub fn new(latitude_e6: i32, longitude_e6: i32) -> Result<Self> {
        if !(-MAX_LAT_E6..=MAX_LAT_E6).contains(&latitude_e6) {
            return Err(OverlayError::invalid(format!(
                "latitude {latitude_e6}e-6 outside ±90°"
            )));
        }
        if !(-MAX_LON_E6..=MAX_LON_E6).contains(&longitude_e6) {
            return Err(OverlayError::invalid(format!(
                "longitude {longitude_e6}e-6 outside ±180°"
            )));
        }
        Ok(Self {
            latitude_e6,
            longitude_e6,
        })
    }

    /// Scales degrees by 1e6 and truncates toward zero.
    pub fn from_degrees(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(OverlayError::invalid(format!(
                "non-finite geo point ({lat}, {lon})"
            )));
        }
        if lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(OverlayError::invalid(format!(
                "geo point ({lat}, {lon}) out of range"
            )));
        }
        Self::new((lat * E6) as i32, (lon * E6) as i32)
    }

    #[inline]
    pub fn latitude_e6(&self) -> i32 {
        self.latitude_e6
    }

    #[inline]
    pub fn longitude_e6(&self) -> i32 {
        self.longitude_e6
    }

    pub fn to_lon_lat(self) -> LonLat {
        LonLat::new(
            self.longitude_e6 as f64 / E6,
            self.latitude_e6 as f64 / E6,
        )
    }
}

/// Pixel position inside the overlay image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Named corner of an overlay footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
        Corner::NorthWest,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Corner::NorthEast => 0,
            Corner::SouthEast => 1,
            Corner::SouthWest => 2,
            Corner::NorthWest => 3,
        }
    }
}

/// Four corner positions of a footprint, walked clockwise from north-west.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub nw: LonLat,
    pub ne: LonLat,
    pub se: LonLat,
    pub sw: LonLat,
}

impl Quad {
    /// Axis-aligned quad spanned by the given bounds.
    pub fn from_bounds(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            nw: LonLat::new(west, north),
            ne: LonLat::new(east, north),
            se: LonLat::new(east, south),
            sw: LonLat::new(west, south),
        }
    }

    /// Corners as `[lon, lat]` pairs in NW, NE, SE, SW order.
    pub fn to_points(&self) -> [[f64; 2]; 4] {
        [
            self.nw.to_array(),
            self.ne.to_array(),
            self.se.to_array(),
            self.sw.to_array(),
        ]
    }
}
