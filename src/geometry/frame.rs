//! Metric frame: the derived, immutable half of an overlay's geometry.
//!
//! A frame pairs the footprint's ground size with the projective map from
//! geographic coordinates into a flat, meter-scaled rectangle whose origin is
//! the north-west corner and whose opposite corner is `(width, height)`.
//! Frames are plain data (`Send + Sync`), so a built frame can serve batch
//! queries from several threads.

use crate::geodesy::GeodesicDistance;
use crate::homography::{apply_homography_point, quad_to_quad, rotation_about};
use crate::types::{LonLat, Quad};
use log::{debug, warn};
use nalgebra::Matrix3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bounding box of an overlay in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Strict interior test; points on an edge are outside.
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.west < lon && lon < self.east && self.south < lat && lat < self.north
    }

    pub fn to_quad(&self) -> Quad {
        Quad::from_bounds(self.north, self.south, self.east, self.west)
    }
}

/// Geographic definition of a footprint as seen by the frame builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Footprint {
    /// Axis-aligned bounds, optionally rotated about the image center.
    Bounds { bounds: Bounds, rotation_deg: f64 },
    /// Four explicit corners; may describe a skewed quadrilateral.
    Corners(Quad),
}

impl Footprint {
    pub fn quad(&self) -> Quad {
        match self {
            Footprint::Bounds { bounds, .. } => bounds.to_quad(),
            Footprint::Corners(q) => *q,
        }
    }
}

/// Ground size of a footprint in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSize {
    pub width_m: f64,
    pub height_m: f64,
}

impl MetricSize {
    /// Rectangle area in square kilometres.
    #[inline]
    pub fn area_km2(&self) -> f64 {
        (self.width_m / 1000.0) * (self.height_m / 1000.0)
    }
}

/// Computes the ground size of a footprint.
///
/// Bounds use the north edge for width and the west edge for height.
/// Corners average opposite edges so mild skew or keystoning evens out.
pub fn metric_size<D: GeodesicDistance>(model: &D, footprint: &Footprint) -> MetricSize {
    match footprint {
        Footprint::Bounds { bounds, .. } => {
            let q = bounds.to_quad();
            MetricSize {
                width_m: model.distance_m(q.nw, q.ne),
                height_m: model.distance_m(q.nw, q.sw),
            }
        }
        Footprint::Corners(q) => {
            let top = model.distance_m(q.nw, q.ne);
            let bottom = model.distance_m(q.sw, q.se);
            let left = model.distance_m(q.nw, q.sw);
            let right = model.distance_m(q.ne, q.se);
            MetricSize {
                width_m: (top + bottom) / 2.0,
                height_m: (left + right) / 2.0,
            }
        }
    }
}

/// Position of a metric point relative to the frame rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// On or inside the rectangle.
    Inside,
    NorthWest,
    West,
    SouthWest,
    NorthEast,
    East,
    SouthEast,
    North,
    South,
}

/// Size plus geo→metric transform, built together and cached together.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricFrame {
    size: MetricSize,
    transform: Option<Matrix3<f64>>,
}

impl MetricFrame {
    /// Builds the frame for `footprint`.
    ///
    /// The footprint quad (NW, NE, SE, SW) is mapped onto
    /// `(0,0), (w,0), (w,h), (0,h)`. A rotated bounds footprint then has the
    /// rotation about `(w/2, h/2)` applied after that map. A degenerate quad
    /// leaves the frame without a transform.
    pub fn build<D: GeodesicDistance>(model: &D, footprint: &Footprint) -> Self {
        let size = metric_size(model, footprint);
        let (w, h) = (size.width_m, size.height_m);
        let dst = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
        let src = footprint.quad().to_points();

        let rotation_deg = match footprint {
            Footprint::Bounds { rotation_deg, .. } => *rotation_deg,
            Footprint::Corners(_) => 0.0,
        };
        let transform = quad_to_quad(&src, &dst).map(|m| {
            if rotation_deg != 0.0 {
                rotation_about(rotation_deg, w / 2.0, h / 2.0) * m
            } else {
                m
            }
        });

        match transform {
            Some(_) => debug!(
                "MetricFrame::build width_m={:.3} height_m={:.3}",
                w, h
            ),
            None => warn!(
                "MetricFrame::build degenerate footprint {:?} (width_m={}, height_m={})",
                src, w, h
            ),
        }

        Self { size, transform }
    }

    #[inline]
    pub fn size(&self) -> MetricSize {
        self.size
    }

    /// The geo→metric homography, `None` for a degenerate footprint.
    #[inline]
    pub fn transform(&self) -> Option<&Matrix3<f64>> {
        self.transform.as_ref()
    }

    /// Maps a geographic position into metric frame coordinates.
    pub fn to_metric(&self, p: LonLat) -> Option<[f64; 2]> {
        apply_homography_point(self.transform.as_ref()?, [p.lon, p.lat])
    }

    /// Strict containment of a metric point in `(0, w) × (0, h)`.
    #[inline]
    pub fn contains_metric(&self, m: [f64; 2]) -> bool {
        0.0 < m[0] && m[0] < self.size.width_m && 0.0 < m[1] && m[1] < self.size.height_m
    }

    /// Strict containment of a geographic position, through the transform.
    pub fn contains(&self, p: LonLat) -> bool {
        self.to_metric(p).is_some_and(|m| self.contains_metric(m))
    }

    /// Classifies a metric point against the frame rectangle.
    pub fn region(&self, m: [f64; 2]) -> Region {
        let [x, y] = m;
        let (w, h) = (self.size.width_m, self.size.height_m);
        if x < 0.0 {
            if y < 0.0 {
                Region::NorthWest
            } else if y > h {
                Region::SouthWest
            } else {
                Region::West
            }
        } else if x > w {
            if y < 0.0 {
                Region::NorthEast
            } else if y > h {
                Region::SouthEast
            } else {
                Region::East
            }
        } else if y < 0.0 {
            Region::North
        } else if y > h {
            Region::South
        } else {
            Region::Inside
        }
    }

    /// Distance in meters from a metric point to the nearest point of the
    /// frame rectangle. Zero on or inside the rectangle.
    pub fn distance_to_rect(&self, m: [f64; 2]) -> f64 {
        let [x, y] = m;
        let (w, h) = (self.size.width_m, self.size.height_m);
        match self.region(m) {
            Region::NorthWest => x.hypot(y),
            Region::SouthWest => x.hypot(y - h),
            Region::West => -x,
            Region::NorthEast => (x - w).hypot(y),
            Region::SouthEast => (x - w).hypot(y - h),
            Region::East => x - w,
            Region::North => -y,
            Region::South => y - h,
            Region::Inside => 0.0,
        }
    }

    /// Approximate ground distance in meters from `p` to the footprint.
    ///
    /// Returns `f64::INFINITY` when `p` cannot be mapped (degenerate frame or
    /// vanishing projective weight).
    pub fn distance_from(&self, p: LonLat) -> f64 {
        match self.to_metric(p) {
            Some(m) => self.distance_to_rect(m),
            None => f64::INFINITY,
        }
    }

    /// Parallel [`MetricFrame::distance_from`] over many positions, in input
    /// order.
    pub fn distances_from_many(&self, points: &[LonLat]) -> Vec<f64> {
        points.par_iter().map(|&p| self.distance_from(p)).collect()
    }
}
