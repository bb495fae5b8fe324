//! Geodesic distance models.
//!
//! The overlay geometry only needs one thing from geodesy: the ground
//! distance in meters between two positions. [`GeodesicDistance`] is that
//! seam. Two models are provided:
//!
//! - [`Vincenty`]: inverse solution on the WGS-84 ellipsoid. Accurate to
//!   millimetres for terrestrial distances; the default model.
//! - [`Haversine`]: great-circle distance on a sphere of mean Earth radius.
//!   Cheaper, within ~0.5 % of the ellipsoidal result.
//!
//! Neither model handles anything beyond plain point-to-point distance.

use crate::types::LonLat;
use serde::{Deserialize, Serialize};

/// WGS-84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// IUGG mean Earth radius in meters.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const VINCENTY_MAX_ITERS: usize = 20;
const VINCENTY_TOL: f64 = 1e-12;

/// Ground distance between two geographic positions.
pub trait GeodesicDistance {
    /// Distance in meters between `a` and `b`.
    fn distance_m(&self, a: LonLat, b: LonLat) -> f64;
}

/// Ellipsoidal distance (Vincenty inverse formula, WGS-84).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vincenty;

/// Spherical great-circle distance (haversine formula).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Haversine;

/// Runtime-selectable distance model, used where the model comes from
/// configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceModel {
    #[default]
    Vincenty,
    Haversine,
}

impl GeodesicDistance for Vincenty {
    fn distance_m(&self, a: LonLat, b: LonLat) -> f64 {
        vincenty_distance(a, b)
    }
}

impl GeodesicDistance for Haversine {
    fn distance_m(&self, a: LonLat, b: LonLat) -> f64 {
        haversine_distance(a, b)
    }
}

impl GeodesicDistance for DistanceModel {
    fn distance_m(&self, a: LonLat, b: LonLat) -> f64 {
        match self {
            DistanceModel::Vincenty => vincenty_distance(a, b),
            DistanceModel::Haversine => haversine_distance(a, b),
        }
    }
}

impl<T: GeodesicDistance + ?Sized> GeodesicDistance for &T {
    fn distance_m(&self, a: LonLat, b: LonLat) -> f64 {
        (**self).distance_m(a, b)
    }
}

/// Great-circle distance on a sphere of radius [`MEAN_EARTH_RADIUS_M`].
pub fn haversine_distance(a: LonLat, b: LonLat) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    MEAN_EARTH_RADIUS_M * c
}

/// Vincenty inverse distance on the WGS-84 ellipsoid.
///
/// Iterates the longitude on the auxiliary sphere until it changes by less
/// than 1e-12 rad or 20 iterations pass. Nearly antipodal points may not
/// converge; the last iterate is used in that case, which keeps the result
/// finite.
pub fn vincenty_distance(a: LonLat, b: LonLat) -> f64 {
    let b_axis = (1.0 - WGS84_F) * WGS84_A;

    let l = (b.lon - a.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 1.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 1.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..VINCENTY_MAX_ITERS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return 0.0;
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos_sq_alpha == 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
        if (lambda - prev).abs() < VINCENTY_TOL {
            break;
        }
    }

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - b_axis * b_axis) / (b_axis * b_axis);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let c2 = cos_2sigma_m * cos_2sigma_m;
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * c2)));

    b_axis * big_a * (sigma - delta_sigma)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_eq(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn vincenty_one_degree_on_equator() {
        let d = Vincenty.distance_m(LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0));
        assert!((d - 111_319.49).abs() < 0.05, "got {d}");
    }

    #[test]
    fn vincenty_one_degree_of_latitude() {
        // meridian arc 0..1 degree on WGS-84
        let d = Vincenty.distance_m(LonLat::new(0.0, 0.0), LonLat::new(0.0, 1.0));
        assert!((d - 110_574.39).abs() < 0.5, "got {d}");
    }

    #[test]
    fn coincident_points_are_zero() {
        let p = LonLat::new(24.94, 60.17);
        assert_eq!(Vincenty.distance_m(p, p), 0.0);
        assert_eq!(Haversine.distance_m(p, p), 0.0);
    }

    #[test]
    fn haversine_is_close_to_vincenty() {
        let a = LonLat::new(-122.42, 37.77);
        let b = LonLat::new(-121.89, 37.34);
        let v = Vincenty.distance_m(a, b);
        let h = Haversine.distance_m(a, b);
        assert!(rel_eq(h, v, 5e-3), "haversine={h} vincenty={v}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LonLat::new(10.0, 45.0);
        let b = LonLat::new(11.5, 46.2);
        assert!((Vincenty.distance_m(a, b) - Vincenty.distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn model_enum_dispatches() {
        let a = LonLat::new(0.0, 0.0);
        let b = LonLat::new(0.0, 2.0);
        assert_eq!(DistanceModel::Vincenty.distance_m(a, b), vincenty_distance(a, b));
        assert_eq!(DistanceModel::Haversine.distance_m(a, b), haversine_distance(a, b));
    }
}
