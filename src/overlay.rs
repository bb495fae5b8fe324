//! Ground overlay entity: identity, footprint geometry and tiepoints.
//!
//! Two overlays are the same overlay when they come from the same source
//! container and drape the same image; names, descriptions, geometry and
//! tiepoints do not take part in identity.

use crate::geodesy::{GeodesicDistance, Vincenty};
use crate::geometry::{Bounds, MetricSize, OverlayGeometry};
use crate::tiepoint::{Tiepoint, TiepointSet};
use crate::types::{Corner, LonLat, Quad};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Opaque, comparable reference to the container an overlay was read from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef {
    path: PathBuf,
}

impl SourceRef {
    /// Uses `path` as given; two references are equal iff the paths are.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves `path` through the filesystem so different spellings of the
    /// same file compare equal.
    pub fn canonicalize(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::canonicalize(path)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceRef[{}]", self.path.display())
    }
}

/// An image draped over a geographic footprint.
#[derive(Clone, Debug)]
pub struct GroundOverlay<D = Vincenty> {
    source: SourceRef,
    image: String,
    name: Option<String>,
    description: Option<String>,
    geometry: OverlayGeometry<D>,
    tiepoints: TiepointSet,
}

impl GroundOverlay<Vincenty> {
    pub fn new(source: SourceRef, image: impl Into<String>) -> Self {
        Self::with_model(source, image, Vincenty)
    }
}

impl<D: GeodesicDistance> GroundOverlay<D> {
    /// Overlay measuring ground distances with `model`.
    pub fn with_model(source: SourceRef, image: impl Into<String>, model: D) -> Self {
        Self {
            source,
            image: image.into(),
            name: None,
            description: None,
            geometry: OverlayGeometry::with_model(Bounds::default(), model),
            tiepoints: TiepointSet::new(),
        }
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn set_source(&mut self, source: SourceRef) {
        self.source = source;
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn geometry(&self) -> &OverlayGeometry<D> {
        &self.geometry
    }

    /// Mutable geometry; its mutators keep the metric cache consistent.
    pub fn geometry_mut(&mut self) -> &mut OverlayGeometry<D> {
        &mut self.geometry
    }

    pub fn bounds(&self) -> Bounds {
        self.geometry.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.geometry.set_bounds(bounds);
    }

    pub fn north(&self) -> f64 {
        self.geometry.north()
    }

    pub fn set_north(&mut self, north: f64) {
        self.geometry.set_north(north);
    }

    pub fn south(&self) -> f64 {
        self.geometry.south()
    }

    pub fn set_south(&mut self, south: f64) {
        self.geometry.set_south(south);
    }

    pub fn east(&self) -> f64 {
        self.geometry.east()
    }

    pub fn set_east(&mut self, east: f64) {
        self.geometry.set_east(east);
    }

    pub fn west(&self) -> f64 {
        self.geometry.west()
    }

    pub fn set_west(&mut self, west: f64) {
        self.geometry.set_west(west);
    }

    pub fn rotation(&self) -> f64 {
        self.geometry.rotation()
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.geometry.set_rotation(degrees);
    }

    pub fn corner(&self, corner: Corner) -> Option<LonLat> {
        self.geometry.corner(corner)
    }

    pub fn set_corner(&mut self, corner: Corner, location: LonLat) {
        self.geometry.set_corner(corner, location);
    }

    pub fn set_corners(&mut self, quad: Quad) {
        self.geometry.set_corners(quad);
    }

    pub fn clear_corners(&mut self) {
        self.geometry.clear_corners();
    }

    pub fn has_corner_tiepoints(&self) -> bool {
        self.geometry.has_corner_tiepoints()
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.geometry.contains(lon, lat)
    }

    pub fn distance_from(&self, lon: f64, lat: f64) -> f64 {
        self.geometry.distance_from(lon, lat)
    }

    pub fn metric_size(&self) -> MetricSize {
        self.geometry.metric_size()
    }

    pub fn area_km2(&self) -> f64 {
        self.geometry.area_km2()
    }

    pub fn tiepoints(&self) -> &TiepointSet {
        &self.tiepoints
    }

    pub fn tiepoints_mut(&mut self) -> &mut TiepointSet {
        &mut self.tiepoints
    }

    /// Adds a tiepoint unless an equal one is already attached.
    pub fn add_tiepoint(&mut self, tiepoint: Tiepoint) -> bool {
        self.tiepoints.add(tiepoint)
    }

    pub fn remove_tiepoint(&mut self, tiepoint: &Tiepoint) -> bool {
        self.tiepoints.remove(tiepoint)
    }

    pub fn clear_tiepoints(&mut self) {
        self.tiepoints.clear();
    }
}

impl<D> PartialEq for GroundOverlay<D> {
    fn eq(&self, other: &Self) -> bool {
        self.image == other.image && self.source == other.source
    }
}

impl<D> Eq for GroundOverlay<D> {}

impl<D> Hash for GroundOverlay<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.image.hash(state);
        self.source.hash(state);
    }
}

impl<D: GeodesicDistance> fmt::Display for GroundOverlay<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bounds();
        match &self.name {
            Some(name) => write!(f, "GroundOverlay[name='{name}'")?,
            None => f.write_str("GroundOverlay[name=null")?,
        }
        write!(
            f,
            ", description={}, image={}, north={}, south={}, east={}, west={}, rotation={}] ({})",
            self.description.as_deref().unwrap_or("null"),
            self.image,
            format_significant(b.north, 6),
            format_significant(b.south, 6),
            format_significant(b.east, 6),
            format_significant(b.west, 6),
            format_significant(self.rotation(), 6),
            self.source,
        )
    }
}

/// `%g`-style formatting with `precision` significant digits: plain decimal
/// for magnitudes in [1e-4, 10^precision), scientific otherwise. Trailing
/// zeros are kept, the sign of negative zero is kept, and ties round half up
/// on the shortest decimal form of `v`.
pub fn format_significant(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        let s = if v > 0.0 { "Infinity" } else { "-Infinity" };
        return s.to_string();
    }
    let sign = if v.is_sign_negative() { "-" } else { "" };
    let (digits, exp) = significant_digits(v.abs(), precision);

    if (-4..precision as i32).contains(&exp) {
        let body = if exp >= 0 {
            let (int, frac) = digits.split_at(exp as usize + 1);
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        } else {
            format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
        };
        format!("{sign}{body}")
    } else {
        let (lead, rest) = digits.split_at(1);
        let point = if rest.is_empty() { "" } else { "." };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{sign}{lead}{point}{rest}e{exp_sign}{:02}", exp.abs())
    }
}

/// Exactly `precision` decimal digits of a finite, non-negative `v` and the
/// decimal exponent of the first one, rounded half up.
fn significant_digits(v: f64, precision: usize) -> (String, i32) {
    if v == 0.0 {
        return ("0".repeat(precision), 0);
    }
    // shortest round-trip form, e.g. "1.234565e5"
    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let mut exp: i32 = exp.parse().unwrap_or(0);
    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();

    if digits.len() > precision {
        let round_up = digits[precision] >= b'5';
        digits.truncate(precision);
        if round_up {
            let mut i = precision;
            loop {
                if i == 0 {
                    digits.insert(0, b'1');
                    digits.truncate(precision);
                    exp += 1;
                    break;
                }
                i -= 1;
                if digits[i] == b'9' {
                    digits[i] = b'0';
                } else {
                    digits[i] += 1;
                    break;
                }
            }
        }
    }
    digits.resize(precision, b'0');
    (String::from_utf8_lossy(&digits).into_owned(), exp)
}
