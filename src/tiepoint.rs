//! Tiepoints: manual geo ↔ pixel correspondences attached to an overlay.
//!
//! A [`Tiepoint`] pairs a fixed-point geographic position with an integer
//! pixel position. [`TiepointSet`] keeps them in insertion order without
//! duplicates.
//!
//! Persisted form is four big-endian `i32` values per tiepoint:
//! latitude·1e6, longitude·1e6, x, y (16 bytes). A set is written as a
//! big-endian `u32` count followed by its records.

use crate::error::{OverlayError, Result};
use crate::types::{GeoPointE6, ImagePoint, LonLat};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};

/// Size in bytes of one encoded tiepoint.
pub const ENCODED_LEN: usize = 16;

/// Correspondence between a geographic position and an image pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tiepoint {
    geo: GeoPointE6,
    image: ImagePoint,
}

impl Tiepoint {
    pub fn new(geo: GeoPointE6, image: ImagePoint) -> Self {
        Self { geo, image }
    }

    /// Builds a tiepoint from possibly missing parts, as produced by a
    /// markup reader. Both parts are required.
    pub fn from_parts(geo: Option<GeoPointE6>, image: Option<ImagePoint>) -> Result<Self> {
        match (geo, image) {
            (Some(geo), Some(image)) => Ok(Self::new(geo, image)),
            (None, _) => Err(OverlayError::invalid("tiepoint is missing its geo point")),
            (_, None) => Err(OverlayError::invalid("tiepoint is missing its image point")),
        }
    }

    /// Builds a tiepoint from degrees; see [`GeoPointE6::from_degrees`].
    pub fn from_degrees(lon: f64, lat: f64, image: ImagePoint) -> Result<Self> {
        Ok(Self::new(GeoPointE6::from_degrees(lat, lon)?, image))
    }

    pub fn geo_point(&self) -> GeoPointE6 {
        self.geo
    }

    pub fn set_geo_point(&mut self, geo: GeoPointE6) {
        self.geo = geo;
    }

    pub fn image_point(&self) -> ImagePoint {
        self.image
    }

    pub fn set_image_point(&mut self, image: ImagePoint) {
        self.image = image;
    }

    pub fn lon_lat(&self) -> LonLat {
        self.geo.to_lon_lat()
    }

    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        let fields = [
            self.geo.latitude_e6(),
            self.geo.longitude_e6(),
            self.image.x,
            self.image.y,
        ];
        for (chunk, v) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&v.to_be_bytes());
        }
        out
    }

    /// Decodes one record. Fails when the stored position is out of range.
    pub fn decode(bytes: &[u8; ENCODED_LEN]) -> Result<Self> {
        let field = |i: usize| {
            let mut word = [0u8; 4];
            word.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            i32::from_be_bytes(word)
        };
        let geo = GeoPointE6::new(field(0), field(1))?;
        Ok(Self::new(geo, ImagePoint::new(field(2), field(3))))
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(&self.encode())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut r: R) -> Result<Self> {
        let mut buf = [0u8; ENCODED_LEN];
        r.read_exact(&mut buf)?;
        Self::decode(&buf)
    }
}

/// Insertion-ordered tiepoints without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TiepointSet {
    points: Vec<Tiepoint>,
}

impl TiepointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tiepoint` unless an equal one is present. Returns whether it
    /// was added.
    pub fn add(&mut self, tiepoint: Tiepoint) -> bool {
        if self.points.contains(&tiepoint) {
            return false;
        }
        self.points.push(tiepoint);
        true
    }

    /// [`TiepointSet::add`] for a tiepoint that may be absent.
    pub fn try_add(&mut self, tiepoint: Option<Tiepoint>) -> Result<bool> {
        let tiepoint =
            tiepoint.ok_or_else(|| OverlayError::invalid("absent tiepoints are not allowed"))?;
        Ok(self.add(tiepoint))
    }

    /// Removes the tiepoint equal to `tiepoint`. Returns whether one was
    /// present.
    pub fn remove(&mut self, tiepoint: &Tiepoint) -> bool {
        match self.points.iter().position(|p| p == tiepoint) {
            Some(idx) => {
                self.points.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn contains(&self, tiepoint: &Tiepoint) -> bool {
        self.points.contains(tiepoint)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tiepoint> {
        self.points.iter()
    }

    /// Writes the count followed by every tiepoint.
    pub fn write_all<W: Write>(&self, mut w: W) -> Result<()> {
        let count = u32::try_from(self.points.len())
            .map_err(|_| OverlayError::invalid("too many tiepoints to encode"))?;
        w.write_all(&count.to_be_bytes())?;
        for p in &self.points {
            p.write_to(&mut w)?;
        }
        Ok(())
    }

    /// Reads a set written by [`TiepointSet::write_all`]. Duplicate records
    /// collapse into one.
    pub fn read_all<R: Read>(mut r: R) -> Result<Self> {
        let mut word = [0u8; 4];
        r.read_exact(&mut word)?;
        let count = u32::from_be_bytes(word);
        let mut set = Self::new();
        for idx in 0..count {
            let p = Tiepoint::read_from(&mut r).map_err(|err| match err {
                OverlayError::Io(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    OverlayError::invalid(format!(
                        "tiepoint stream truncated at record {idx} of {count}"
                    ))
                }
                other => other,
            })?;
            set.add(p);
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a TiepointSet {
    type Item = &'a Tiepoint;
    type IntoIter = std::slice::Iter<'a, Tiepoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Extend<Tiepoint> for TiepointSet {
    fn extend<I: IntoIterator<Item = Tiepoint>>(&mut self, iter: I) {
        for p in iter {
            self.add(p);
        }
    }
}

impl FromIterator<Tiepoint> for TiepointSet {
    fn from_iter<I: IntoIterator<Item = Tiepoint>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tp(lon: f64, lat: f64, x: i32, y: i32) -> Tiepoint {
        Tiepoint::from_degrees(lon, lat, ImagePoint::new(x, y)).unwrap()
    }

    #[test]
    fn encoding_is_big_endian_lat_lon_x_y() {
        let p = Tiepoint::new(
            GeoPointE6::new(60_170_000, 24_940_000).unwrap(),
            ImagePoint::new(-1, 258),
        );
        let bytes = p.encode();
        assert_eq!(&bytes[0..4], &60_170_000i32.to_be_bytes());
        assert_eq!(&bytes[4..8], &24_940_000i32.to_be_bytes());
        assert_eq!(&bytes[8..12], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[12..16], &[0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn decode_restores_position_within_a_micro_degree() {
        let original = tp(-122.419_415_5, 37.774_929_3, 1024, 768);
        let decoded = Tiepoint::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
        let ll = decoded.lon_lat();
        assert!((ll.lon - -122.419_415_5).abs() < 1e-6);
        assert!((ll.lat - 37.774_929_3).abs() < 1e-6);
        assert_eq!(decoded.image_point(), ImagePoint::new(1024, 768));
    }

    #[test]
    fn decode_rejects_out_of_range_latitude() {
        let mut bytes = [0u8; ENCODED_LEN];
        bytes[0..4].copy_from_slice(&95_000_000i32.to_be_bytes());
        assert!(matches!(
            Tiepoint::decode(&bytes),
            Err(OverlayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_parts_are_rejected() {
        let geo = GeoPointE6::new(0, 0).unwrap();
        assert!(Tiepoint::from_parts(None, Some(ImagePoint::new(1, 1))).is_err());
        assert!(Tiepoint::from_parts(Some(geo), None).is_err());
        assert!(Tiepoint::from_parts(Some(geo), Some(ImagePoint::new(1, 1))).is_ok());
    }

    #[test]
    fn add_deduplicates_by_value() {
        let mut set = TiepointSet::new();
        assert!(set.add(tp(10.0, 20.0, 1, 2)));
        assert!(!set.add(tp(10.0, 20.0, 1, 2)));
        assert_eq!(set.len(), 1);
        assert!(set.add(tp(10.0, 20.0, 1, 3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn try_add_rejects_absent_tiepoint() {
        let mut set = TiepointSet::new();
        assert!(matches!(
            set.try_add(None),
            Err(OverlayError::InvalidArgument(_))
        ));
        assert!(set.try_add(Some(tp(1.0, 1.0, 0, 0))).unwrap());
        assert!(!set.try_add(Some(tp(1.0, 1.0, 0, 0))).unwrap());
    }

    #[test]
    fn remove_and_clear() {
        let mut set: TiepointSet = [tp(1.0, 1.0, 0, 0), tp(2.0, 2.0, 5, 5)]
            .into_iter()
            .collect();
        assert!(set.remove(&tp(1.0, 1.0, 0, 0)));
        assert!(!set.remove(&tp(1.0, 1.0, 0, 0)));
        assert_eq!(set.len(), 1);
        set.clear();
        assert!(set.is_empty());

        let mut empty = TiepointSet::new();
        empty.clear();
        assert!(!empty.remove(&tp(2.0, 2.0, 5, 5)));
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let points = [tp(3.0, 3.0, 3, 3), tp(1.0, 1.0, 1, 1), tp(2.0, 2.0, 2, 2)];
        let mut set = TiepointSet::new();
        for p in points {
            set.add(p);
        }
        set.add(points[1]);
        let seen: Vec<Tiepoint> = set.iter().copied().collect();
        assert_eq!(seen, points);
    }

    #[test]
    fn set_stream_round_trip() {
        let set: TiepointSet = [tp(24.9, 60.1, 10, 20), tp(-70.6, -33.4, 300, 400)]
            .into_iter()
            .collect();
        let mut buf = Vec::new();
        set.write_all(&mut buf).unwrap();
        assert_eq!(buf.len(), 4 + 2 * ENCODED_LEN);
        let back = TiepointSet::read_all(Cursor::new(buf)).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn truncated_stream_is_reported() {
        let set: TiepointSet = [tp(24.9, 60.1, 10, 20)].into_iter().collect();
        let mut buf = Vec::new();
        set.write_all(&mut buf).unwrap();
        buf.truncate(buf.len() - 3);
        let err = TiepointSet::read_all(Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidArgument(_)), "{err}");
    }
}
