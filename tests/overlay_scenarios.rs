mod common;

use common::fixtures::{approx_eq, square_corner_overlay, square_overlay};
use geo_overlay::{
    Corner, GeodesicDistance, GroundOverlay, ImagePoint, LonLat, SourceRef, Tiepoint, Vincenty,
};

#[test]
fn square_overlay_contains_its_center() {
    let overlay = square_overlay();
    assert!(overlay.contains(5.0, 5.0));
    assert_eq!(overlay.distance_from(5.0, 5.0), 0.0);
}

#[test]
fn distance_east_of_square_is_half_its_width() {
    let overlay = square_overlay();
    let d = overlay.distance_from(15.0, 5.0);
    // 5 degrees of longitude around 5-10 degrees north is roughly 548-554 km
    assert!(d > 540_000.0 && d < 560_000.0, "d={d}");
    let width = Vincenty.distance_m(LonLat::new(0.0, 10.0), LonLat::new(10.0, 10.0));
    assert!(approx_eq(d, width / 2.0, 1e-3), "d={d} width={width}");
}

#[test]
fn boundary_points_are_excluded() {
    let overlay = square_overlay();
    for (lon, lat) in [(0.0, 5.0), (10.0, 5.0), (5.0, 0.0), (5.0, 10.0), (10.0, 10.0)] {
        assert!(!overlay.contains(lon, lat), "({lon}, {lat})");
    }
}

#[test]
fn corner_overlay_matches_bounds_overlay() {
    let bounds = square_overlay();
    let corners = square_corner_overlay();
    assert!(corners.has_corner_tiepoints());
    assert!(!bounds.has_corner_tiepoints());

    for (lon, lat) in [(5.0, 5.0), (0.5, 9.5), (10.5, 5.0), (-3.0, -3.0)] {
        assert_eq!(corners.contains(lon, lat), bounds.contains(lon, lat));
    }

    let (a, b) = (corners.area_km2(), bounds.area_km2());
    // corner mode averages the 10N and equator edges; bounds use the 10N edge
    assert!(a > b && (a - b) / b < 0.01, "corners={a} bounds={b}");
    assert!(approx_eq(
        corners.metric_size().height_m,
        bounds.metric_size().height_m,
        1e-6
    ));
}

#[test]
fn mutation_changes_containment() {
    let mut overlay = square_overlay();
    assert!(!overlay.contains(12.0, 5.0));
    let before = overlay.distance_from(12.0, 5.0);
    assert!(before > 0.0);

    overlay.set_east(15.0);
    assert!(overlay.contains(12.0, 5.0));
    assert_eq!(overlay.distance_from(12.0, 5.0), 0.0);

    overlay.set_rotation(90.0);
    // a quarter turn of a 15x10 degree footprint pulls the east end inward
    assert!(!overlay.contains(14.5, 5.0));

    overlay.set_corner(Corner::NorthWest, LonLat::new(20.0, 30.0));
    overlay.set_corner(Corner::NorthEast, LonLat::new(21.0, 30.0));
    overlay.set_corner(Corner::SouthEast, LonLat::new(21.0, 29.0));
    overlay.set_corner(Corner::SouthWest, LonLat::new(20.0, 29.0));
    assert!(!overlay.contains(5.0, 5.0));
    assert!(overlay.contains(20.5, 29.5));
}

#[test]
fn equality_ignores_metadata() {
    let mut a = square_overlay();
    let mut b = square_corner_overlay();
    a.set_description(Some("first".to_string()));
    b.set_name(None);
    b.add_tiepoint(Tiepoint::from_degrees(2.0, 2.0, ImagePoint::new(8, 9)).unwrap());
    assert_eq!(a, b);

    let other = GroundOverlay::new(SourceRef::new("fixtures/other.kml"), "square.png");
    assert_ne!(a, other);
}

#[test]
fn adding_equal_tiepoints_is_idempotent() {
    let mut overlay = square_overlay();
    let tp = Tiepoint::from_degrees(3.5, 4.5, ImagePoint::new(120, 340)).unwrap();
    assert!(overlay.add_tiepoint(tp));
    assert!(!overlay.add_tiepoint(tp));
    assert_eq!(overlay.tiepoints().len(), 1);
    assert_eq!(overlay.tiepoints().iter().next(), Some(&tp));
}
