use geo_overlay::{Bounds, GroundOverlay, LonLat, Quad, SourceRef};

/// Unrotated overlay covering lon 0..10, lat 0..10.
pub fn square_overlay() -> GroundOverlay {
    let mut overlay = GroundOverlay::new(SourceRef::new("fixtures/square.kml"), "square.png");
    overlay.set_name(Some("Square".to_string()));
    overlay.set_bounds(Bounds::new(10.0, 0.0, 10.0, 0.0));
    overlay
}

/// Corner-defined overlay with the same footprint as [`square_overlay`].
pub fn square_corner_overlay() -> GroundOverlay {
    let mut overlay = GroundOverlay::new(SourceRef::new("fixtures/square.kml"), "square.png");
    overlay.set_corners(Quad {
        nw: LonLat::new(0.0, 10.0),
        ne: LonLat::new(10.0, 10.0),
        se: LonLat::new(10.0, 0.0),
        sw: LonLat::new(0.0, 0.0),
    });
    overlay
}

pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
