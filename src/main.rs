use geo_overlay::{Bounds, GroundOverlay, SourceRef};

fn main() {
    // Demo stub: a 10°x10° overlay rotated by 30° and a few probe points
    let mut overlay = GroundOverlay::new(SourceRef::new("demo.kml"), "demo.png");
    overlay.set_bounds(Bounds::new(10.0, 0.0, 10.0, 0.0));
    overlay.set_rotation(30.0);

    println!("{overlay}");
    println!("area_km2={:.1}", overlay.area_km2());
    for (lon, lat) in [(5.0, 5.0), (15.0, 5.0), (-2.0, 12.0)] {
        println!(
            "({lon}, {lat}) contains={} distance_m={:.1}",
            overlay.contains(lon, lat),
            overlay.distance_from(lon, lat)
        );
    }
}
