use geo_overlay::config::probe;
use geo_overlay::geometry::{MetricSize, Region};
use geo_overlay::io::{write_json_file, write_tiepoint_file};
use geo_overlay::types::LonLat;
use geo_overlay::GroundOverlay;
use geo_overlay::DistanceModel;
use log::info;
use serde::Serialize;
use std::env;
use std::path::Path;

#[derive(Serialize)]
struct ProbeReport {
    overlay: String,
    corner_mode: bool,
    rotation_deg: f64,
    metric_size: MetricSize,
    area_km2: f64,
    tiepoints: usize,
    queries: Vec<QueryReport>,
}

#[derive(Serialize)]
struct QueryReport {
    lon: f64,
    lat: f64,
    contains: bool,
    distance_m: f64,
    metric: Option<[f64; 2]>,
    region: Option<Region>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: overlay_probe <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = probe::load_config(Path::new(&config_path))?;
    let overlay = config.overlay.build(config.distance_model)?;
    info!(
        "overlay_probe: loaded {} with {} queries ({:?})",
        overlay.image(),
        config.queries.len(),
        config.distance_model
    );

    let report = build_report(&overlay, &config.queries);
    print_text_summary(&report);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.tiepoints_bin {
        write_tiepoint_file(path, overlay.tiepoints())?;
        println!("Tiepoints written to {}", path.display());
    }
    Ok(())
}

fn build_report(overlay: &GroundOverlay<DistanceModel>, queries: &[LonLat]) -> ProbeReport {
    let frame = overlay.geometry().frame();
    let distances = frame.distances_from_many(queries);
    let queries = queries
        .iter()
        .zip(distances)
        .map(|(q, frame_distance)| {
            let contains = overlay.contains(q.lon, q.lat);
            let metric = frame.to_metric(*q);
            QueryReport {
                lon: q.lon,
                lat: q.lat,
                contains,
                distance_m: if contains { 0.0 } else { frame_distance },
                metric,
                region: metric.map(|m| frame.region(m)),
            }
        })
        .collect();

    ProbeReport {
        overlay: overlay.to_string(),
        corner_mode: overlay.has_corner_tiepoints(),
        rotation_deg: overlay.rotation(),
        metric_size: frame.size(),
        area_km2: frame.size().area_km2(),
        tiepoints: overlay.tiepoints().len(),
        queries,
    }
}

fn print_text_summary(report: &ProbeReport) {
    println!("{}", report.overlay);
    println!(
        "  corner_mode: {}  rotation_deg: {:.3}  tiepoints: {}",
        report.corner_mode, report.rotation_deg, report.tiepoints
    );
    println!(
        "  metric size: {:.1} m x {:.1} m  area: {:.3} km^2",
        report.metric_size.width_m, report.metric_size.height_m, report.area_km2
    );
    if report.queries.is_empty() {
        return;
    }
    println!("Queries");
    for q in &report.queries {
        let region = q
            .region
            .map(|r| format!("{r:?}"))
            .unwrap_or_else(|| "unmapped".to_string());
        println!(
            "  ({:.6}, {:.6}) contains={} distance_m={:.1} region={}",
            q.lon, q.lat, q.contains, q.distance_m, region
        );
    }
}
