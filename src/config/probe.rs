use crate::geodesy::DistanceModel;
use crate::geometry::Bounds;
use crate::overlay::{GroundOverlay, SourceRef};
use crate::tiepoint::Tiepoint;
use crate::types::{ImagePoint, LonLat, Quad};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ProbeConfig {
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub distance_model: DistanceModel,
    #[serde(default)]
    pub queries: Vec<LonLat>,
    #[serde(default)]
    pub output: ProbeOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OverlayConfig {
    /// Source container the overlay was read from (usually a file path).
    pub source: PathBuf,
    pub image: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub rotation_deg: f64,
    /// Explicit corners; override bounds and rotation when present.
    #[serde(default)]
    pub corners: Option<Quad>,
    #[serde(default)]
    pub tiepoints: Vec<TiepointConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TiepointConfig {
    pub lon: f64,
    pub lat: f64,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProbeOutputConfig {
    pub json_out: Option<PathBuf>,
    /// Optional binary dump of the overlay's tiepoints.
    pub tiepoints_bin: Option<PathBuf>,
}

impl OverlayConfig {
    pub fn build(&self, model: DistanceModel) -> Result<GroundOverlay<DistanceModel>, String> {
        let mut overlay =
            GroundOverlay::with_model(SourceRef::new(&self.source), self.image.clone(), model);
        overlay.set_name(self.name.clone());
        overlay.set_description(self.description.clone());
        overlay.set_bounds(self.bounds);
        overlay.set_rotation(self.rotation_deg);
        if let Some(quad) = self.corners {
            overlay.set_corners(quad);
        }
        for (idx, tp) in self.tiepoints.iter().enumerate() {
            let tiepoint = Tiepoint::from_degrees(tp.lon, tp.lat, ImagePoint::new(tp.x, tp.y))
                .map_err(|e| format!("Invalid tiepoint #{idx}: {e}"))?;
            overlay.add_tiepoint(tiepoint);
        }
        Ok(overlay)
    }
}

/// Loads a probe config; relative output paths resolve against the config
/// file's directory.
pub fn load_config(path: &Path) -> Result<ProbeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let mut config = parse_config(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    config.output.json_out = config
        .output
        .json_out
        .map(|p| resolve_path(base_dir, &p));
    config.output.tiepoints_bin = config
        .output
        .tiepoints_bin
        .map(|p| resolve_path(base_dir, &p));
    Ok(config)
}

pub fn parse_config(json: &str) -> Result<ProbeConfig, serde_json::Error> {
    serde_json::from_str(json)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
