//! File helpers for reports and tiepoint data.
//!
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `write_tiepoint_file` / `read_tiepoint_file`: binary tiepoint sets in
//!   the fixed-point encoding.
use crate::tiepoint::TiepointSet;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Write `set` to `path` in the binary tiepoint encoding.
pub fn write_tiepoint_file(path: &Path, set: &TiepointSet) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let file =
        File::create(path).map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
    let mut writer = BufWriter::new(file);
    set.write_all(&mut writer)
        .map_err(|e| format!("Failed to write tiepoints {}: {e}", path.display()))?;
    writer
        .flush()
        .map_err(|e| format!("Failed to flush {}: {e}", path.display()))
}

/// Read a tiepoint set written by [`write_tiepoint_file`].
pub fn read_tiepoint_file(path: &Path) -> Result<TiepointSet, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    TiepointSet::read_all(BufReader::new(file))
        .map_err(|e| format!("Failed to read tiepoints {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
