use crate::map::{self, OutlineSheet};
use crate::stats::RegionStats;
use anyhow::{bail, Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

pub const NATIONAL_STATS_FILE: &str = "california_2024.csv";
pub const REGIONAL_STATS_FILE: &str = "alameda_2024.csv";
pub const NATIONAL_OUTLINE_FILE: &str = "usa_outline.json";
pub const REGIONAL_OUTLINE_FILE: &str = "california_outline.json";

pub const NATIONAL_STATS_LABEL: &str = "California 2024";
pub const REGIONAL_STATS_LABEL: &str = "Alameda County 2024";

/// Everything the app needs from disk. Missing stats stay absent (the
/// dashboard degrades); missing outlines fall back to built-in shapes.
pub struct LoadedAssets {
    pub stats_national: Option<RegionStats>,
    pub stats_regional: Option<RegionStats>,
    pub national_outline: OutlineSheet,
    pub regional_outline: OutlineSheet,
}

/// Load both offense CSVs and both outlines from the data directory.
/// Never fails: every missing or malformed asset degrades with a warning.
pub fn load_all(data_dir: &Path) -> LoadedAssets {
    let stats_national = load_stats(&data_dir.join(NATIONAL_STATS_FILE), NATIONAL_STATS_LABEL)
        .map_err(|e| eprintln!("Warning: failed to load {NATIONAL_STATS_FILE}: {e}"))
        .ok();
    let stats_regional = load_stats(&data_dir.join(REGIONAL_STATS_FILE), REGIONAL_STATS_LABEL)
        .map_err(|e| eprintln!("Warning: failed to load {REGIONAL_STATS_FILE}: {e}"))
        .ok();

    let national_outline = load_outline(&data_dir.join(NATIONAL_OUTLINE_FILE)).unwrap_or_else(|e| {
        eprintln!("Warning: failed to load {NATIONAL_OUTLINE_FILE}: {e}; using fallback outline");
        map::national_fallback()
    });
    let regional_outline = load_outline(&data_dir.join(REGIONAL_OUTLINE_FILE)).unwrap_or_else(|e| {
        eprintln!("Warning: failed to load {REGIONAL_OUTLINE_FILE}: {e}; using fallback outline");
        map::regional_fallback()
    });

    LoadedAssets {
        stats_national,
        stats_regional,
        national_outline,
        regional_outline,
    }
}

/// Read a two-column offense CSV (header row expected) into stats.
/// Structurally bad records are skipped; bad cells degrade inside the parser.
pub fn load_stats(path: &Path, label: &str) -> Result<RegionStats> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let mut table: Vec<(String, String)> = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let name = record.get(0).unwrap_or("").to_string();
        let value = record.get(1).unwrap_or("").to_string();
        table.push((name, value));
    }

    Ok(RegionStats::parse(
        table.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        label,
    ))
}

/// Read a GeoJSON outline asset into a sheet of polylines
pub fn load_outline(path: &Path) -> Result<OutlineSheet> {
    let content = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let geojson: GeoJson = content.parse().context("parse GeoJSON")?;

    let mut lines = Vec::new();
    collect_geojson_lines(&geojson, &mut |line| lines.push(line));

    let sheet = OutlineSheet::new(lines);
    if sheet.is_empty() {
        bail!("no line features in {}", path.display());
    }
    Ok(sheet)
}

/// Pull every line feature out of a GeoJSON document
fn collect_geojson_lines<F>(geojson: &GeoJson, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry_lines(geometry, add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            collect_geometry_lines(geometry, add_line);
        }
    }
}

fn collect_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(line_strings) => {
            for coords in line_strings {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}
