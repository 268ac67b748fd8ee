//! Polyline encode/decode command handlers.

use anyhow::{Context, Result};

use driveroute_lib::{decode_polyline, encode_polyline, LatLng};

use crate::output::{print_points, OutputFormat};

/// Handle `polyline decode`.
pub fn handle_polyline_decode(encoded: &str, precision: u32, format: OutputFormat) -> Result<()> {
    let points = decode_polyline(encoded, precision).context("failed to decode polyline")?;
    print_points(&points, format)
}

/// Handle `polyline encode`. Each point is written as `LAT,LNG`.
pub fn handle_polyline_encode(points: &[String], precision: u32) -> Result<()> {
    if points.is_empty() {
        anyhow::bail!("At least one point is required");
    }
    let parsed = points
        .iter()
        .map(|raw| parse_point(raw))
        .collect::<Result<Vec<_>>>()?;
    let encoded = encode_polyline(&parsed, precision).context("failed to encode polyline")?;
    println!("{encoded}");
    Ok(())
}

fn parse_point(raw: &str) -> Result<LatLng> {
    let (lat, lng) = raw
        .split_once(',')
        .with_context(|| format!("invalid point '{raw}', expected LAT,LNG"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in '{raw}'"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in '{raw}'"))?;
    Ok(LatLng::new(lat, lng))
}
