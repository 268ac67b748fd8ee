//! Output formatting for command results.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use driveroute_lib::{Coordinate, LatLng, RouteResult};

use crate::terminal::{format_with_separators, ColorPalette};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// A resolved route as reported to the user.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub origin: String,
    pub destination: String,
    #[serde(flatten)]
    pub route: RouteResult,
    /// Road geometry from the directions lookup, when requested and available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<LatLng>>,
}

impl RouteReport {
    /// Write the report in `format`.
    pub fn print(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => print!("{}", self.render_text(&ColorPalette::detect())),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
        }
        Ok(())
    }

    pub fn render_text(&self, palette: &ColorPalette) -> String {
        let p = palette;
        let mut out = format!(
            "Route from {}{}{} to {}{}{}:\n",
            p.white_bold, self.origin, p.reset, p.white_bold, self.destination, p.reset
        );

        let last = self.route.path.len().saturating_sub(1);
        for (index, coordinate) in self.route.path.iter().enumerate() {
            let (tag_color, tag) = match index {
                0 => (p.tag_start, "START"),
                i if i == last => (p.tag_goal, "GOAL "),
                _ => (p.tag_via, "VIA  "),
            };
            out.push_str(&format!(
                "  {}{}{} {}\n",
                tag_color,
                tag,
                p.reset,
                format_coordinate(coordinate)
            ));
        }

        out.push_str(&format!(
            "{}Total distance:{} {}{}{}\n",
            p.gray,
            p.reset,
            p.green,
            format_with_separators(self.route.total_distance.round() as u64),
            p.reset
        ));
        out.push_str(&format!(
            "{}Total time:{} {}{}{}\n",
            p.gray,
            p.reset,
            p.green,
            format_with_separators(self.route.total_time.round() as u64),
            p.reset
        ));

        if let Some(geometry) = &self.geometry {
            out.push_str(&format!(
                "{}Road geometry:{} {} points\n",
                p.gray,
                p.reset,
                geometry.len()
            ));
        }
        out
    }
}

fn format_coordinate(coordinate: &Coordinate) -> String {
    format!("{}, {}", coordinate.latitude(), coordinate.longitude())
}

/// Write place suggestions, one per line or as a JSON array.
pub fn print_suggestions(suggestions: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for suggestion in suggestions {
                println!("{suggestion}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(suggestions)?),
    }
    Ok(())
}

/// Write decoded points, one `lat, lng` per line or as a JSON array.
pub fn print_points(points: &[LatLng], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for point in points {
                println!("{}, {}", point.lat, point.lng);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(points)?),
    }
    Ok(())
}
