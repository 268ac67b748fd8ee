//! Route command handler for resolving a driving route between two places.

use std::sync::{Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use tracing::warn;

use driveroute_lib::{
    ClientConfig, Coordinate, LatLng, MapsClient, RouteApiClient, RouteOrchestrator, RouteRenderer,
    SubmissionState,
};

use crate::output::{OutputFormat, RouteReport};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting location, free text.
    pub from: String,
    /// Drop-off location, free text.
    pub to: String,
    pub format: OutputFormat,
    /// Also fetch road geometry from the directions API.
    pub geometry: bool,
}

/// Holds the path the orchestrator last asked to draw.
#[derive(Debug, Default)]
pub struct MapView {
    active: Mutex<Option<Vec<Coordinate>>>,
}

impl MapView {
    pub fn active_route(&self) -> Option<Vec<Coordinate>> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteRenderer for MapView {
    fn show_route(&self, path: &[Coordinate]) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.to_vec());
    }

    fn clear_route(&self) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Handle the route subcommand.
pub async fn handle_route_command(config: &ClientConfig, args: &RouteCommandArgs) -> Result<()> {
    let client = RouteApiClient::new(config).context("failed to build the route API client")?;
    let orchestrator = RouteOrchestrator::new(client, MapView::default());

    orchestrator.set_starting_location(args.from.as_str());
    orchestrator.set_dropoff_location(args.to.as_str());
    orchestrator.on_submit().await;

    let state = orchestrator.snapshot();
    check_inputs(&state)?;
    if let Some(message) = state.error {
        bail!(message);
    }
    let Some(route) = state.result else {
        bail!("route submission did not settle");
    };

    let geometry = if args.geometry {
        let path = orchestrator.renderer().active_route().unwrap_or_default();
        fetch_geometry(config, &path).await?
    } else {
        None
    };

    let report = RouteReport {
        origin: args.from.clone(),
        destination: args.to.clone(),
        route,
        geometry,
    };
    report.print(args.format)
}

/// Turn required-field flags into the same messages the input form shows.
fn check_inputs(state: &SubmissionState) -> Result<()> {
    let labels = ["Starting location", "Dropoff location"];
    let missing: Vec<String> = labels
        .iter()
        .zip(state.input_required)
        .filter(|(_, required)| *required)
        .map(|(label, _)| format!("{label} can not be empty"))
        .collect();
    if !missing.is_empty() {
        bail!(missing.join("\n"));
    }
    Ok(())
}

async fn fetch_geometry(
    config: &ClientConfig,
    path: &[Coordinate],
) -> Result<Option<Vec<LatLng>>> {
    let maps = MapsClient::new(config).context("failed to build the maps client")?;
    let geometry = maps.route_geometry(path).await;
    if geometry.is_none() {
        warn!("road geometry unavailable, reporting waypoints only");
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_view_tracks_active_route() {
        let view = MapView::default();
        assert!(view.active_route().is_none());

        let path = vec![Coordinate::new("1", "2"), Coordinate::new("3", "4")];
        view.show_route(&path);
        assert_eq!(view.active_route(), Some(path));

        view.clear_route();
        assert!(view.active_route().is_none());
    }

    #[test]
    fn test_check_inputs_reports_each_missing_field() {
        let state = SubmissionState {
            input_required: [true, true],
            ..SubmissionState::default()
        };
        let message = check_inputs(&state).unwrap_err().to_string();
        assert_eq!(
            message,
            "Starting location can not be empty\nDropoff location can not be empty"
        );

        assert!(check_inputs(&SubmissionState::default()).is_ok());
    }
}
