//! Place autocomplete command handler.

use anyhow::{Context, Result};

use driveroute_lib::{ClientConfig, MapsClient};

use crate::output::{print_suggestions, OutputFormat};

/// Handle the suggest subcommand.
pub async fn handle_suggest_command(
    config: &ClientConfig,
    term: &str,
    format: OutputFormat,
) -> Result<()> {
    config
        .require_maps_api_key()
        .context("place suggestions need a maps API key")?;
    let maps = MapsClient::new(config).context("failed to build the maps client")?;

    let suggestions = maps
        .autocomplete(term)
        .await
        .with_context(|| format!("failed to fetch suggestions for '{term}'"))?;
    print_suggestions(&suggestions, format)
}
