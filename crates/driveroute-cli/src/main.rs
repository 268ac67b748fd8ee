use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use driveroute_cli::commands::polyline::{handle_polyline_decode, handle_polyline_encode};
use driveroute_cli::commands::route::{handle_route_command, RouteCommandArgs};
use driveroute_cli::commands::suggest::handle_suggest_command;
use driveroute_cli::output::OutputFormat;
use driveroute_lib::{init_logging, ClientConfig, LogFormat, LoggingConfig, GOOGLE_PRECISION};

#[derive(Parser, Debug)]
#[command(author, version, about = "Driving route utilities")]
struct Cli {
    /// Override the route API base URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a driving route between two locations.
    Route {
        /// Starting location.
        #[arg(long = "from")]
        from: String,
        /// Drop-off location.
        #[arg(long = "to")]
        to: String,
        /// Also fetch road geometry from the directions API.
        #[arg(long)]
        geometry: bool,
    },
    /// Suggest places matching a partial search term.
    Suggest {
        term: String,
    },
    /// Encode or decode polylines.
    Polyline {
        #[command(subcommand)]
        action: PolylineAction,
    },
}

#[derive(Subcommand, Debug)]
enum PolylineAction {
    /// Decode an encoded polyline into points.
    Decode {
        encoded: String,
        #[arg(long, default_value_t = GOOGLE_PRECISION)]
        precision: u32,
    },
    /// Encode `LAT,LNG` points into a polyline.
    Encode {
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,
        #[arg(long, default_value_t = GOOGLE_PRECISION)]
        precision: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env().with_format(LogFormat::Text));
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(base_url) = cli.api_base_url {
        config = config.with_api_base_url(base_url);
    }

    match cli.command {
        Command::Route { from, to, geometry } => {
            let args = RouteCommandArgs {
                from,
                to,
                format: cli.format,
                geometry,
            };
            handle_route_command(&config, &args).await
        }
        Command::Suggest { term } => handle_suggest_command(&config, &term, cli.format).await,
        Command::Polyline { action } => match action {
            PolylineAction::Decode { encoded, precision } => {
                handle_polyline_decode(&encoded, precision, cli.format)
            }
            PolylineAction::Encode { points, precision } => {
                handle_polyline_encode(&points, precision)
            }
        },
    }
}
