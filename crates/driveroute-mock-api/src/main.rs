//! Mock route API service.
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `MOCK_PENDING_POLLS` - "in progress" answers per job (default: 3)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;

use tracing::info;

use driveroute_lib::{init_logging, LoggingConfig};
use driveroute_mock_api::{router, MockConfig, MockState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("driveroute-mock-api");
    init_logging(&logging_config);

    let config = MockConfig::from_env();
    info!(
        port = config.port,
        pending_polls = config.pending_polls,
        "starting mock route api"
    );

    let app = router(MockState::new(config.pending_polls));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
