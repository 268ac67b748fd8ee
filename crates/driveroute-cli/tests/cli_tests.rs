//! Integration tests for CLI commands.
//!
//! Route tests run the binary against an in-process mock route API bound to
//! an ephemeral port.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;

use driveroute_mock_api::{router, MockState};

const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// Start the mock route API on a background runtime and return its base URL.
fn spawn_mock_api(pending_polls: u32) -> String {
    let (tx, rx) = mpsc::channel::<SocketAddr>();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("build runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind mock api");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("report addr");
            axum::serve(listener, router(MockState::new(pending_polls)))
                .await
                .expect("serve mock api");
        });
    });
    format!("http://{}", rx.recv().expect("mock api address"))
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("driveroute-cli").expect("binary exists");
    cmd.env("NO_COLOR", "1")
        .env("RUST_LOG", "warn")
        .env_remove("GOOGLE_MAPS_API_KEY")
        .env_remove("DRIVEROUTE_API_BASE_URL")
        .env_remove("DRIVEROUTE_POLL_INTERVAL_MS")
        .env_remove("DRIVEROUTE_POLL_MAX_ATTEMPTS");
    cmd
}

#[test]
fn route_requires_both_locations() {
    cli()
        .args([
            "--api-base-url",
            "http://127.0.0.1:9",
            "route",
            "--from",
            "",
            "--to",
            "Hong Kong International Airport",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Starting location can not be empty"))
        .stderr(predicate::str::contains("Dropoff location").not());
}

#[test]
fn route_resolves_against_mock_api() {
    let base_url = spawn_mock_api(2);

    cli()
        .args([
            "--api-base-url",
            &base_url,
            "route",
            "--from",
            "Innocentre, Hong Kong",
            "--to",
            "Hong Kong International Airport",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("START 22.372081, 114.107877"))
        .stdout(predicate::str::contains("GOAL  22.284419, 114.159510"))
        .stdout(predicate::str::contains("Total distance: 20,000"))
        .stdout(predicate::str::contains("Total time: 1,800"));
}

#[test]
fn route_json_output() {
    let base_url = spawn_mock_api(0);

    let output = cli()
        .args([
            "--api-base-url",
            &base_url,
            "--format",
            "json",
            "route",
            "--from",
            "Innocentre",
            "--to",
            "Airport",
        ])
        .output()
        .expect("run cli");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(report["origin"], "Innocentre");
    assert_eq!(report["total_time"], 1800.0);
    assert_eq!(report["path"].as_array().map(Vec::len), Some(3));
}

#[test]
fn route_reports_domain_failure() {
    let base_url = spawn_mock_api(1);

    cli()
        .args([
            "--api-base-url",
            &base_url,
            "route",
            "--from",
            "Innocentre",
            "--to",
            "unreachable reef",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Location not accessible by car"));
}

#[test]
fn route_reports_unreachable_api_with_fallback() {
    cli()
        .args([
            "--api-base-url",
            "http://127.0.0.1:9",
            "route",
            "--from",
            "A",
            "--to",
            "B",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to fetch route token for origin: A, and destination: B",
        ));
}

#[test]
fn polyline_decode_prints_points() {
    cli()
        .args(["polyline", "decode", REFERENCE_POLYLINE])
        .assert()
        .success()
        .stdout("38.5, -120.2\n40.7, -120.95\n43.252, -126.453\n");
}

#[test]
fn polyline_encode_prints_polyline() {
    cli()
        .args([
            "polyline",
            "encode",
            "38.5,-120.2",
            "40.7,-120.95",
            "43.252,-126.453",
        ])
        .assert()
        .success()
        .stdout(format!("{REFERENCE_POLYLINE}\n"));
}

#[test]
fn polyline_decode_rejects_invalid_input() {
    cli()
        .args(["polyline", "decode", "_p~iF ps|U"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode polyline"));
}

#[test]
fn polyline_encode_rejects_unscalable_points() {
    cli()
        .args(["polyline", "encode", "1e300,0", "-1e300,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to encode polyline"));
}

#[test]
fn suggest_requires_api_key() {
    cli()
        .args(["suggest", "Tsim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_MAPS_API_KEY"));
}
