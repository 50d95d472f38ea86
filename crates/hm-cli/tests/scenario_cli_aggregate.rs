//! End-to-end `hotelmerge` runs against local mock suppliers.

use std::io::Write;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};

fn start_suppliers() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/acme");
        then.status(200).body(
            r#"[
                {"Id": "iJhz", "DestinationId": 5432, "Name": "Beach Villas Singapore",
                 "Facilities": ["Pool", "WiFi"], "Description": "Close to beach"},
                {"Id": "f8c9", "DestinationId": 1122, "Name": "Hilton Tokyo Shinjuku",
                 "Facilities": ["Pool"]}
            ]"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/patagonia");
        then.status(200).body(
            r#"[
                {"id": "iJhz", "destination": 5432, "name": "Beach Villas Singapore",
                 "facilities": ["wifi", "Gym"], "description": "beach"},
                {"id": "", "destination": 5432, "name": "No id"}
            ]"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/paperflies");
        then.status(503);
    });
    server
}

fn hotelmerge(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("hotelmerge").unwrap();
    cmd.env("RUST_LOG", "warn");
    for path in ["/acme", "/patagonia", "/paperflies"] {
        cmd.args(["--supplier-url", &server.url(path)]);
    }
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

#[test]
fn scenario_cli_merges_all_suppliers_without_filter() {
    let server = start_suppliers();
    let output = hotelmerge(&server)
        .args(["none", "NONE"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let v = stdout_json(&output);
    assert_eq!(
        v,
        json!([
            {
                "hotel_id": "iJhz",
                "destination_id": "5432",
                "Name": "Beach Villas Singapore",
                "Facilities": ["Pool", "WiFi", "Gym"],
                "Description": "Close to beach"
            },
            {
                "hotel_id": "f8c9",
                "destination_id": "1122",
                "Name": "Hilton Tokyo Shinjuku",
                "Facilities": ["Pool"]
            }
        ])
    );
}

#[test]
fn scenario_cli_output_is_four_space_indented() {
    let server = start_suppliers();
    hotelmerge(&server)
        .args(["f8c9", "1122"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[\n    {\n        \"hotel_id\": \"f8c9\","));
}

#[test]
fn scenario_cli_filter_is_a_conjunction() {
    let server = start_suppliers();

    let output = hotelmerge(&server).args(["iJhz,f8c9", "5432"]).output().unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    let ids: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["hotel_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["iJhz"]);

    let output = hotelmerge(&server).args(["iJhz", "1122"]).output().unwrap();
    assert_eq!(stdout_json(&output), json!([]));
}

#[test]
fn scenario_cli_skipped_record_and_failed_supplier_are_logged_not_fatal() {
    let server = start_suppliers();
    hotelmerge(&server)
        .args(["none", "none"])
        .assert()
        .success()
        .stderr(predicate::str::contains("supplier fetch failed"))
        .stderr(predicate::str::contains("missing_hotel_id"));
}

#[test]
fn scenario_cli_logs_aggregation_summary() {
    let server = start_suppliers();
    hotelmerge(&server)
        .env("RUST_LOG", "info")
        .args(["none", "none"])
        .assert()
        .success()
        .stderr(predicate::str::contains("supplier batches received"))
        .stderr(predicate::str::contains("aggregation complete"))
        .stderr(predicate::str::contains("records_seen=4"))
        .stderr(predicate::str::contains("skipped=1"));
}

#[test]
fn scenario_cli_all_suppliers_down_prints_empty_list() {
    let mut cmd = Command::cargo_bin("hotelmerge").unwrap();
    cmd.env("RUST_LOG", "off")
        .args(["--supplier-url", "http://127.0.0.1:9/down"])
        .args(["none", "none"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn scenario_cli_reads_suppliers_from_config_file() {
    let server = start_suppliers();
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        "request_timeout_secs: 5\nsuppliers:\n  - name: acme\n    url: {}\n",
        server.url("/acme")
    )
    .unwrap();

    let output = Command::cargo_bin("hotelmerge")
        .unwrap()
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(f.path())
        .args(["none", "none"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output).as_array().unwrap().len(), 2);
}

#[test]
fn scenario_cli_rejects_bad_config() {
    Command::cargo_bin("hotelmerge")
        .unwrap()
        .env("RUST_LOG", "off")
        .args(["--config", "/definitely/not/here.yaml", "none", "none"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read supplier config failed"));
}

#[test]
fn scenario_cli_requires_both_positionals() {
    Command::cargo_bin("hotelmerge")
        .unwrap()
        .arg("none")
        .assert()
        .failure();
}
