//! CLI integration tests

use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the CLI against an isolated data directory with the year pinned to 2025
fn nkps(dir: &TempDir, args: &[&str]) -> Output {
    let config_path = dir.path().join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").expect("Failed to write config");
    }

    Command::new(env!("CARGO_BIN_EXE_nkps"))
        .args(args)
        .env("NKPS_DATA_DIR", dir.path().join("data"))
        .env("NKPS_CONFIG", &config_path)
        .env("NKPS_CURRENT_YEAR", "2025")
        .env_remove("NKPS_DEFAULT_CLUSTER")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let mut full = vec!["--format", "json"];
    full.extend_from_slice(args);
    let output = nkps(dir, &full);
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Output should be JSON")
}

fn add_production_setup(dir: &TempDir) {
    let output = nkps(dir, &["hardware", "add", "--name", "Prod Rack", "--cluster", "Production"]);
    assert!(output.status.success(), "hardware add should succeed");

    let output = nkps(
        dir,
        &[
            "workload", "add", "--name", "api", "--cluster", "Production", "--replicas", "2",
            "--cpu", "28", "--memory", "8", "--data", "64",
        ],
    );
    assert!(output.status.success(), "workload add should succeed");
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = nkps(&dir, &["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Capacity sizing"), "Should show about text");
    assert!(stdout.contains("workload"), "Should show workload command");
    assert!(stdout.contains("hardware"), "Should show hardware command");
    assert!(stdout.contains("growth"), "Should show growth command");
    assert!(stdout.contains("summary"), "Should show summary command");
    assert!(stdout.contains("forecast"), "Should show forecast command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = nkps(&dir, &["--version"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("nkps"), "Should show binary name");
}

/// Test hardware add subcommand help
#[test]
fn test_hardware_add_help() {
    let dir = TempDir::new().unwrap();
    let output = nkps(&dir, &["hardware", "add", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Hardware add help should succeed");
    assert!(stdout.contains("--cp-count"), "Should show control plane count");
    assert!(stdout.contains("--worker-vcpus"), "Should show worker vCPUs");
    assert!(stdout.contains("--reserved-memory"), "Should show reserved memory");
}

/// A new project is seeded with management hardware and default growth rates
#[test]
fn test_new_project_is_seeded() {
    let dir = TempDir::new().unwrap();

    let hardware = json_output(&dir, &["hardware", "list"]);
    let hardware = hardware.as_array().unwrap();
    assert_eq!(hardware.len(), 1);
    assert_eq!(hardware[0]["cluster"], "NKP Management");

    let growth = json_output(&dir, &["growth", "list"]);
    let years: Vec<i64> = growth
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2026, 2027, 2028, 2029, 2030]);

    assert!(dir.path().join("data").join("project.json").exists());
}

/// Test the summary for a cluster with hardware and a workload
#[test]
fn test_summary_reports_utilization() {
    let dir = TempDir::new().unwrap();
    add_production_setup(&dir);

    let summary = json_output(&dir, &["summary", "--cluster", "Production"]);

    assert_eq!(summary["cluster"], "Production");
    assert_eq!(summary["workload_count"], 1);
    assert_eq!(summary["supply"]["vcpus"], 56);
    assert_eq!(summary["supply"]["memory"], 191);
    assert_eq!(summary["supply"]["disk"], 640);
    assert_eq!(summary["demand"]["pods"], 2);
    assert_eq!(summary["utilization"]["cpu"]["usage"], 50);
    assert_eq!(summary["utilization"]["ram"]["usage"], 4);
    assert_eq!(summary["utilization"]["data"]["usage"], 10);
    assert_eq!(summary["utilization"]["pod"]["usage"], 0);
    // Management and production worker cores
    assert_eq!(summary["license_cores"], 64);
    assert_eq!(summary["license_tier"], "Starter");
}

/// Test the forecast compounds the registered growth rates
#[test]
fn test_forecast_projects_supply() {
    let dir = TempDir::new().unwrap();
    add_production_setup(&dir);

    let forecast = json_output(&dir, &["forecast", "--cluster", "Production"]);
    let forecast = forecast.as_array().unwrap();

    assert_eq!(forecast.len(), 6);
    assert_eq!(forecast[0]["year"], 2025);
    assert_eq!(forecast[0]["vCPU"], 56);
    assert_eq!(forecast[1]["year"], 2026);
    assert_eq!(forecast[1]["vCPU"], 67);
    assert_eq!(forecast[2]["vCPU"], 110);
}

/// Test an empty cluster reports zero usage
#[test]
fn test_summary_of_empty_cluster() {
    let dir = TempDir::new().unwrap();

    let summary = json_output(&dir, &["summary", "--cluster", "UAT"]);

    assert_eq!(summary["workload_count"], 0);
    assert_eq!(summary["supply"]["vcpus"], 0);
    assert_eq!(summary["utilization"]["cpu"]["usage"], 0);
    assert_eq!(summary["utilization"]["pod"]["usage"], 0);
}

/// Test negative workload figures are rejected
#[test]
fn test_invalid_workload_rejected() {
    let dir = TempDir::new().unwrap();
    let output = nkps(
        &dir,
        &["workload", "add", "--name", "bad", "--cpu=-1", "--memory", "1", "--data", "1"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Negative cpu should fail");
    assert!(stderr.contains("invalid cpu"), "Should name the field: {}", stderr);

    let workloads = json_output(&dir, &["workload", "list"]);
    assert!(workloads.as_array().unwrap().is_empty());
}

/// Test production-tier hardware needs a control plane quorum
#[test]
fn test_control_plane_quorum_rejected() {
    let dir = TempDir::new().unwrap();
    let output = nkps(
        &dir,
        &["hardware", "add", "--name", "Small DR", "--cluster", "DR", "--cp-count", "1"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Single control plane node should fail");
    assert!(
        stderr.contains("require minimum 3 control plane nodes"),
        "Should explain the quorum: {}",
        stderr
    );

    let output = nkps(
        &dir,
        &["hardware", "add", "--name", "Small Dev", "--cluster", "DEV", "--cp-count", "1"],
    );
    assert!(output.status.success(), "Non-production clusters accept one node");
}

/// Test hardware update changes supply and keeps the quorum check
#[test]
fn test_hardware_update() {
    let dir = TempDir::new().unwrap();
    add_production_setup(&dir);

    // Management hardware is id 1, the production rack id 2
    let updated = json_output(&dir, &["hardware", "update", "2", "--worker-count", "6"]);
    assert_eq!(updated["worker"]["count"], 6);
    assert_eq!(updated["name"], "Prod Rack");

    let summary = json_output(&dir, &["summary", "--cluster", "Production"]);
    // 3*4 + 6*8 + 12
    assert_eq!(summary["supply"]["vcpus"], 72);

    let output = nkps(&dir, &["hardware", "update", "2", "--cp-count", "2"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "Dropping below quorum should fail");
    assert!(stderr.contains("require minimum 3 control plane nodes"), "Got: {}", stderr);

    let output = nkps(&dir, &["hardware", "update", "9", "--cp-count", "5"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("hardware 9 not found"), "Got: {}", stderr);
}

/// Test out-of-range settings are refused before any command runs
#[test]
fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_nkps"))
        .args(["summary"])
        .env("NKPS_DATA_DIR", dir.path().join("data"))
        .env("NKPS_PODS_PER_VCPU", "0")
        .env_remove("NKPS_CONFIG")
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("pods_per_vcpu"), "Got: {}", stderr);
}

/// Test an unknown cluster name is rejected by argument parsing
#[test]
fn test_unknown_cluster_rejected() {
    let dir = TempDir::new().unwrap();
    let output = nkps(&dir, &["summary", "--cluster", "Staging"]);

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unknown cluster"), "Got: {}", stderr);
}

/// Test growth add picks the next open year and refuses taken years
#[test]
fn test_growth_add_and_remove() {
    let dir = TempDir::new().unwrap();

    let added = json_output(&dir, &["growth", "add", "--rate", "15"]);
    assert_eq!(added["year"], 2031);
    assert_eq!(added["rate"], 15.0);

    let output = nkps(&dir, &["growth", "add", "--year", "2026", "--rate", "5"]);
    assert!(!output.status.success(), "Taken year should be refused");

    let output = nkps(&dir, &["--yes", "growth", "remove", "2031"]);
    assert!(output.status.success(), "growth remove should succeed");

    let growth = json_output(&dir, &["growth", "list"]);
    assert_eq!(growth.as_array().unwrap().len(), 5);
}

/// Test workload update and removal
#[test]
fn test_workload_update_and_remove() {
    let dir = TempDir::new().unwrap();
    add_production_setup(&dir);

    let updated = json_output(&dir, &["workload", "update", "1", "--replicas", "5"]);
    assert_eq!(updated["replicas"], 5);
    assert_eq!(updated["name"], "api");

    let output = nkps(&dir, &["--yes", "workload", "remove", "1"]);
    assert!(output.status.success(), "workload remove should succeed");

    let output = nkps(&dir, &["--yes", "workload", "remove", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "Second removal should fail");
    assert!(stderr.contains("workload 1 not found"), "Got: {}", stderr);
}

/// Test license and project name settings persist
#[test]
fn test_settings_persist() {
    let dir = TempDir::new().unwrap();

    assert!(nkps(&dir, &["license", "set", "ultimate"]).status.success());
    assert!(nkps(&dir, &["name", "set", "Retail Platform"]).status.success());

    let license = json_output(&dir, &["license", "show"]);
    assert_eq!(license["license"], "Ultimate");

    let name = json_output(&dir, &["name", "show"]);
    assert_eq!(name["name"], "Retail Platform");
}

/// Test reset discards records and reseeds the project
#[test]
fn test_reset_reseeds_project() {
    let dir = TempDir::new().unwrap();
    add_production_setup(&dir);

    let output = nkps(&dir, &["--yes", "reset"]);
    assert!(output.status.success(), "reset should succeed");

    let workloads = json_output(&dir, &["workload", "list"]);
    assert!(workloads.as_array().unwrap().is_empty());

    let hardware = json_output(&dir, &["hardware", "list"]);
    assert_eq!(hardware.as_array().unwrap().len(), 1);
}

/// Test metrics are printed in the Prometheus text format
#[test]
fn test_metrics_export() {
    let dir = TempDir::new().unwrap();
    let output = nkps(&dir, &["metrics"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "metrics should succeed");
    assert!(stdout.contains("nkp_sizer_license_cores 32"));
    assert!(stdout.contains("nkp_sizer_supply"));
}
