//! CLI E2E tests for the cputier binary.
//!
//! Validates:
//! - `features` JSON report shape
//! - `tier` selection for injected masks (flag and environment)
//! - `check` exit codes for present and absent features
//! - Error paths: malformed masks, unknown features, `--strict`

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

fn cputier() -> Command {
    let mut cmd = cargo_bin_cmd!("cputier");
    cmd.timeout(Duration::from_secs(30));
    cmd.env_remove("CPUTIER_HWCAP2");
    cmd.env_remove("RUST_LOG");
    cmd.env("CT_LOG", "off");
    cmd
}

fn json_stdout(args: &[&str]) -> Value {
    let output = cputier()
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("parse JSON stdout")
}

// ============================================================================
// features
// ============================================================================

#[test]
fn test_features_report_has_required_fields() {
    let json = json_stdout(&["--hwcap2", "0x100000", "features"]);
    assert!(json["schema_version"].is_string());
    assert!(json["generated_at"].is_string());

    let features = &json["features"];
    for field in [
        "source",
        "origin",
        "source_available",
        "hwcap2",
        "hwcap2_hex",
        "dotprod",
        "armv9",
        "i8mm",
        "tier",
        "candidates",
        "detected_at",
    ] {
        assert!(features.get(field).is_some(), "missing field '{}'", field);
    }
    assert_eq!(features["tier"], "dotprod");
    assert_eq!(features["origin"], "override");
    assert_eq!(features["dotprod"], true);
    assert_eq!(features["armv9"], false);
}

#[test]
fn test_default_command_is_features() {
    let json = json_stdout(&["--hwcap2", "2"]);
    assert_eq!(json["features"]["tier"], "armv9");
}

#[test]
fn test_features_without_override_reports_a_valid_tier() {
    let json = json_stdout(&["features"]);
    let tier = json["features"]["tier"].as_str().unwrap();
    assert!(["armv9", "dotprod", "baseline"].contains(&tier));
    if json["features"]["source_available"] == false {
        assert_eq!(tier, "baseline");
    }
}

#[test]
fn test_features_summary_format() {
    cputier()
        .args(["--hwcap2", "0", "-f", "summary", "features"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Tier: baseline"));
}

#[test]
fn test_features_markdown_format() {
    cputier()
        .args(["--hwcap2", "0x2002", "--format", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best tier: **armv9**"))
        .stdout(predicate::str::contains("| Int8 matrix multiply | yes |"));
}

// ============================================================================
// tier
// ============================================================================

#[test]
fn test_tier_scenarios() {
    for (mask, expected) in [("0x00000002", "armv9"), ("0x00100000", "dotprod"), ("0x0", "baseline")] {
        let json = json_stdout(&["--hwcap2", mask, "tier"]);
        assert_eq!(json["tier"], expected, "mask {}", mask);
        assert!(json.get("candidates").is_none());
    }
}

#[test]
fn test_tier_from_environment() {
    cputier()
        .env("CPUTIER_HWCAP2", "0x100000")
        .args(["-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("dotprod\n");
}

#[test]
fn test_flag_overrides_environment() {
    cputier()
        .env("CPUTIER_HWCAP2", "0x100000")
        .args(["--hwcap2", "2", "-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("armv9\n");
}

#[test]
fn test_flag_ignores_malformed_environment() {
    cputier()
        .env("CPUTIER_HWCAP2", "garbage")
        .args(["--hwcap2", "2", "-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("armv9\n");
}

#[test]
fn test_tier_chain() {
    let json = json_stdout(&["--hwcap2", "0x2", "tier", "--chain"]);
    assert_eq!(
        json["candidates"],
        serde_json::json!(["armv9", "dotprod", "baseline"])
    );

    cputier()
        .args(["--hwcap2", "0x100000", "-f", "summary", "tier", "--chain"])
        .assert()
        .success()
        .stdout("dotprod baseline\n");
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_present_exits_zero() {
    cputier()
        .args(["--hwcap2", "0x2000", "-f", "exitcode", "check", "i8mm"])
        .assert()
        .code(0)
        .stdout("");
}

#[test]
fn test_check_absent_exits_one() {
    let output = cputier()
        .args(["--hwcap2", "0x2000", "check", "armv9"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["feature"], "sve2");
    assert_eq!(json["present"], false);
}

#[test]
fn test_check_unknown_feature_fails() {
    cputier()
        .args(["check", "neon"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("unknown feature"));
}

// ============================================================================
// tiers / version
// ============================================================================

#[test]
fn test_tiers_lists_highest_first() {
    let json = json_stdout(&["tiers"]);
    let names: Vec<&str> = json["tiers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tier"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["armv9", "dotprod", "baseline"]);
    assert_eq!(json["tiers"][2]["requires"], Value::Null);
}

#[test]
fn test_version_json() {
    let json = json_stdout(&["version"]);
    assert_eq!(json["cputier_version"], env!("CARGO_PKG_VERSION"));
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_malformed_flag_rejected_by_parser() {
    cputier()
        .args(["--hwcap2", "0xzz", "tier"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("invalid capability mask"));
}

#[test]
fn test_help_exits_zero() {
    cputier()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_malformed_env_is_args_error() {
    let output = cputier()
        .env("CPUTIER_HWCAP2", "sve2")
        .arg("tier")
        .assert()
        .code(10)
        .get_output()
        .stderr
        .clone();
    let err: Value = serde_json::from_slice(&output).expect("structured error on stderr");
    assert_eq!(err["code"], 10);
    assert_eq!(err["category"], "input");
}

#[test]
fn test_strict_accepts_override() {
    cputier()
        .args(["--strict", "--hwcap2", "0", "-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("baseline\n");
}

#[cfg(not(target_arch = "aarch64"))]
#[test]
fn test_strict_fails_off_arm() {
    cputier()
        .args(["--strict", "-f", "summary", "tier"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("unsupported platform"));
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_quiet_and_ct_log_beat_rust_log() {
    cputier()
        .env("RUST_LOG", "info")
        .args(["-q", "--hwcap2", "2", "-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("armv9\n")
        .stderr("");
}

#[test]
fn test_rust_log_applies_without_level_overrides() {
    cputier()
        .env_remove("CT_LOG")
        .env("RUST_LOG", "cputier=info")
        .args(["--log-format", "jsonl", "--hwcap2", "2", "-f", "summary", "tier"])
        .assert()
        .success()
        .stdout("armv9\n")
        .stderr(predicate::str::contains("\"tier\":\"armv9\""));
}
