//! Integration tests for the smacheck binary.
//!
//! These tests verify end-to-end behavior including:
//! - Checklist evaluation from flags and input files
//! - Carrier pair lookups
//! - JSON output
//! - Usage counting

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any user config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("smacheck"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run smacheck");
    assert!(output.status.success(), "smacheck failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SMA early-suspicion screening checklist and carrier calculator",
        ));
}

#[test]
fn test_empty_checklist_is_low_priority() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("checklist")
        .assert()
        .success()
        .stdout(predicate::str::contains("[CHECK]"))
        .stdout(predicate::str::contains("Priority: observation"))
        .stdout(predicate::str::contains("0%"));
}

#[test]
fn test_severe_breathing_flags_high_priority() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["checklist", "--set", "resp_paradox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[HIGH]"))
        .stdout(predicate::str::contains("25%"))
        .stdout(predicate::str::contains("Shallow or paradoxical breathing"));
}

#[test]
fn test_checklist_json_output() {
    let temp_dir = setup_test_dir();

    let json = json_stdout(cli(temp_dir.path()).args([
        "checklist",
        "--set",
        "m0_head,exam_tongue_fascic",
        "--age-months",
        "5",
        "--sex",
        "m",
        "--json",
    ]));

    assert_eq!(json["symptom_count"], 2);
    assert_eq!(json["high_priority"], true);
    assert_eq!(json["suspicion_index"], 20);
    assert_eq!(json["risk_level"], "high");
    assert_eq!(json["patient"]["age"], "5 mo");
    assert_eq!(json["patient"]["sex"], "M");
    assert_eq!(
        json["grouped_findings"]["physical_exam"][0],
        "Tongue fasciculations"
    );
}

#[test]
fn test_checklist_from_json_file() {
    let temp_dir = setup_test_dir();
    let input = temp_dir.path().join("checklist.json");
    fs::write(
        &input,
        r#"{ "fam_smn1_carrier": true, "gestation": "preterm", "preterm_weeks": "34" }"#,
    )
    .unwrap();

    let json = json_stdout(
        cli(temp_dir.path())
            .arg("checklist")
            .arg("--input")
            .arg(&input)
            .arg("--json"),
    );

    assert_eq!(json["family_risk"], true);
    assert_eq!(json["suspicion_index"], 25);
    assert_eq!(json["patient"]["gestation"], "Preterm (34 wk)");
}

#[test]
fn test_checklist_from_toml_file_with_overrides() {
    let temp_dir = setup_test_dir();
    let input = temp_dir.path().join("checklist.toml");
    fs::write(&input, "tone_hypotonia = true\nm12_falls = true\n").unwrap();

    let json = json_stdout(
        cli(temp_dir.path())
            .arg("checklist")
            .arg("--input")
            .arg(&input)
            .args(["--clear", "m12_falls", "--json"]),
    );

    assert_eq!(json["symptom_count"], 1);
    assert_eq!(json["high_priority"], false);
}

#[test]
fn test_unknown_field_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["checklist", "--set", "not_a_field"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown checklist field"));
}

#[test]
fn test_set_and_clear_same_field_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["checklist", "--set", "m0_head", "--clear", "m0_head"])
        .assert()
        .failure();
}

#[test]
fn test_pair_carrier_carrier() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["pair", "--me", "carrier", "--partner", "carrier"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Affected [#####---------------]  25%"))
        .stdout(predicate::str::contains("Carrier  [##########----------]  50%"));
}

#[test]
fn test_pair_order_does_not_matter() {
    let temp_dir = setup_test_dir();

    let forward = json_stdout(cli(temp_dir.path()).args([
        "pair", "--me", "affected", "--partner", "carrier", "--json",
    ]));
    let backward = json_stdout(cli(temp_dir.path()).args([
        "pair", "--me", "carrier", "--partner", "affected", "--json",
    ]));

    for field in [
        "affected_probability",
        "carrier_probability",
        "healthy_probability",
        "summary_key",
        "advice_keys",
    ] {
        assert_eq!(forward[field], backward[field], "{}", field);
    }
    assert_eq!(forward["affected_probability"], 50);
}

#[test]
fn test_pair_unknown_status() {
    let temp_dir = setup_test_dir();

    let json = json_stdout(cli(temp_dir.path()).args([
        "pair", "--me", "unknown", "--partner", "healthy", "--json",
    ]));

    assert_eq!(json["summary_key"], "pair.summary.unknown");
    assert_eq!(json["affected_probability"], 0);
    assert_eq!(json["dominant"], serde_json::Value::Null);
}

#[test]
fn test_pair_invalid_status_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["pair", "--me", "sick", "--partner", "healthy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status"));
}

#[test]
fn test_fields_lists_every_section() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("Family history (red flags)"))
        .stdout(predicate::str::contains("feed_choke_weak_cry"))
        .stdout(predicate::str::contains("neuro_sensation_preserved"));
}

#[test]
fn test_usage_counted_per_run() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screening sessions run: 0"));

    cli(temp_dir.path()).arg("checklist").assert().success();
    cli(temp_dir.path())
        .args(["pair", "--me", "healthy", "--partner", "healthy"])
        .assert()
        .success();

    assert!(temp_dir.path().join("usage.json").exists());

    cli(temp_dir.path())
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screening sessions run: 2"));
}

#[test]
fn test_no_usage_flag_skips_counter() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["--no-usage", "checklist"])
        .assert()
        .success();

    assert!(!temp_dir.path().join("usage.json").exists());
}

#[test]
fn test_config_json_format() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config").join("smacheck");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[report]\nformat = \"json\"\n\n[usage]\nenabled = false\n",
    )
    .unwrap();

    let json = json_stdout(cli(temp_dir.path()).args([
        "pair", "--me", "healthy", "--partner", "healthy",
    ]));

    assert_eq!(json["healthy_probability"], 100);
    assert!(!temp_dir.path().join("usage.json").exists());
}

#[test]
fn test_config_init_writes_defaults() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config").join("smacheck").join("config.toml");

    cli(temp_dir.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("meter_width = 20"));
    assert!(contents.contains("session_key = \"sma-usage-incremented\""));

    // Existing file is kept unless forced
    cli(temp_dir.path())
        .args(["config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fs::write(&config_path, "[report]\nmeter_width = 40\n").unwrap();
    cli(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("meter_width = 40"));

    cli(temp_dir.path())
        .args(["config", "--init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&config_path)
        .unwrap()
        .contains("meter_width = 20"));
}
