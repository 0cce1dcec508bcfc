use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn valid_config_json() -> &'static str {
    r#"
{
  "version": 1,
  "locale": "en",
  "default_target": "06:45",
  "presets": [
    { "label": "breakfast", "time": "06:30" },
    { "label": "brunch", "time": "10:00" }
  ]
}
"#
}

#[test]
fn once_prints_evening_delay_in_chinese_by_default() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .env_remove("RUST_LOG")
        .args(["--once", "--at", "2024-01-01T22:00:00", "--target", "07:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024年1月1日 星期一"))
        .stdout(predicate::str::contains(
            "从现在到明天 07:00，共需定时 540 分钟",
        ));
}

#[test]
fn json_reports_duration_past_twenty_four_hours() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .args(["--json", "--at", "2024-01-01T06:30:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hours\": 24"))
        .stdout(predicate::str::contains("\"minutes\": 30"))
        .stdout(predicate::str::contains("\"total_minutes\": 1470"))
        .stdout(predicate::str::contains("\"target_time\": \"07:00\""));
}

#[test]
fn partial_minute_rounds_up_from_cli() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .args([
            "--json",
            "--at",
            "2024-01-01T23:59:30",
            "--target",
            "00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_minutes\": 1"));
}

#[test]
fn config_file_supplies_locale_default_target_and_presets() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("custom.json");
    fs::write(&config, valid_config_json()).expect("write config");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .arg("--config")
        .arg(&config)
        .args(["--once", "--at", "2024-01-01T22:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready at: tomorrow 06:45"))
        .stdout(predicate::str::contains("set the timer for 525 minutes"));

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .arg("--config")
        .arg(&config)
        .args(["--json", "--at", "2024-01-01T22:00:00", "--preset", "breakfast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active_preset\": \"breakfast\""))
        .stdout(predicate::str::contains("\"total_minutes\": 510"));
}

#[test]
fn default_config_file_in_working_directory_is_used() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("ricetimer.json"), valid_config_json()).expect("write config");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .args(["--once", "--at", "2024-01-01T22:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready at: tomorrow 06:45"));
}

#[test]
fn locale_flag_overrides_config() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("ricetimer.json"), valid_config_json()).expect("write config");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .args(["--once", "--locale", "zh", "--at", "2024-01-01T22:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("共需定时 525 分钟"));
}

#[test]
fn malformed_config_fails_with_clear_error() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("ricetimer.json");
    fs::write(&config, "{ not-valid-json ").expect("write invalid json");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .args(["--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn out_of_range_target_is_rejected() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .args(["--once", "--target", "24:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hour 24 out of range"));
}

#[test]
fn unknown_preset_is_rejected() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .args(["--once", "--preset", "midnight-snack"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset 'midnight-snack'"));
}

#[test]
fn watch_zero_is_rejected() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .args(["--watch", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--watch must be greater than zero"));
}

#[test]
fn watch_prints_one_snapshot_per_tick() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env("TZ", "UTC")
        .args([
            "--watch",
            "2",
            "--locale",
            "en",
            "--at",
            "2024-01-01T22:00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current time: 22:00:00"))
        .stdout(predicate::str::contains("Current time: 22:00:01"))
        .stdout(predicate::str::contains("set the timer for 540 minutes").count(2));
}

#[test]
fn invalid_log_level_is_rejected() {
    let dir = tempdir().expect("tempdir");

    let mut cmd = cargo_bin_cmd!("ricetimer");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["--once", "--log-level", "ricetimer=loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --log-level"));
}
