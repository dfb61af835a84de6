use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRIPT: &str = r#"{
  "width": 64,
  "height": 48,
  "steps": [
    { "op": "event", "action": "down", "x": 8, "y": 24, "pressure": 0.4, "tool": "stylus" },
    { "op": "event", "action": "move", "x": 32, "y": 24, "pressure": 0.6, "tool": "stylus" },
    { "op": "event", "action": "up", "x": 56, "y": 24, "tool": "stylus" },
    { "op": "set_color", "color": "red" },
    { "op": "event", "action": "down", "x": 32, "y": 4, "tool": "finger" },
    { "op": "event", "action": "up", "x": 32, "y": 44, "tool": "finger" },
    { "op": "undo" }
  ]
}"#;

fn inkslate_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("inkslate").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn inkslate_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    inkslate_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pressure-sensitive stroke engine"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn replay_writes_png() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.json");
    let output = temp.path().join("out.png");
    std::fs::write(&script, SCRIPT).unwrap();

    inkslate_cmd(&temp)
        .args(["--manufacturer", "Generic", "replay"])
        .arg(&script)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 5 events"))
        .stdout(predicate::str::contains("1 strokes"));

    let png = std::fs::read(&output).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn replay_missing_script_fails() {
    let temp = TempDir::new().unwrap();
    inkslate_cmd(&temp)
        .arg("replay")
        .arg(temp.path().join("missing.json"))
        .arg("-o")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}

#[test]
fn replay_requires_output() {
    let temp = TempDir::new().unwrap();
    inkslate_cmd(&temp)
        .args(["replay", "session.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn device_reports_vendor_backend() {
    let temp = TempDir::new().unwrap();
    inkslate_cmd(&temp)
        .args(["device", "--manufacturer", "OnePlus", "--model", "Pad 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OnePlus Pad 2"))
        .stdout(predicate::str::contains("Backend:    OPPO/OnePlus"));
}

#[test]
fn device_falls_back_to_generic() {
    let temp = TempDir::new().unwrap();
    inkslate_cmd(&temp)
        .args(["device", "--manufacturer", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend:    Generic"));
}

#[test]
fn config_file_overrides_device() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[device]\nmanufacturer = \"OPPO\"\nmodel = \"Find\"\n").unwrap();

    inkslate_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg("device")
        .assert()
        .success()
        .stdout(predicate::str::contains("OPPO Find"))
        .stdout(predicate::str::contains("OPPO/OnePlus"));
}
