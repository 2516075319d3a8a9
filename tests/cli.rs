use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECTANGLE_SCRIPT: &str = r#"[
    { "event": "tool", "tool": "rectangle" },
    { "event": "style", "color": "red", "width": 4 },
    { "event": "down", "x": 10, "y": 10 },
    { "event": "move", "x": 50, "y": 40 },
    { "event": "up", "x": 50, "y": 40 },
    { "event": "tool", "tool": "pen" },
    { "event": "down", "x": 5, "y": 55 },
    { "event": "move", "x": 55, "y": 55 },
    { "event": "up", "x": 55, "y": 55 },
    { "event": "undo" },
    { "event": "redo" }
]"#;

fn lumina_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lumina-draw").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("WAYLAND_DISPLAY");
    cmd
}

#[test]
fn help_prints_about() {
    let temp = TempDir::new().unwrap();
    lumina_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Raster annotation surface"));
}

#[test]
fn no_script_prints_usage() {
    let temp = TempDir::new().unwrap();
    lumina_cmd(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("--script gestures.json"));
}

#[test]
fn script_replay_writes_png() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("gestures.json");
    let output = temp.path().join("frame.png");
    std::fs::write(&script, RECTANGLE_SCRIPT).unwrap();

    lumina_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .args(["--width", "64", "--height", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 11 event(s), history 2/2"));

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn async_restore_replay_matches_history() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("gestures.json");
    let output = temp.path().join("frame.png");
    std::fs::write(&script, RECTANGLE_SCRIPT).unwrap();

    lumina_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .args(["--width", "64", "--height", "64", "--async-restore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("history 2/2"));
    assert!(output.exists());
}

#[test]
fn malformed_script_fails() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("bad.json");
    std::fs::write(&script, r#"[{ "event": "wiggle" }]"#).unwrap();

    lumina_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(temp.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse script"));
}

#[test]
fn unknown_background_mode_fails() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("empty.json");
    std::fs::write(&script, "[]").unwrap();

    lumina_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .args(["--background", "plaid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --background"));
}

#[test]
fn init_config_writes_once() {
    let temp = TempDir::new().unwrap();
    lumina_cmd(&temp)
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    assert!(temp.path().join("lumina-draw/config.toml").exists());

    lumina_cmd(&temp)
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn dump_config_schema_prints_json() {
    Command::cargo_bin("dump_config_schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"properties\""));
}
