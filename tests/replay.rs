use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn telescriber_cmd() -> Command {
    let mut cmd = Command::cargo_bin("telescriber").expect("binary exists");
    // Point at a nonexistent config so runs never depend on the host's
    // config directory (absent file falls back to defaults).
    cmd.args(["--config", "/nonexistent/telescriber-config.toml"]);
    cmd
}

fn write_trace(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_prints_usage() {
    telescriber_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "replay gesture traces through the pipeline",
        ));
}

#[test]
fn draw_trace_commits_stroke_and_emits_create() {
    let temp = TempDir::new().unwrap();
    let trace = write_trace(
        &temp,
        "draw.jsonl",
        r#"{"kind":"TouchStart"}
{"kind":"Down","params":[100.0,100.0]}
{"kind":"Move","params":[110.0,100.0]}
{"kind":"Move","params":[120.0,110.0]}
{"kind":"TouchEnd"}
"#,
    );

    telescriber_cmd()
        .arg(&trace)
        .args(["--mode", "lines", "--dump-wire"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"create","id":0"#))
        .stdout(predicate::str::contains("1 annotation(s) in store"))
        .stdout(predicate::str::contains("#0: 100/100/110/100/120/110"));
}

#[test]
fn malformed_entries_are_rejected_without_aborting() {
    let temp = TempDir::new().unwrap();
    let trace = write_trace(
        &temp,
        "mixed.jsonl",
        r#"{"kind":"Down","params":[5.0]}
{"kind":"Down","params":[100.0,100.0]}
{"kind":"Move","params":[150.0,100.0]}
{"kind":"TouchEnd"}
"#,
    );

    telescriber_cmd()
        .arg(&trace)
        .args(["--mode", "lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 rejected)"))
        .stdout(predicate::str::contains("1 annotation(s) in store"));
}

#[test]
fn camera_keys_pan_and_reset() {
    let temp = TempDir::new().unwrap();
    let trace = write_trace(
        &temp,
        "camera.jsonl",
        r#"{"key":"6"}
{"key":"6"}
{"key":"6"}
"#,
    );

    telescriber_cmd()
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("translation (60.0, 0.0)"));

    let reset_trace = write_trace(
        &temp,
        "camera_reset.jsonl",
        r#"{"key":"6"}
{"key":"6"}
{"key":"6"}
{"key":"5"}
"#,
    );

    telescriber_cmd()
        .arg(&reset_trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("translation (0.0, 0.0)"))
        .stdout(predicate::str::contains("scale 1.00"));
}

#[test]
fn selection_trace_marks_lines_selected() {
    let temp = TempDir::new().unwrap();
    let trace = write_trace(
        &temp,
        "select.jsonl",
        r#"{"kind":"Down","params":[10.0,10.0]}
{"kind":"Move","params":[20.0,20.0]}
{"kind":"TouchEnd"}
{"mode":"select"}
{"kind":"TouchStart"}
{"kind":"Click","params":[0.0,0.0]}
{"kind":"MoveRight","params":[0.0,0.0]}
{"kind":"MoveRight","params":[40.0,0.0]}
{"kind":"MoveDown","params":[40.0,40.0]}
{"kind":"MoveLeft","params":[0.0,40.0]}
{"kind":"TouchEnd"}
"#,
    );

    telescriber_cmd()
        .arg(&trace)
        .args(["--mode", "lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 annotation(s) in store, 1 selected"));
}

#[test]
fn missing_trace_file_fails_with_context() {
    telescriber_cmd()
        .arg("/nonexistent/trace.jsonl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read trace"));
}

#[test]
fn unknown_mode_is_rejected() {
    let temp = TempDir::new().unwrap();
    let trace = write_trace(&temp, "empty.jsonl", "");

    telescriber_cmd()
        .arg(&trace)
        .args(["--mode", "scribble"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mode"));
}
