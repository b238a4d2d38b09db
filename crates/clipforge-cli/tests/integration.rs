use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clipforge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clipforge").unwrap();
    cmd.current_dir(dir.path())
        .env("CLIPFORGE_DATA_DIR", dir.path());
    cmd
}

const KEBAB: &str = r#"{"name":"kebab-case"}"#;

// ---------------------------------------------------------------------------
// clipforge transforms
// ---------------------------------------------------------------------------

#[test]
fn transforms_lists_registry() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .arg("transforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("kebab-case"))
        .stdout(predicate::str::contains("wrap-text"))
        .stdout(predicate::str::contains("remove-wrapping"));
}

#[test]
fn transforms_json_output() {
    let dir = TempDir::new().unwrap();
    let output = clipforge(&dir)
        .args(["transforms", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(rows.as_array().unwrap().len() > 20);
    assert!(rows[0]["key"].is_string());
}

// ---------------------------------------------------------------------------
// clipforge apply
// ---------------------------------------------------------------------------

#[test]
fn apply_single_operation() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", KEBAB, "--stdin", "--stdout"])
        .write_stdin("Hello World")
        .assert()
        .success()
        .stdout("hello-world\n");
}

#[test]
fn apply_replays_in_order() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args([
            "apply",
            r#"{"name":"wrap-text","params":[10]}"#,
            r#"{"name":"prefix-lines","params":["> "]}"#,
            "--stdin",
            "--stdout",
        ])
        .write_stdin("hello world foo")
        .assert()
        .success()
        .stdout("> hello\n> world foo\n");
}

#[test]
fn apply_without_operations_fails() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", "--stdin", "--stdout"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no operations"));
}

#[test]
fn apply_unknown_transform_fails() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", r#"{"name":"bogus"}"#, "--stdin", "--stdout"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown transform"));
}

#[test]
fn apply_rejects_malformed_operation() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", "not-json", "--stdin", "--stdout"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid operation"));
}

#[test]
fn apply_caches_last_for_replay() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", KEBAB, "--stdin", "--stdout"])
        .write_stdin("Hello World")
        .assert()
        .success();

    // The cached list replays against fresh input.
    clipforge(&dir)
        .args(["apply", "--last", "--stdin", "--stdout"])
        .write_stdin("Foo Bar")
        .assert()
        .success()
        .stdout("foo-bar\n");
}

#[test]
fn apply_last_without_cache_fails() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", "--last", "--stdin", "--stdout"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached operation list"));
}

#[test]
fn apply_json_summary() {
    let dir = TempDir::new().unwrap();
    let output = clipforge(&dir)
        .args(["apply", KEBAB, "--stdin", "--stdout", "--json"])
        .write_stdin("Hello World")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["steps"], 1);
    assert_eq!(summary["output"], "hello-world");
}

// ---------------------------------------------------------------------------
// clipforge preset
// ---------------------------------------------------------------------------

#[test]
fn preset_save_list_show_apply_delete() {
    let dir = TempDir::new().unwrap();

    clipforge(&dir)
        .args([
            "preset",
            "save",
            "cleanup",
            r#"{"name":"trim-each-line"}"#,
            KEBAB,
        ])
        .assert()
        .success();

    clipforge(&dir)
        .args(["preset", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleanup"))
        .stdout(predicate::str::contains("2"));

    clipforge(&dir)
        .args(["preset", "show", "cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kebab-case"));

    clipforge(&dir)
        .args(["apply", "--preset", "cleanup", "--stdin", "--stdout"])
        .write_stdin("  Hello World  ")
        .assert()
        .success()
        .stdout("hello-world\n");

    clipforge(&dir)
        .args(["preset", "delete", "cleanup", "--yes"])
        .assert()
        .success();

    clipforge(&dir)
        .args(["preset", "show", "cleanup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("preset not found"));
}

#[test]
fn preset_save_rejects_invalid_name() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["preset", "save", "Bad Name", KEBAB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid name"));
}

#[test]
fn preset_save_from_last() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", KEBAB, "--stdin", "--stdout"])
        .write_stdin("Hello World")
        .assert()
        .success();

    clipforge(&dir)
        .args(["preset", "save", "from-last", "--last"])
        .assert()
        .success();

    clipforge(&dir)
        .args(["preset", "show", "from-last"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kebab-case"));
}

#[test]
fn preset_delete_missing_fails() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["preset", "delete", "ghost", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("preset not found"));
}

#[test]
fn apply_missing_preset_fails() {
    let dir = TempDir::new().unwrap();
    clipforge(&dir)
        .args(["apply", "--preset", "ghost", "--stdin", "--stdout"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("preset not found"));
}

// ---------------------------------------------------------------------------
// replay determinism
// ---------------------------------------------------------------------------

#[test]
fn replay_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    let ops = [
        r#"{"name":"trim-each-line"}"#,
        r#"{"name":"wrap-text","params":[10]}"#,
        r#"{"name":"prefix-lines","params":["> "]}"#,
    ];

    let mut outputs = Vec::new();
    for _ in 0..3 {
        let output = clipforge(&dir)
            .arg("apply")
            .args(ops)
            .args(["--stdin", "--stdout"])
            .write_stdin("  hello world foo  ")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        outputs.push(output);
    }
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}
