use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const EXPORT: &str = r#"{"data":{"workouts":[{"location":"park","elevationUp":{"qty":50,"units":"meters"},"stepCount":[{"date":"2024-10-01","source":"watch","qty":1000,"units":"steps"}]}],"metrics":[{"name":"heart_rate","units":"bpm","data":[{"date":"2024-10-01","source":"watch","qty":70}]}]}}"#;

const WEIGHT: &str = r#"{"data":{"metrics":[{"name":"weight","units":"kg","data":[{"date":"2024-10-02","qty":80}]}]}}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn normalize_export() -> Command {
    Command::cargo_bin("normalize-export").expect("normalize-export binary")
}

#[test]
fn directory_to_csv_writes_header_and_rows() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "a.json", EXPORT);
    write(&dir, "b.json", WEIGHT);

    let output = normalize_export()
        .arg(dir.path())
        .arg("--user")
        .arg("user1")
        .arg("--format")
        .arg("csv")
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "health_data_user,type,date,source,workout_qty,workout_units,elevation_qty,elevation_units,location,value,units,metric_name",
            "user1,workout,2024-10-01,watch,1000,steps,50,meters,park,,,",
            "user1,metric,2024-10-01,watch,,,,,,70,bpm,heart_rate",
            "user1,metric,2024-10-02,,,,,,,80,kg,weight",
        ]
    );
}

#[test]
fn single_file_to_jsonl_writes_one_line_per_record() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "export.json", EXPORT);

    let output = normalize_export()
        .arg(&path)
        .arg("--user")
        .arg("user7")
        .arg("--format")
        .arg("jsonl")
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "workout");
    assert_eq!(records[1]["type"], "metric");
    assert!(records.iter().all(|r| r["health_data_user"] == "user7"));
}

#[test]
fn json_output_can_go_to_a_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "export.json", EXPORT);
    let out = dir.path().join("records.json");

    normalize_export()
        .arg(&path)
        .arg("--user")
        .arg("user1")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let records: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(&out).expect("read output")).expect("json");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["metric_name"], "heart_rate");
    assert_eq!(records[1]["location"], Value::Null);
}

#[test]
fn missing_path_fails_with_error_message() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.json");

    let output = normalize_export()
        .arg(&missing)
        .arg("--user")
        .arg("user1")
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.starts_with("Error: Failed to read"), "{stderr}");
    assert_eq!(stderr.matches("os error").count(), 1, "{stderr}");
}

#[test]
fn malformed_file_in_directory_fails_the_run() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "a.json", EXPORT);
    write(&dir, "b.json", r#"{"data":{"workouts":[{"stepCount":"none"}]}}"#);

    normalize_export()
        .arg(dir.path())
        .arg("--user")
        .arg("user1")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: Malformed record"));
}
