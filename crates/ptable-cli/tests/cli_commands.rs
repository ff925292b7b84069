use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ptable(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ptable-rs"))
        .args(args)
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("ptable-rs should run")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("report should be readable");
    serde_json::from_str(&content).expect("report should be valid JSON")
}

#[test]
fn table_command_repairs_input_and_writes_report() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("heat.json");
    let report = temp.path().join("out/report.json");
    write_file(&input, r#"{ "Fe": [1, 2, null], "O": [4, 5, 6] }"#);

    let output = ptable(
        &["table", "heat.json", "--report", "out/report.json"],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Elements: 2"), "stdout: {stdout}");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("NaN found"),
        "anomaly warning should be logged"
    );

    let parsed = read_json(&report);
    let fe = parsed["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .find(|row| row["element"] == "Fe")
        .expect("Fe row should exist");
    assert_eq!(fe["values"], serde_json::json!([1.0, 2.0, 1.5]));
    assert_eq!(parsed["anomalies"]["Fe"], serde_json::json!(["nan"]));
    assert_eq!(parsed["summary"]["vmax"], 6.0);
    assert_eq!(parsed["color_bounds"]["lower"], 1.0);
}

#[test]
fn table_command_applies_config_drop_and_percent_mode() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(
        &temp.path().join("heat.json"),
        r#"{ "index": ["H", "He", "Li"], "data": [1, 3, 100] }"#,
    );
    write_file(
        &temp.path().join("options.json"),
        r#"{ "check_missing": false }"#,
    );

    let output = ptable(
        &[
            "table",
            "heat.json",
            "--config",
            "options.json",
            "--drop",
            "Li",
            "--heat-mode",
            "percent",
            "--report",
            "report.json",
        ],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed = read_json(&temp.path().join("report.json"));
    assert_eq!(parsed["rows"].as_array().map(Vec::len), Some(2));
    assert_eq!(parsed["summary"]["vmin"], 25.0);
    assert_eq!(parsed["summary"]["vmax"], 75.0);
}

#[test]
fn out_of_range_atomic_number_exits_with_input_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(&temp.path().join("heat.json"), r#"{ "200": 0 }"#);

    let output = ptable(&["table", "heat.json"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.ATOMIC_NUMBER_RANGE]"), "stderr: {stderr}");
    assert!(stderr.contains("FATAL EXIT CODE: 2"), "stderr: {stderr}");
}

#[test]
fn missing_input_file_exits_with_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = ptable(&["table", "absent.json"], temp.path());

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("IO.INPUT_READ"));
}

#[test]
fn log_scale_with_fraction_mode_is_rejected() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(&temp.path().join("heat.json"), r#"{ "H": 1, "He": 2 }"#);

    let output = ptable(
        &["table", "heat.json", "--heat-mode", "fraction", "--log"],
        temp.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("INPUT.LOG_HEAT_MODE"));
}

#[test]
fn count_command_prints_reduced_counts() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(
        &temp.path().join("formulas.txt"),
        "# phosphates\nFe4 P4 O16\nFe4 P4 O16\n",
    );

    let output = ptable(
        &[
            "count",
            "Fe2 O3",
            "--file",
            "formulas.txt",
            "--mode",
            "reduced",
            "--no-fill",
        ],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("counts should be printed as JSON");
    assert_eq!(
        parsed,
        serde_json::json!({ "O": 11.0, "P": 2.0, "Fe": 4.0 })
    );
}

#[test]
fn count_with_misspelled_exclude_exits_with_input_error() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = ptable(&["count", "Fe2O3", "--exclude", "Oo"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.EXCLUDE_ELEMENTS] Unexpected symbol(s) Oo"));
    assert!(stderr.contains("FATAL EXIT CODE: 2"));
    assert!(output.stdout.is_empty());
}

#[test]
fn count_without_formulas_is_a_usage_error() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = ptable(&["count"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("INPUT.CLI_USAGE"));
}

#[test]
fn elements_command_lists_the_whole_table() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = ptable(&["elements"], temp.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 118);
    assert!(stdout.lines().next().is_some_and(|line| line.contains("Hydrogen")));
    assert!(stdout.contains("Og"));
}

#[test]
fn help_exits_zero() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = ptable(&["--help"], temp.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("table"));
}
