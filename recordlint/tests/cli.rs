//! End-to-end tests for the recordlint binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const REFERENCE_DATE: &str = "2024-06-30";

fn recordlint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_recordlint"))
        .args(args)
        .env_remove("RECORDLINT_FOUNDING_YEAR")
        .env_remove("RECORDLINT_PHONE_REGION")
        .env_remove("RECORDLINT_REFERENCE_DATE")
        .output()
        .expect("Failed to run recordlint")
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write CSV");
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const DUPLICATE_EMAILS: &str = "\
name,email,phone,age,join_date
Ann,ann@example.com,(201) 555-0123,34,2015-03-02
Bob,ANN@example.com,201-555-0199,41,2018-09-17
Cid,cid@example.com,201-555-0142,27,2020-11-23
";

const CLEAN: &str = "\
name,email,age,join_date
Ann,ann@example.com,34,2015-03-02
Bob,bob@example.com,41,2018-09-17
";

#[test]
fn test_cli_validate_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", DUPLICATE_EMAILS);

    let output = recordlint(&["validate", "--reference-date", REFERENCE_DATE, &input]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["summary"]["total_records"], 3);
    assert_eq!(report["summary"]["high_severity_issues"], 1);
    assert_eq!(report["validation_passed"], false);
    assert_eq!(
        report["detailed_issues"][0]["category"],
        "Duplicate Email Addresses"
    );
    assert_eq!(report["detailed_issues"][0]["affected_records"][0], 0);
    assert_eq!(report["detailed_issues"][0]["affected_records"][1], 1);
}

#[test]
fn test_cli_clean_input_passes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", CLEAN);

    let output = recordlint(&[
        "validate",
        "--fail-on-high",
        "--reference-date",
        REFERENCE_DATE,
        &input,
    ]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["summary"]["data_quality_score"], 100.0);
    assert_eq!(report["validation_passed"], true);
}

#[test]
fn test_cli_fail_on_high() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", DUPLICATE_EMAILS);

    let output = recordlint(&[
        "validate",
        "--fail-on-high",
        "--reference-date",
        REFERENCE_DATE,
        &input,
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_csv_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", DUPLICATE_EMAILS);
    let report_path = dir.path().join("issues.csv");

    let output = recordlint(&[
        "validate",
        "--format",
        "csv",
        "--output",
        report_path.to_str().unwrap(),
        "--reference-date",
        REFERENCE_DATE,
        &input,
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let content = std::fs::read_to_string(&report_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("category,severity,description,count,affected_percentage,recommendation")
    );
    assert!(lines.next().unwrap().starts_with("Duplicate Email Addresses,HIGH,"));
}

#[test]
fn test_cli_summary_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", DUPLICATE_EMAILS);

    let output = recordlint(&[
        "validate",
        "--format",
        "summary",
        "--reference-date",
        REFERENCE_DATE,
        &input,
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Data Quality Validation Report"));
    assert!(stdout.contains("Status:         FAILED"));
}

#[test]
fn test_cli_founding_year_flag() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", CLEAN);

    let output = recordlint(&[
        "validate",
        "--founding-year",
        "2016",
        "--reference-date",
        REFERENCE_DATE,
        &input,
    ]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(
        report["detailed_issues"][0]["category"],
        "Join Dates Before Company Founding (join_date)"
    );
    assert_eq!(report["detailed_issues"][0]["affected_records"][0], 0);
}

#[test]
fn test_cli_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", CLEAN);
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"company_founding_year": 2016, "reference_date": "2024-06-30"}"#,
    )
    .unwrap();

    let output = recordlint(&["validate", "--config", config.to_str().unwrap(), &input]);
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["summary"]["total_issues_found"], 1);
}

#[test]
fn test_cli_invalid_region() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", CLEAN);

    let output = recordlint(&["validate", "--phone-region", "XX-INVALID", &input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("phone_region"));
}

#[test]
fn test_cli_invalid_founding_year() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir, "people.csv", CLEAN);

    let output = recordlint(&["validate", "--founding-year", "12", &input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("company_founding_year"));
}

#[test]
fn test_cli_missing_input() {
    let missing = Path::new("/nonexistent/recordlint/people.csv");

    let output = recordlint(&["validate", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open"));
}

#[test]
fn test_cli_rules_listing() {
    let output = recordlint(&["rules"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Duplicate Email Addresses"));
    assert!(stdout.contains("Bulk Import Pattern Detection"));
    assert!(stdout.contains("Future Join Dates (per column)"));
}
