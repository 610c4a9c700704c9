//! End-to-end runs of the `ilr` binary against the sample reference directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn reference_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}

fn ilr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ilr"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run ilr")
}

fn write_batch(dir: &Path, ukprn: Option<i64>, uln: i64) -> PathBuf {
    let batch = serde_json::json!({
        "ukprn": ukprn,
        "learners": [{
            "learn_ref_number": "L0001",
            "uln": uln,
            "date_of_birth": "1988-12-25",
            "learning_deliveries": [{
                "aim_seq_number": 1,
                "learn_aim_ref": "60005415",
                "fund_model": 25,
                "learn_start_date": "2018-09-01",
                "del_loc_postcode": "B1 1AA",
                "learning_delivery_fams": [{ "marker_type": "LDM", "code": "034" }]
            }]
        }]
    });
    let path = dir.join("batch.json");
    std::fs::write(&path, batch.to_string()).expect("write batch");
    path
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn rules_lists_the_catalogue() {
    let output = ilr(&["rules"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LearnStartDate_14"));
    assert!(stdout.contains("FundModel_ContractAge"));
}

#[test]
fn reference_verifies_sample_directory() {
    let dir = reference_dir();
    let output = ilr(&["reference", dir.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary = json_stdout(&output);
    assert_eq!(summary["file_count"], 5);
    assert_eq!(summary["manifest_pins"]["academic_year"], 2018);
}

#[test]
fn errors_set_a_failing_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let batch = write_batch(temp.path(), Some(10000001), 1_234_567_890);
    let reference = reference_dir();
    let output = ilr(&[
        "validate",
        batch.to_str().unwrap(),
        "--reference-dir",
        reference.to_str().unwrap(),
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let report = json_stdout(&output);
    assert_eq!(report["summary"]["errors"], 1);
    assert_eq!(report["summary"]["warnings"], 1);
    assert_eq!(report["records_processed"], 1);
    let rules: Vec<&str> = report["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["rule_id"].as_str())
        .collect();
    assert!(rules.contains(&"ULN_03"));
    assert!(rules.contains(&"UKPRN_LegalOrgType"));
    assert!(!rules.contains(&"DateOfBirth_48"));
}

#[test]
fn warnings_alone_exit_cleanly() {
    let temp = tempfile::tempdir().expect("tempdir");
    let batch = write_batch(temp.path(), Some(10000001), 1_234_567_899);
    let reference = reference_dir();
    let output = ilr(&[
        "validate",
        batch.to_str().unwrap(),
        "--reference-dir",
        reference.to_str().unwrap(),
        "--workers",
        "2",
        "--no-cache",
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_stdout(&output)["summary"]["warnings"], 1);
}

#[test]
fn missing_provider_ukprn_fails_composition() {
    let temp = tempfile::tempdir().expect("tempdir");
    let batch = write_batch(temp.path(), None, 1_234_567_899);
    let reference = reference_dir();
    let output = ilr(&[
        "validate",
        batch.to_str().unwrap(),
        "--reference-dir",
        reference.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UKPRN"), "{stderr}");

    let output = ilr(&[
        "validate",
        batch.to_str().unwrap(),
        "--reference-dir",
        reference.to_str().unwrap(),
        "--ukprn",
        "10000002",
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_stdout(&output)["summary"]["warnings"], 0);
}
