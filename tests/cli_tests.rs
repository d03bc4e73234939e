//! End-to-end tests of the `u-meeting` binary.

use std::io::Write;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn run_with(contents: &str) -> Output {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    Command::new(env!("CARGO_BIN_EXE_u-meeting"))
        .arg(file.path())
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_fallback_run() {
    let input = json!({
        "solverConfig": { "strategy": "none" },
        "problemData": {
            "requests": [
                { "id": "r1", "importance": 90 },
                { "id": "r2", "importance": 50 }
            ],
            "hosts": [ { "id": "h1", "name": "Dr. Park" } ]
        }
    });
    let output = run_with(&input.to_string());
    assert!(output.status.success());

    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "FALLBACK");
    assert_eq!(doc["energy"], -140.0);
    assert_eq!(doc["schedule"][0]["requestId"], "r1");
    assert_eq!(doc["schedule"][0]["date"], "2025-11-15");
    assert_eq!(doc["schedule"][0]["startTime"], "09:00");
    assert_eq!(doc["schedule"][1]["startTime"], "10:00");
    assert_eq!(doc["success_rate"], 100.0);
}

#[test]
fn test_solver_run() {
    let input = json!({
        "solverConfig": { "annealing": { "numReads": 2, "numSweeps": 100 } },
        "problemData": {
            "requests": [
                { "id": "r1", "importanceScore": 70, "expertise": ["AI"] },
                { "id": "r2", "importanceScore": 40, "requiredExpertise": ["Law"] }
            ],
            "hosts": [
                { "id": "h1", "expertise": ["AI"] },
                { "id": "h2", "expertise": ["Law"] }
            ]
        }
    });
    let output = run_with(&input.to_string());
    assert!(output.status.success());

    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "SUCCESS");
    assert_eq!(doc["quantum_backend"], "simulated_annealing");
    assert_eq!(doc["active_assignments"], 2);
    assert_eq!(doc["quboStats"]["totalVariables"], 224);
    assert_eq!(doc["metrics"]["totalRequests"], 2);
}

#[test]
fn test_logs_stay_off_stdout() {
    let output = run_with(r#"{"problemData":{"requests":[],"hosts":[]}}"#);
    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["schedule"], json!([]));
    assert_eq!(doc["success_rate"], 0.0);
}

#[test]
fn test_invalid_document_still_exits_zero() {
    let output = run_with("this is not json");
    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "ERROR");
    assert!(doc["error"].is_string());
}

#[test]
fn test_missing_field_is_error_result() {
    let output = run_with(r#"{"problemData":{"hosts":[{"id":"h1"}]}}"#);
    assert!(output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "ERROR");
    assert!(doc["error"].as_str().unwrap().contains("requests"));
}

#[test]
fn test_missing_file_exits_nonzero() {
    let output = Command::new(env!("CARGO_BIN_EXE_u-meeting"))
        .arg("/nonexistent/input.json")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "ERROR");
    assert!(doc["error"].as_str().unwrap().contains("failed to read input file"));
}
