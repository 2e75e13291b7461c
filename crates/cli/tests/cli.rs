use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const THEMES: &str = r#"[
  {
    "id": "t1",
    "name": "Workload challenges",
    "relatedCodes": ["c1", "c2", "c3"],
    "quotes": [{"text": "a"}, {"text": "b"}, {"text": "c"}],
    "prevalence": {"participants": 7, "totalParticipants": 10, "dataPoints": 30}
  },
  {
    "id": "t2",
    "name": "Coping strategies",
    "relatedCodes": ["c1", "c2", "c3", "c4"],
    "quotes": [{"text": "d"}, {"text": "e"}, {"text": "f"}],
    "prevalence": {"participants": 9, "totalParticipants": 10, "dataPoints": 40}
  },
  {
    "id": "t3",
    "name": "Wellbeing outcomes",
    "relatedCodes": ["c4", "c5"],
    "quotes": [{"text": "g"}, {"text": "h"}, {"text": "i"}],
    "prevalence": {"participants": 4, "totalParticipants": 10, "dataPoints": 20}
  }
]"#;

#[allow(deprecated)]
fn qualcode() -> Command {
    Command::cargo_bin("qualcode").expect("binary")
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn depth_reads_stdin() {
    let output = qualcode()
        .arg("depth")
        .arg("-")
        .write_stdin(r#"{"rootCodes": ["A"], "relationships": {"A": ["B", "C"], "B": ["D"]}}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["depth"], 3);
}

#[test]
fn cyclic_hierarchy_exits_with_error() {
    qualcode()
        .arg("depth")
        .arg("-")
        .write_stdin(r#"{"rootCodes": ["A"], "relationships": {"A": ["B"], "B": ["A"]}}"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: Malformed hierarchy"));
}

#[test]
fn theory_picks_most_prevalent_core() {
    let tmp = tempdir().unwrap();
    let themes = write(tmp.path(), "themes.json", THEMES);

    let output = qualcode().arg("theory").arg(&themes).output().unwrap();
    assert!(output.status.success());
    let theory = stdout_json(&output);
    assert_eq!(theory["coreCategory"], "Coping strategies");
    assert_eq!(theory["paradigmModel"]["phenomenon"], "Coping strategies");
    assert!(theory["storyline"]
        .as_str()
        .is_some_and(|s| s.contains("3 categories")));
}

#[test]
fn themes_require_positive_expected_count() {
    let tmp = tempdir().unwrap();
    let themes = write(tmp.path(), "themes.json", THEMES);

    qualcode()
        .args(["themes", &themes, "--expected", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    qualcode()
        .args(["themes", &themes, "--expected", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"saturationReached\": true"));
}

#[test]
fn extract_pulls_fenced_json_out_of_prose() {
    qualcode()
        .arg("extract")
        .arg("-")
        .write_stdin("Sure! Here you go:\n```json\n{\"ok\": true}\n```\nAnything else?")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));

    qualcode()
        .arg("extract")
        .arg("-")
        .write_stdin("I could not produce any output.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed upstream output"));
}

#[test]
fn empty_codebook_fails_fast() {
    qualcode()
        .arg("codebook")
        .arg("-")
        .write_stdin(r#"{"codes": []}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty input"));
}

#[test]
fn config_overrides_thresholds() {
    let tmp = tempdir().unwrap();
    let config = write(
        tmp.path(),
        "qualcode.toml",
        "[analysis]\ncodebook_threshold = 0.0\n",
    );
    let codebook = write(
        tmp.path(),
        "codebook.json",
        r#"{"codes": [{"id": "c1", "label": "x"}]}"#,
    );

    let output = qualcode()
        .args(["--config", &config, "codebook", &codebook])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["assessment"]["passesQualityThreshold"],
        true
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn guidance_prints_stage_text() {
    qualcode()
        .args([
            "guidance",
            "--methodology",
            "straussian",
            "--stage",
            "selective_coding",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("core category"));
}
