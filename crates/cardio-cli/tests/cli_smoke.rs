//! CLI binary smoke tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

const CSV: &str = "\
age,sex,chest_pain,Heart Disease
63,Laki-laki,4,Presence
41,Perempuan,2,Absence
57,Laki-laki,4,Presence
45,Perempuan,3,Absence
70,Laki-laki,4,Presence
38,Perempuan,1,Absence
66,Perempuan,4,Presence
52,Laki-laki,3,Absence
59,Laki-laki,4,Presence
44,Perempuan,2,Absence
";

/// Dataset headers with the yes/no answers already coded 0/1.
const HEADER_CSV: &str = "\
Age,Sex,Chest pain type,Exercise angina,Heart Disease
63,1,4,1,Presence
41,0,2,0,Absence
57,1,4,1,Presence
45,0,3,0,Absence
70,1,4,0,Presence
38,0,1,0,Absence
66,0,4,1,Presence
52,1,3,0,Absence
59,1,4,1,Presence
44,0,2,0,Absence
";

fn cmd() -> Command {
    Command::cargo_bin("cardio").unwrap()
}

fn dataset(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("heart.csv");
    std::fs::write(&path, CSV).unwrap();
    path
}

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("predict"));
}

#[test]
fn form_lists_fields() {
    cmd()
        .arg("form")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise angina"))
        .stdout(predicate::str::contains("Chest pain type"))
        .stdout(predicate::str::contains("Perempuan | Laki-laki"));
}

#[test]
fn train_without_dataset_prints_template() {
    cmd()
        .arg("train")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nan_policy\""))
        .stdout(predicate::str::contains("\"test_fraction\""))
        .stderr(predicate::str::contains("No dataset given"));
}

#[test]
fn preview_shows_roles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dataset(&dir);
    cmd()
        .args(["preview", "--rows", "2", "--data"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("10 rows x 4 columns"))
        .stdout(predicate::str::contains("Heart Disease\tcategorical-label\t0"));
}

#[test]
fn train_reports_partition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dataset(&dir);
    cmd()
        .args(["train", "--normalize", "age", "--seed", "7", "--data"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("on 8 rows (2 held out)"));
}

#[test]
fn predict_prints_a_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = dataset(&dir);
    cmd()
        .args([
            "predict",
            "--normalize",
            "age",
            "--field",
            "age=61",
            "--field",
            "sex=Laki-laki",
            "--field",
            "chest_pain=4",
            "--data",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Prediction: "));
}

#[test]
fn predict_with_missing_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dataset(&dir);
    cmd()
        .args(["predict", "--field", "age=61", "--data"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn nonexistent_data_file_errors() {
    cmd()
        .args(["train", "--data", "/nonexistent/heart.csv"])
        .assert()
        .failure();
}

#[test]
fn predict_maps_form_answers_onto_coded_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heart.csv");
    std::fs::write(&path, HEADER_CSV).unwrap();
    cmd()
        .args([
            "predict",
            "--normalize",
            "Age",
            "--field",
            "age=61",
            "--field",
            "Sex=Laki-laki",
            "--field",
            "chest_pain_type=4",
            "--field",
            "Exercise angina=Ya",
            "--data",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Prediction: "));
}

#[test]
fn unreadable_config_fails_with_message() {
    cmd()
        .args(["train", "--config", "/nonexistent/config.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn pipeline_failure_exits_with_code_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dataset(&dir);
    cmd()
        .args(["predict", "--field", "age=61", "--data"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Prediction failed"));
}
