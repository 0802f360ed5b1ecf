//! Checking sample CSV files against an element.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_check_accepts_matching_file() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="id, score">"#).unwrap();
    project.write_file("sample.csv", "\u{feff}id,score,comment\n1,5,ok\n").unwrap();

    project
        .csvmap()
        .args(["check", "-e", "q.html", "--csv", "sample.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("has all 2 required column(s)"));
}

#[test]
fn test_check_reports_missing_columns() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="id, score, rank">"#).unwrap();
    project.write_file("sample.csv", "id\n1\n").unwrap();

    project
        .csvmap()
        .args(["check", "-e", "q.html", "--csv", "sample.csv"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "The following columns are missing from the uploaded CSV file: score, rank",
        ))
        .stderr(predicate::str::contains("does not fit the element"));
}

#[test]
fn test_check_json_output() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="id">"#).unwrap();
    project.write_file("sample.csv", "id\n").unwrap();

    let output = project.run_csvmap(&["check", "-e", "q.html", "--csv", "sample.csv", "--format", "json"]).unwrap();
    output.assert_success();
    let report = project.read_json(&output.stdout);
    assert_eq!(report["valid"], true);
    assert_eq!(report["required_columns"], serde_json::json!(["id"]));
}

#[test]
fn test_check_missing_csv_file() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="id">"#).unwrap();

    project
        .csvmap()
        .args(["check", "-e", "q.html", "--csv", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
