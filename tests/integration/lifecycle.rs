//! Prepare, render and parse across consecutive requests.

use csvmap::keys::InstanceSeed;
use csvmap::test_utils::{ElementFixture, SubmissionFixture, encode_csv};
use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

const ELEMENT: &str = r#"<pl-single-csv-upload column-names="student, score" file-name="grades.csv"></pl-single-csv-upload>"#;

#[test]
fn test_prepare_registers_columns() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();

    let output = project.run_csvmap(&["prepare", "--element", "q.html"]).unwrap();
    output.assert_success();

    let data = project.read_json(&output.stdout);
    assert_eq!(data["params"]["_required_column_names"], json!(["student", "score"]));
    assert_eq!(data["params"]["_single_csv_upload_file_names"], json!(["grades.csv"]));
}

#[test]
fn test_render_contains_field_names() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    let config = ElementFixture::with_file_name("student, score", "grades.csv").config(InstanceSeed::ColumnNames);

    let mut cmd = project.csvmap();
    cmd.args(["render", "-e", "q.html"]);
    let mut assert = cmd.assert().success();
    assert = assert.stdout(predicate::str::contains(format!(r#"name="{}""#, config.keys().file_field())));
    for key in config.keys().columns() {
        assert = assert.stdout(predicate::str::contains(format!(r#"id="{}-select""#, key.field_name())));
    }
    assert.stdout(predicate::str::contains("PLSingleCsvUpload"));
}

#[test]
fn test_render_outside_question_panel_prints_nothing() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("data.json", r#"{"panel": "submission"}"#).unwrap();

    project
        .csvmap()
        .args(["render", "-e", "q.html", "-d", "data.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_submit_then_render_restores_answer() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    let config = ElementFixture::with_file_name("student, score", "grades.csv").config(InstanceSeed::ColumnNames);

    let csv = "Name,Points\nada,10\n";
    let submission = SubmissionFixture::new(config.clone())
        .csv(csv)
        .select("student", "Name")
        .select("score", "Points");
    let data_path = submission.write_to(project.project_path()).unwrap();

    let output = project
        .run_csvmap(&["parse", "-e", "q.html", "-d", data_path.to_str().unwrap(), "--strict"])
        .unwrap();
    output.assert_success();

    let parsed = project.read_json(&output.stdout);
    assert_eq!(
        parsed["submitted_answers"],
        json!({
            "grades.csv": {
                "content": encode_csv(csv),
                "column_names": {"student": "Name", "score": "Points"}
            }
        })
    );

    // The next request renders from the stored answer.
    project.write_file("parsed.json", &output.stdout).unwrap();
    let rendered = project.run_csvmap(&["render", "-e", "q.html", "-d", "parsed.json"]).unwrap();
    rendered
        .assert_success()
        .assert_stdout_contains(&encode_csv(csv))
        .assert_stdout_contains(&format!(r#""{}":"Points""#, config.keys().column("score").field_name()));

    // Parsing the stored answer again leaves it untouched.
    let again = project.run_csvmap(&["parse", "-e", "q.html", "-d", "parsed.json", "--strict"]).unwrap();
    again.assert_success();
    assert_eq!(project.read_json(&again.stdout)["submitted_answers"], parsed["submitted_answers"]);
}

#[test]
fn test_defects_are_reported_on_channel() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    let config = ElementFixture::with_file_name("student, score", "grades.csv").config(InstanceSeed::ColumnNames);

    let data_path = SubmissionFixture::new(config)
        .csv("Name,Points\n")
        .select("student", "Name")
        .select("score", "Total")
        .write_to(project.project_path())
        .unwrap();

    let output = project.run_csvmap(&["parse", "-e", "q.html", "-d", data_path.to_str().unwrap()]).unwrap();
    output.assert_success();
    let parsed = project.read_json(&output.stdout);
    assert_eq!(
        parsed["format_errors"]["_files"],
        json!(["The following columns are missing from the uploaded CSV file: Total"])
    );

    let strict = project
        .run_csvmap(&["parse", "-e", "q.html", "-d", data_path.to_str().unwrap(), "--strict"])
        .unwrap();
    strict.assert_failure().assert_stderr_contains("Submission rejected");
}

#[test]
fn test_parse_without_data_marks_empty() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();

    let output = project.run_csvmap(&["parse", "-e", "q.html"]).unwrap();
    output.assert_success();
    let parsed = project.read_json(&output.stdout);
    assert_eq!(parsed["submitted_answers"]["grades.csv"], json!({}));
    assert_eq!(parsed["format_errors"]["_files"], json!(["No submitted answer for single CSV upload."]));
}
