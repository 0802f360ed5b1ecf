//! Field-name listing and decoding.

use csvmap::keys::{InstanceId, KeyEncoding, column_key};
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_keys_lists_fields_as_json() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="a\, b, c">"#).unwrap();

    let output = project.run_csvmap(&["keys", "-e", "q.html", "--format", "json"]).unwrap();
    output.assert_success();

    let table = project.read_json(&output.stdout);
    let instance = InstanceId::from_seed(r"a\, b, c");
    assert_eq!(table["instance"], instance.as_str());
    assert_eq!(table["columns"][0]["column"], "a, b");
    assert_eq!(table["columns"][1]["field"], column_key(&instance, "c", KeyEncoding::Base64).field_name());
}

#[test]
fn test_keys_text_output() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="id">"#).unwrap();

    project
        .csvmap()
        .args(["keys", "-e", "q.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File field:"))
        .stdout(predicate::str::contains("id →"));
}

#[test]
fn test_decode_round_trip_with_file_name_seed() {
    let project = TestProject::new().unwrap();
    let instance = InstanceId::from_seed("data.csv");
    let field = column_key(&instance, "Total Score", KeyEncoding::Hex).field_name();

    project
        .csvmap()
        .args(["keys", "--seed", "file-name", "--decode", &field])
        .assert()
        .success()
        .stdout(predicate::str::contains("column 'Total Score'"));
}

#[test]
fn test_decode_rejects_malformed_key() {
    let project = TestProject::new().unwrap();
    let field = format!("_single_csv_upload_{}_col_@@@", InstanceId::from_seed("x"));

    project
        .csvmap()
        .args(["keys", "--decode", &field])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid column key"));
}
