//! Configuration faults and their reporting.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_misspelled_attribute_gets_suggestion() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="a" file-nam="a.csv">"#).unwrap();

    project
        .csvmap()
        .args(["prepare", "-e", "q.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown attribute 'file-nam'"))
        .stderr(predicate::str::contains("Did you mean 'file-name'?"));
}

#[test]
fn test_missing_column_names() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload file-name="a.csv">"#).unwrap();

    project
        .csvmap()
        .args(["render", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required attribute 'column-names'"));
}

#[test]
fn test_trailing_escape_in_column_list() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="a, b\">"#).unwrap();

    project
        .csvmap()
        .args(["prepare", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid column list"));
}

#[test]
fn test_no_element_in_markup() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", "<pl-question-panel></pl-question-panel>").unwrap();

    project
        .csvmap()
        .args(["parse", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in markup"));
}

#[test]
fn test_malformed_question_data() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="a">"#).unwrap();
    project.write_file("data.json", "{ not json").unwrap();

    project
        .csvmap()
        .args(["parse", "-e", "q.html", "-d", "data.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid question data"));
}

#[test]
fn test_broken_override_template() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", r#"<pl-single-csv-upload column-names="a">"#).unwrap();
    project.write_file("broken.tera", "{% for x in %}").unwrap();
    project.write_file("csvmap.toml", "template = \"broken.tera\"\n").unwrap();

    project
        .csvmap()
        .args(["render", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template rendering failed"));
}
