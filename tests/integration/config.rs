//! Settings file lookup and overrides.

use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

const ELEMENT: &str = r#"<pl-single-csv-upload column-names="id" file-name="ids.csv">"#;

#[test]
fn test_local_config_changes_error_channel() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("csvmap.toml", "files_error_key = \"uploads\"\n").unwrap();

    let output = project.run_csvmap(&["parse", "-e", "q.html"]).unwrap();
    output.assert_success();
    let data = project.read_json(&output.stdout);
    assert_eq!(data["format_errors"]["uploads"], json!(["No submitted answer for single CSV upload."]));
    assert!(data["format_errors"].get("_files").is_none());
}

#[test]
fn test_env_config_and_template_override() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("conf/templates/plain.html.tera", "FILE={{ file_name }}").unwrap();
    let config = project.write_file("conf/settings.toml", "template = \"templates/plain.html.tera\"\n").unwrap();

    project
        .csvmap()
        .env("CSVMAP_CONFIG", &config)
        .args(["render", "-e", "q.html"])
        .assert()
        .success()
        .stdout(predicate::str::diff("FILE=ids.csv\n"));
}

#[test]
fn test_flag_wins_over_env() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("a.toml", "files_error_key = \"from_flag\"\n").unwrap();
    project.write_file("b.toml", "files_error_key = \"from_env\"\n").unwrap();

    let output = project
        .csvmap()
        .env("CSVMAP_CONFIG", "b.toml")
        .args(["--config", "a.toml", "parse", "-e", "q.html"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let data = project.read_json(&String::from_utf8_lossy(&output.stdout));
    assert!(data["format_errors"].get("from_flag").is_some());
}

#[test]
fn test_file_name_seed_keys() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("csvmap.toml", "seed = \"file-name\"\n").unwrap();

    let output = project.run_csvmap(&["keys", "-e", "q.html", "--format", "json"]).unwrap();
    output.assert_success();
    let table = project.read_json(&output.stdout);
    assert_eq!(table["instance"], csvmap::keys::InstanceId::from_seed("ids.csv").as_str());
    // Hex-encoded column names under the file-name seed.
    assert!(table["columns"][0]["field"].as_str().unwrap().ends_with("_col_6964"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();

    project
        .csvmap()
        .args(["--config", "missing.toml", "parse", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_invalid_config_reports_config_error() {
    let project = TestProject::new().unwrap();
    project.write_file("q.html", ELEMENT).unwrap();
    project.write_file("csvmap.toml", "seed = \"colour\"\n").unwrap();

    project
        .csvmap()
        .args(["parse", "-e", "q.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
