//! Integration tests for the `ackrep` binary.

use assert_cmd::Command;
use predicates::prelude::*;

use ackrep_test_utils::RepoFixture;

fn ackrep(repo: &RepoFixture) -> Command {
    let mut cmd = Command::cargo_bin("ackrep").unwrap();
    cmd.current_dir(repo.root())
        .env_remove("ACKREP_CONFIG")
        .env_remove("ACKREP_CHECK_SANITY")
        .env_remove("ACKREP_DESCRIPTOR_FILENAME")
        .env_remove("ACKREP_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_repo() -> RepoFixture {
    let repo = RepoFixture::new();
    repo.entity("problem_classes/ode", "CLASS", "problem_class");
    repo.entity("docs/primer", "DOC01", "doc");
    repo.entity("docs/_template", "TMPL1", "doc");
    repo
}

#[test]
fn key_prints_five_alphanumerics() {
    let repo = RepoFixture::new();
    ackrep(&repo)
        .arg("key")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Z0-9]{5}\n$").unwrap());
}

#[test]
fn list_groups_entities_and_skips_templates() {
    let repo = sample_repo();
    ackrep(&repo)
        .args(["list", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("problem_class (1)"))
        .stdout(predicate::str::contains("doc (1)"))
        .stdout(predicate::str::contains("DOC01"))
        .stdout(predicate::str::contains("TMPL1").not());
}

#[test]
fn list_json_filtered_by_type() {
    let repo = sample_repo();
    let output = ackrep(&repo)
        .args(["list", ".", "--type", "doc", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let docs = json["doc"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["key"], "DOC01");
    assert_eq!(docs[0]["type"], "doc");
    assert!(json.get("problem_class").is_none());
}

#[test]
fn list_rejects_unknown_type_filter() {
    let repo = sample_repo();
    ackrep(&repo)
        .args(["list", ".", "--type", "system_model"])
        .assert()
        .failure();
}

#[test]
fn find_prints_descriptor() {
    let repo = sample_repo();
    ackrep(&repo)
        .args(["find", ".", "DOC01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pk: DOC01"))
        .stdout(predicate::str::contains("type: doc"));
}

#[test]
fn find_missing_key_fails() {
    let repo = sample_repo();
    ackrep(&repo)
        .args(["find", ".", "NOPE1"])
        .assert()
        .code(1);
}

#[test]
fn duplicate_keys_are_a_validation_error() {
    let repo = sample_repo();
    repo.entity("datasets/copy", "DOC01", "dataset");
    ackrep(&repo).args(["list", "."]).assert().code(5);
}

#[test]
fn show_check_reports_missing_fields() {
    let repo = RepoFixture::new();
    repo.write_file("docs/a/metadata.yml", "pk: DOC01\ntype: doc\n");

    ackrep(&repo)
        .args(["show", "docs/a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pk: DOC01"));

    ackrep(&repo)
        .args(["show", "docs/a", "--check"])
        .assert()
        .code(5);
}

#[test]
fn render_writes_derived_target() {
    let repo = sample_repo();
    repo.write_file("templates/template_README.md", "# {{name}}\n{{warning}}\n");

    ackrep(&repo)
        .args(["render", "templates/template_README.md", "--entity-dir", "docs/primer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"));

    let written = std::fs::read_to_string(repo.path("templates/README.md")).unwrap();
    assert!(written.starts_with("# Entity DOC01\n"));
    assert!(written.contains("autogenerated from the template: template_README.md"));
}

#[test]
fn render_bare_template_name_is_config_error() {
    let repo = RepoFixture::new();
    repo.write_file("template_x.md", "x");
    ackrep(&repo)
        .args(["render", "template_x.md"])
        .assert()
        .code(2);
}

#[test]
fn check_solution_reports_missing_script() {
    let repo = RepoFixture::new();
    repo.write_file(
        "solutions/s/metadata.yml",
        "pk: SOL01\ntype: problem_solution\nsolution_file: solution.py\n",
    );

    ackrep(&repo)
        .args(["check-solution", "solutions/s"])
        .assert()
        .code(5);

    repo.write_file("solutions/s/solution.py", "print('ok')\n");
    ackrep(&repo)
        .args(["check-solution", "solutions/s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("solution.py"));
}

#[test]
fn config_file_changes_descriptor_name() {
    let repo = RepoFixture::new();
    repo.write_file(".ackrep/config.yaml", "schema:\n  descriptor_filename: entity.yml\n");
    repo.write_file("docs/a/entity.yml", "pk: DOC01\ntype: doc\n");
    repo.entity("docs/b", "DOC02", "doc");

    ackrep(&repo)
        .args(["list", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("DOC01"))
        .stdout(predicate::str::contains("DOC02").not());
}

#[test]
fn invalid_config_exits_with_config_code() {
    let repo = RepoFixture::new();
    repo.write_file(".ackrep/config.yaml", "schema:\n  entity_types: [\n");
    ackrep(&repo).arg("key").assert().code(2);
}
