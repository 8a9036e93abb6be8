use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

#[test]
fn compute_prints_text_report() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute")
        .args(["-A", "1 2 3", "-B", "2 3 4", "--op", "intersection"]);

    let output_pred = predicate::str::contains("Operation: INTERSECTION: A ∩ B")
        .and(predicate::str::contains("R = { 2, 3 }"))
        .and(predicate::str::contains("MEMBERSHIP TABLE"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn compute_exports_csv() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute")
        .args(["-A", "1 2", "-B", "2"])
        .args(["--op", "difference", "--first", "A", "--second", "B"])
        .args(["--format", "csv"]);

    cmd.assert()
        .success()
        .stdout("Element;A;B;Result\n1;1;0;1\n2;1;1;0\n");
}

#[test]
fn compute_evaluates_expression() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute")
        .args(["-n", "3", "-A", "1 2 3", "-B", "2 3 4", "-C", "3 5"])
        .args(["--expr", "(A ∪ B) \\ C", "--format", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"operation\": \"expression\""))
        .stdout(predicate::str::contains("\"1\",\n    \"2\",\n    \"4\""));
}

#[test]
fn malformed_expression_fails() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute").args(["-A", "1", "-B", "2", "--expr", "print(A)"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn unknown_format_lists_available_formats() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute").args(["-A", "1", "--format", "docx"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Format 'docx' not found"))
        .stderr(predicate::str::contains("pdf"));
}

#[test]
fn invalid_set_count_fails() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("regions").args(["-n", "5"]);
    cmd.assert().failure().code(1);
}

#[test]
fn formats_are_listed() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("formats");

    let output_pred = predicate::str::contains("Available formats:")
        .and(predicate::str::contains("csv"))
        .and(predicate::str::contains("yaml"))
        .and(predicate::str::contains("pdf"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn regions_marks_active_regions() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("regions")
        .args(["-A", "1 2", "-B", "2 3", "--op", "symdiff"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10 * A only"))
        .stdout(predicate::str::contains("11   A∩B"))
        .stdout(predicate::str::contains("{ 2 }"));
}

#[test]
fn diagram_plain_output() {
    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("diagram")
        .args(["-A", "1 2", "-B", "2 3", "--width", "60", "--height", "18", "--plain"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UNION: A ∪ B"))
        .stdout(predicate::str::contains("[1]"));
}

#[test]
fn save_then_compute_from_project() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("sets.json");

    let mut save = cargo_bin_cmd!("setlab");
    save.arg("save")
        .args(["-A", "a b", "-B", "b c", "--op", "intersection"])
        .arg("--output")
        .arg(&project);
    save.assert().success();
    assert!(fs::read_to_string(&project)
        .unwrap()
        .contains("\"operation\": \"intersection\""));

    let mut compute = cargo_bin_cmd!("setlab");
    compute
        .arg("compute")
        .arg("--project")
        .arg(&project)
        .args(["--format", "csv"]);
    compute
        .assert()
        .success()
        .stdout("Element;A;B;Result\na;1;0;0\nb;1;1;1\nc;0;1;0\n");
}

#[test]
fn compute_writes_pdf_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.pdf");

    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute")
        .args(["-A", "1", "-B", "2", "--format", "pdf"])
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let pdf = fs::read_to_string(&output).unwrap();
    assert!(pdf.starts_with("%PDF-1.4"));
    assert!(pdf.ends_with("%%EOF\n"));
}

#[test]
fn compute_long_expression_from_project() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("long.json");
    let expression = vec!["A"; 200_000].join(" ∪ ");
    let json = serde_json::json!({
        "num_sets": 2,
        "sets": {"A": ["1", "2"], "B": ["2", "3"]},
        "operation": "expression",
        "expression": expression,
    });
    fs::write(&project, json.to_string()).unwrap();

    let mut cmd = cargo_bin_cmd!("setlab");
    cmd.arg("compute")
        .arg("--project")
        .arg(&project)
        .args(["--format", "csv"]);
    cmd.assert()
        .success()
        .stdout("Element;A;B;Result\n1;1;0;1\n2;1;1;1\n3;0;1;0\n");
}
