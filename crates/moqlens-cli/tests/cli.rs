use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("moqlens"))
}

#[test]
fn help_covers_validate_and_demo() {
    cmd().arg("validate").arg("--help").assert().success();
    cmd().arg("demo").arg("--help").assert().success();
}

#[test]
fn stdout_outputs_json_report() {
    let assert = cmd()
        .arg("validate")
        .arg("030507")
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(value["report_version"], 1);
    assert_eq!(value["tool"]["name"], "moqlens");
    let record = &value["messages"][0];
    assert_eq!(record["hex"], "030507");
    assert_eq!(record["report"]["outcome"], "decoded");
    assert_eq!(record["report"]["message"]["kind"], "subscribe");
    assert_eq!(record["report"]["message"]["request_id"], 5);
    assert_eq!(record["report"]["message"]["track_alias"], 7);
}

#[test]
fn hex_input_allows_whitespace() {
    let assert = cmd()
        .arg("validate")
        .arg("01 01 01 01 05 2f 74 65 73 74")
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    let message = &value["messages"][0]["report"]["message"];
    assert_eq!(message["kind"], "client_setup");
    assert_eq!(message["versions"][0], 1);
    assert_eq!(message["params"][0]["param_type"], 1);
    assert_eq!(message["params"][0]["value"], "/test");
}

#[test]
fn invalid_hex_shows_error_and_hint() {
    cmd()
        .arg("validate")
        .arg("03xz")
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn odd_hex_digit_count_is_rejected() {
    cmd()
        .arg("validate")
        .arg("035")
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("odd number of hex digits"));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("validate")
        .arg("030507")
        .arg("--stdout")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_written_to_file() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("validate")
        .arg("030507")
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let contents = std::fs::read_to_string(&report).expect("read report");
    let value: Value = serde_json::from_str(&contents).expect("valid json");
    assert_eq!(value["messages"][0]["report"]["outcome"], "decoded");
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("validate")
        .arg("030507")
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn file_input_validates_one_message_per_line() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("messages.hex");
    std::fs::write(&input, "030507\n\n# comment\n01 01 01 01 05 2f 74 65 73 74\n")
        .expect("write input");

    let assert = cmd()
        .arg("validate")
        .arg("--file")
        .arg(&input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["input"]["messages"], 2);
    assert_eq!(value["messages"][0]["report"]["message"]["kind"], "subscribe");
    assert_eq!(
        value["messages"][1]["report"]["message"]["kind"],
        "client_setup"
    );
}

#[test]
fn missing_input_file_shows_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.hex");

    cmd()
        .arg("validate")
        .arg("--file")
        .arg(&missing)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn strict_fails_on_undecodable_message() {
    cmd()
        .arg("validate")
        .arg("ff")
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("decode failures detected"));
}

#[test]
fn strict_passes_on_clean_message() {
    cmd()
        .arg("validate")
        .arg("030507")
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn list_failures_names_the_message() {
    cmd()
        .arg("validate")
        .arg("ff")
        .arg("--stdout")
        .arg("--list-failures")
        .assert()
        .success()
        .stderr(contains("Decode failures:").and(contains("unknown control message type")));
}

#[test]
fn demo_prints_all_sample_reports() {
    cmd()
        .arg("demo")
        .assert()
        .success()
        .stdout(
            contains("SUBSCRIBE: request_id=5, track_alias=7")
                .and(contains("CLIENT_SETUP"))
                .and(contains("SERVER_SETUP")),
        );
}

#[test]
fn demo_json_outputs_report_envelope() {
    let assert = cmd().arg("demo").arg("--json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["input"]["source"], "demo");
    assert_eq!(value["messages"].as_array().map(Vec::len), Some(3));
}
