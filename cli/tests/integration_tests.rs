use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const TABLE_JSON: &str = r#"{"commands": [
    {"name": "BOA-APP-DATA", "alias": "copier"},
    {"name": "--count", "alias": "-c", "value_type": "int", "arity": 1, "short_help": "how many"},
    {"name": "--verbose", "alias": "-v", "value_type": "bool", "arity": 0, "flag": true},
    {"name": "--dest", "value_type": "string", "arity": 1, "required": true}
]}"#;

const TABLE_YAML: &str = "\
commands:
  - name: --level
    value_type: float
    arity: 1
  - name: files
    value_type: string_list
    arity: -100
";

const HELP_DOC: &str = "\
Usage: greet [flags]

Commands:
[name | -n] 1 : who to greet
Flags:
#[times] [1] : how many times
*[--quiet | -q] : say less
*[--loud] : say more
";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_boa"))
        .args(args)
        .output()
        .expect("failed to run boa")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn table_command_parses_json_table() {
    let dir = TempDir::new().unwrap();
    let table = write_file(&dir, "copier.json", TABLE_JSON);

    let output = run(&[
        "table",
        path_arg(&table),
        "--format",
        "json",
        "--",
        "-c",
        "3",
        "-v",
        "--dest",
        "/tmp/out",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["application"], "copier");
    assert_eq!(json["items"]["--count"]["value"], 3);
    assert_eq!(json["items"]["--verbose"]["value"], true);
    assert_eq!(json["items"]["--dest"]["value"], "/tmp/out");
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
}

#[test]
fn table_command_exits_2_on_parse_errors() {
    let dir = TempDir::new().unwrap();
    let table = write_file(&dir, "copier.json", TABLE_JSON);

    let output = run(&["table", path_arg(&table), "--format", "json", "--", "-c", "many"]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    let codes: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|error| error["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["kind_not_satisfiable", "missing_required_item"]);
}

#[test]
fn table_command_loads_yaml_by_extension() {
    let dir = TempDir::new().unwrap();
    let table = write_file(&dir, "levels.yml", TABLE_YAML);

    let output = run(&[
        "table",
        path_arg(&table),
        "--format",
        "json",
        "--",
        "files",
        "a",
        "b",
        "--",
        "--level",
        "0.5",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["items"]["files"]["value"], serde_json::json!(["a", "b"]));
    assert_eq!(json["items"]["--level"]["value"], 0.5);
}

#[test]
fn table_command_rejects_invalid_table() {
    let dir = TempDir::new().unwrap();
    let table = write_file(
        &dir,
        "dup.json",
        r#"{"commands": [{"name": "-a"}, {"name": "--all", "alias": "-a"}]}"#,
    );

    let output = run(&["table", path_arg(&table), "--", "-a"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: Failed to load"), "{stderr}");
}

#[test]
fn missing_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let output = run(&["table", path_arg(&missing)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn help_doc_command_parses_against_scanned_table() {
    let dir = TempDir::new().unwrap();
    let help = write_file(&dir, "greet.txt", HELP_DOC);

    let output = run(&["help-doc", path_arg(&help), "--", "-n", "joe", "times", "2", "-q"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Application: greet\n"), "{stdout}");
    assert!(stdout.contains("name     joe"), "{stdout}");
    assert!(stdout.contains("times    2"), "{stdout}");
    assert!(!stdout.contains("Errors:"));
}

#[test]
fn help_doc_command_reports_exclusive_conflict() {
    let dir = TempDir::new().unwrap();
    let help = write_file(&dir, "greet.txt", HELP_DOC);

    let output = run(&[
        "help-doc",
        path_arg(&help),
        "--format",
        "json",
        "--",
        "-n",
        "joe",
        "--loud",
        "-q",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output);
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["errors"][0]["code"], "exclusive_conflict");
}

#[test]
fn scan_output_reloads_as_table() {
    let dir = TempDir::new().unwrap();
    let help = write_file(&dir, "greet.txt", HELP_DOC);

    let scan = run(&["scan", path_arg(&help), "--format", "json"]);
    assert!(scan.status.success(), "{}", String::from_utf8_lossy(&scan.stderr));

    let table = dir.path().join("greet.json");
    fs::write(&table, &scan.stdout).unwrap();

    let output = run(&["table", path_arg(&table), "--format", "json", "--", "-n", "ann"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["application"], "greet");
    assert_eq!(json["items"]["name"]["value"], "ann");
}

#[test]
fn scan_rejects_malformed_document() {
    let dir = TempDir::new().unwrap();
    let help = write_file(&dir, "bad.txt", "no usage line\n\nCommands:\nfoo : f\n");

    let output = run(&["scan", path_arg(&help)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}

#[test]
fn config_file_changes_terminator() {
    let dir = TempDir::new().unwrap();
    let table = write_file(&dir, "levels.yaml", TABLE_YAML);
    let config = write_file(&dir, "boa.yaml", "terminator: \"::\"\n");

    let output = run(&[
        "table",
        path_arg(&table),
        "--config",
        path_arg(&config),
        "--format",
        "json",
        "--",
        "files",
        "a",
        "::",
        "--level",
        "2",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["items"]["files"]["value"], serde_json::json!(["a"]));
    assert_eq!(json["items"]["--level"]["value"], 2.0);
}
