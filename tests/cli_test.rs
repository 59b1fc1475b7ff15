//! CLI contract tests
//!
//! Runs the built binary against small temporary trees and checks the JSON
//! report, exit codes and the classify output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn codeweave_bin() -> &'static str {
    env!("CARGO_BIN_EXE_codeweave")
}

fn create_test_workspace() -> TempDir {
    let dir = tempfile::Builder::new().prefix("cwproj").tempdir().unwrap();
    let root = dir.path();
    for sub in ["src", "lib", "vendor"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    std::fs::write(
        root.join("src/main.c"),
        "// entry point\nint main(void) {\n    if (1 && 2) {\n        return 0;\n    }\n    return 1;\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("lib/util.py"),
        "def add(a, b):\n\n    # return self.total + b\n    return a + b\n",
    )
    .unwrap();
    std::fs::write(root.join("vendor/dep.c"), "int dep(void) { return 0; }\n").unwrap();
    std::fs::write(root.join("README.md"), "# demo\n").unwrap();
    dir
}

fn run_scan(path: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(codeweave_bin())
        .arg("scan")
        .arg(path)
        .args(["--format", "json", "--no-progress"])
        .args(args)
        .output()
        .expect("failed to run codeweave");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

fn file_keys(json: &serde_json::Value) -> Vec<String> {
    json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap().replace('\\', "/"))
        .collect()
}

#[test]
fn test_scan_json_report() {
    let dir = create_test_workspace();
    let (stdout, stderr, code) = run_scan(dir.path(), &[]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["report"]["status"], "succeeded");
    assert_eq!(json["report"]["total_files"], 2);

    // vendor/ is excluded by default and README.md is not source
    let mut keys = file_keys(&json);
    keys.sort();
    assert_eq!(keys, vec!["lib/util.py", "src/main.c"]);

    let metrics = &json["metrics"];
    assert_eq!(metrics["files"], 2.0);
    assert_eq!(metrics["packages"], 2.0);
    assert_eq!(metrics["lines"], 11.0);
    assert_eq!(metrics["lines_of_code"], 8.0);
    assert_eq!(metrics["commented_out_code_lines"], 1.0);
    assert_eq!(metrics["complexity"], 4.0);
}

#[test]
fn test_scan_respects_config_excludes() {
    let dir = create_test_workspace();
    std::fs::write(
        dir.path().join("codeweave.toml"),
        "[exclude]\npaths = [\"lib/**\"]\n",
    )
    .unwrap();

    let (stdout, stderr, code) = run_scan(dir.path(), &[]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(file_keys(&json), vec!["src/main.c"]);
}

#[test]
fn test_scan_parse_errors() {
    let dir = create_test_workspace();
    std::fs::write(dir.path().join("bad.c"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let (stdout, _, code) = run_scan(dir.path(), &[]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["report"]["status"], "completed_with_errors");
    assert_eq!(json["report"]["errors"].as_array().unwrap().len(), 1);

    let bad = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "bad.c")
        .unwrap();
    assert_eq!(bad["messages"][0]["rule"], "ParseError");

    // bad.c sorts first, so nothing else is scanned
    let (stdout, _, code) = run_scan(dir.path(), &["--fail-fast"]);
    assert_ne!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["report"]["status"], "failed");
    assert_eq!(json["report"]["scanned_files"], 1);
}

#[test]
fn test_scan_missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_scan(&dir.path().join("nope"), &[]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Path does not exist"), "stderr: {}", stderr);
}

#[test]
fn test_classify_code_only_from_stdin() {
    let mut child = Command::new(codeweave_bin())
        .args(["classify", "--code-only"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"int x = 1;\nhello world\nwhile (x) {\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["int x = 1;", "while (x) {"]);
}

#[test]
fn test_classify_file_scores_every_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snippet.py");
    std::fs::write(&path, "def f(x):\nsome prose here\n").unwrap();

    let output = Command::new(codeweave_bin())
        .arg("classify")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("code"));
    assert!(lines[1].contains("prose"));
}
