//! Integration tests for the entdiff CLI
//!
//! Tests end-to-end command behavior using the CLI binary.
//! Uses tempfile for isolated test directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the entdiff binary (built by cargo)
fn entdiff_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_entdiff"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run entdiff with the given args in the specified directory
fn run_entdiff(dir: &Path, args: &[&str]) -> Output {
    entdiff_binary()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute entdiff command")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write sample file");
    path
}

const OLD_SOURCE: &str = r#"/* Sample module.  */
#include <stdio.h>

#ifdef X
int
foo (void)
{
  return 1;
}
#endif

int counter;
"#;

const NEW_SOURCE: &str = r#"/* Sample module.  */
#include <stdio.h>
#define DEBUG 1

#ifdef X
int
foo (void)
{
  return 2;
}
#endif

int counter;
"#;

// ============================================================================
// General CLI Tests
// ============================================================================

#[test]
fn test_no_subcommand_prints_help() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_entdiff(temp_dir.path(), &[]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Usage"), "expected help, got: {}", out);
    assert!(out.contains("files"));
}

#[test]
fn test_version_flag() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_entdiff(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("entdiff "));
}

// ============================================================================
// Files Command Tests
// ============================================================================

#[test]
fn test_files_reports_entity_changes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "old.c", OLD_SOURCE);
    write_file(temp_dir.path(), "new.c", NEW_SOURCE);

    let output = run_entdiff(temp_dir.path(), &["files", "old.c", "new.c"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("old.c -> new.c: 1 added, 1 modified"), "got: {}", out);
    assert!(out.contains("\t[X](foo): Modified."));
    assert!(out.contains("\t(DEBUG): New."));
    assert!(!out.contains("counter"));
    assert!(!out.contains('\u{1b}'), "piped output must not be colored");
}

#[test]
fn test_files_identical_inputs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "a.c", OLD_SOURCE);

    let output = run_entdiff(temp_dir.path(), &["files", "a.c", "a.c"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "a.c -> a.c: no entity changes");
}

#[test]
fn test_files_changed_condition_is_remove_and_add() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "old.c", "#if CONST\nint bar (void) { return 0; }\n#endif\n");
    write_file(temp_dir.path(), "new.c", "#if CONST2\nint bar (void) { return 0; }\n#endif\n");

    let output = run_entdiff(temp_dir.path(), &["files", "old.c", "new.c"]);
    let out = stdout(&output);
    assert!(out.contains("\t[CONST](bar): Removed."));
    assert!(out.contains("\t[CONST2](bar): New."));
    assert!(!out.contains("Modified."));
}

#[test]
fn test_files_json_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "old.c", OLD_SOURCE);
    write_file(temp_dir.path(), "new.c", NEW_SOURCE);

    let output = run_entdiff(temp_dir.path(), &["--format", "json", "files", "old.c", "new.c"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
    assert_eq!(json["summary"]["modified"], 1);
    assert_eq!(json["summary"]["added"], 1);
    assert_eq!(json["changes"][0]["name"], "foo");
    assert_eq!(json["changes"][0]["prologue"][0], "X");
}

#[test]
fn test_files_malformed_directive_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "old.c", "#define\nint a;\n");
    write_file(temp_dir.path(), "new.c", "int a;\n");

    let output = run_entdiff(temp_dir.path(), &["files", "old.c", "new.c"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Malformed directive: #define"));
}

#[test]
fn test_files_missing_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_entdiff(temp_dir.path(), &["files", "nope.c", "nada.c"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to read nope.c"));
}

// ============================================================================
// Tree Command Tests
// ============================================================================

#[test]
fn test_tree_text_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "mod.c", OLD_SOURCE);

    let output = run_entdiff(temp_dir.path(), &["tree", "mod.c"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("mod.c\n"));
    assert!(out.contains("macro_include stdio.h"));
    assert!(out.contains("macro_conditional X"));
    assert!(out.contains("function_def foo (5 lines)"));
    assert!(out.contains("declaration counter"));
}

#[test]
fn test_tree_json_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "mod.c", "#ifndef GUARD\n#else\nint x;\n#endif\n");

    let output = run_entdiff(temp_dir.path(), &["tree", "mod.c", "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let children = json["root"]["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["name"], "!GUARD");
    assert_eq!(children[1]["name"], "!(!GUARD)");
    assert_eq!(children[1]["children"][0]["name"], "x");
}

#[test]
fn test_tree_nesting_limit_from_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), ".entdiffrc.toml", "[parser]\nmax_depth = 1\n");
    write_file(temp_dir.path(), "deep.c", "#if A\n#if B\nint x;\n#endif\n#endif\n");

    let output = run_entdiff(temp_dir.path(), &["tree", "deep.c"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nesting deeper than 1"));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_config_default_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), ".entdiffrc.toml", "[output]\nformat = \"json\"\n");
    write_file(temp_dir.path(), "a.c", "int a;\n");

    let output = run_entdiff(temp_dir.path(), &["tree", "a.c"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["path"], "a.c");

    // CLI flag wins over config
    let output = run_entdiff(temp_dir.path(), &["tree", "a.c", "--format", "text"]);
    assert!(stdout(&output).starts_with("a.c\n"));
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), ".entdiffrc.toml", "this is not toml [");
    write_file(temp_dir.path(), "a.c", "int a;\n");

    let output = run_entdiff(temp_dir.path(), &["tree", "a.c"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Failed to parse .entdiffrc.toml"));
    assert!(stdout(&output).starts_with("a.c\n"));
}

// ============================================================================
// Log Command Tests (require git)
// ============================================================================

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", dir)
        .args([
            "-c",
            "user.name=Ada Lovelace",
            "-c",
            "user.email=ada@example.org",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(output.status.success(), "git {:?} failed: {}", args, stderr(&output));
}

/// Repository with one base commit containing `foo.c`.
fn init_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    git(temp_dir.path(), &["init", "-q"]);
    write_file(temp_dir.path(), "foo.c", OLD_SOURCE);
    write_file(temp_dir.path(), "ChangeLog", "old entries\n");
    git(temp_dir.path(), &["add", "."]);
    git(temp_dir.path(), &["commit", "-q", "-m", "base"]);
    git(temp_dir.path(), &["tag", "base"]);
    temp_dir
}

#[test]
fn test_log_modified_file() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo();
    write_file(repo.path(), "foo.c", NEW_SOURCE);
    write_file(repo.path(), "ChangeLog", "new entries\n");
    write_file(repo.path(), "notes.txt", "hello\n");
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "-q", "-m", "change foo"]);

    let output = run_entdiff(repo.path(), &["log", "base", "HEAD"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("  Ada Lovelace  <ada@example.org>"), "got: {}", out);
    assert!(out.contains("\tCOMMIT: "));
    assert!(out.contains("\t* foo.c: Modified."));
    assert!(out.contains("\t[X](foo): Modified."));
    assert!(out.contains("\t(DEBUG): New."));
    assert!(out.contains("\t* notes.txt: New file."));
    assert!(!out.contains("ChangeLog"));
}

#[test]
fn test_log_exact_rename() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo();
    git(repo.path(), &["mv", "foo.c", "bar.c"]);
    git(repo.path(), &["commit", "-q", "-m", "rename"]);

    let output = run_entdiff(repo.path(), &["log", "base", "HEAD"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("\t* foo.c: Move to..."));
    assert!(out.contains("\t* bar.c: ...here."));
    assert!(!out.contains("): "), "exact rename must not list entities: {}", out);
}

#[test]
fn test_log_json_and_repo_flag() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo();
    fs::remove_file(repo.path().join("foo.c")).unwrap();
    git(repo.path(), &["add", "-A"]);
    git(repo.path(), &["commit", "-q", "-m", "delete"]);

    let elsewhere = TempDir::new().expect("Failed to create temp dir");
    let repo_arg = repo.path().to_str().unwrap();
    let output = run_entdiff(
        elsewhere.path(),
        &["log", "base", "HEAD", "--repo", repo_arg, "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["metadata"]["author_email"], "ada@example.org");
    assert_eq!(json[0]["files"][0]["path"], "foo.c");
    assert_eq!(json[0]["files"][0]["action"]["type"], "delete_file");
}

#[test]
#[cfg(unix)]
fn test_log_unknown_operation_exit_status() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo();
    fs::remove_file(repo.path().join("foo.c")).unwrap();
    std::os::unix::fs::symlink("ChangeLog.target", repo.path().join("foo.c")).unwrap();
    git(repo.path(), &["add", "-A"]);
    git(repo.path(), &["commit", "-q", "-m", "typechange"]);

    let output = run_entdiff(repo.path(), &["log", "base", "HEAD"]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Unknown change operation 'T'"));
}

#[test]
fn test_log_bad_revision() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = init_repo();
    let output = run_entdiff(repo.path(), &["log", "no-such-ref", "HEAD"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("git log"));
}
