use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn jsfold(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jsfold"));
    cmd.arg("--root").arg(root).env_remove("RUST_LOG");
    cmd
}

/// A small project: webroot/js holds the app, vendor/js holds shared libraries
fn sample_project(root: &Path) {
    write_file(
        &root.join("jsfold.json"),
        r#"{"searchPaths": ["WEBROOT/js", "APP/vendor/js"]}"#,
    );
    write_file(&root.join("vendor/js/jquery.js"), "var jQuery = {};\n");
    write_file(
        &root.join("vendor/js/date_utils.js"),
        "//= require <jquery>\nvar DateUtils = {};\n",
    );
    write_file(
        &root.join("webroot/js/app.js"),
        "//= require <jquery>\n//= require <DateUtils>\n//= require \"widgets/menu\"\napp();",
    );
    write_file(
        &root.join("webroot/js/widgets/menu.js"),
        "//= require <DateUtils>\nmenu();\n",
    );
}

#[test]
fn build_flattens_requires_in_order() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    jsfold(temp.path())
        .arg("build")
        .arg("webroot/js/app.js")
        .assert()
        .success()
        .stdout("var jQuery = {};\n\nvar DateUtils = {};\n\nmenu();\n\napp();\n");
}

#[test]
fn build_writes_output_file() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    jsfold(temp.path())
        .args(["build", "webroot/js/app.js", "-o", "dist/app.js"])
        .assert()
        .success()
        .stdout("");

    let bundle = fs::read_to_string(temp.path().join("dist/app.js")).unwrap();
    assert_eq!(bundle.matches("var jQuery").count(), 1);
    assert!(bundle.ends_with("app();\n"));
}

#[test]
fn build_strips_comments_when_asked() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("js/app.js"),
        "/*!\n * License\n */\n// setup\n/* block\nstill inside */\ncode(); // trailing\n",
    );

    jsfold(temp.path())
        .args(["--search-path", "APP/js", "--strip-comments"])
        .args(["build", "js/app.js"])
        .assert()
        .success()
        .stdout("/*!\n * License\n */\ncode(); // trailing\n\n");
}

#[test]
fn build_reports_unresolved_dependency() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("js/app.js"), "ok();\n//= require <Missing>\n");

    jsfold(temp.path())
        .args(["--search-path", "APP/js", "--no-color", "build", "js/app.js"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("could not locate file for 'Missing'"))
        .stderr(predicate::str::contains("app.js"));
}

#[test]
fn empty_search_paths_are_rejected() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("jsfold.json"), r#"{"searchPaths": []}"#);
    write_file(&temp.path().join("app.js"), "app();\n");

    jsfold(temp.path())
        .args(["--no-color", "build", "app.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("searchPaths is empty"));
}

#[test]
fn missing_search_directory_fails() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("app.js"), "//= require <lib>\n");

    jsfold(temp.path())
        .args(["--search-path", "APP/nope", "--no-color", "build", "app.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search path not found"));
}

#[test]
fn deps_lists_inclusion_order() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    let assert = jsfold(temp.path())
        .args(["deps", "webroot/js/app.js", "--hash", "sha1"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let paths: Vec<_> = items
        .iter()
        .map(|v| v["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "webroot/js/app.js",
            "vendor/js/jquery.js",
            "vendor/js/date_utils.js",
            "webroot/js/widgets/menu.js",
        ]
    );

    assert_eq!(items[0]["source_mode"], "entry");
    assert_eq!(items[2]["data"]["requested"], "DateUtils");
    assert_eq!(items[2]["range"]["start"], 2);
    assert_eq!(items[3]["source_mode"], "relative");
    assert_eq!(items[3]["data"]["quote"], "quoted");
    assert_eq!(items[3]["data"]["required_by"], "webroot/js/app.js");
    assert_eq!(items[1]["meta"]["hash"].as_str().unwrap().len(), 40);
}

#[test]
fn resolve_through_search_paths() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    let assert = jsfold(temp.path())
        .args(["resolve", "DateUtils"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["path"], "vendor/js/date_utils.js");
    assert_eq!(items[0]["data"]["filename"], "date_utils.js");
    assert_eq!(items[0]["data"]["exists"], true);
}

#[test]
fn resolve_relative_to_file() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    let assert = jsfold(temp.path())
        .args(["resolve", "SubMenu", "--from", "webroot/js/widgets/menu.js"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["path"], "webroot/js/widgets/sub_menu.js");
    assert_eq!(items[0]["source_mode"], "relative");
    assert_eq!(items[0]["data"]["exists"], false);
}

#[test]
fn index_lists_search_path_files() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    let assert = jsfold(temp.path())
        .args(["index", "--format", "raw"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "vendor/js/date_utils.js",
            "vendor/js/jquery.js",
            "webroot/js/app.js",
        ]
    );
}

#[test]
fn explicit_config_file() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("conf/bundle.json"),
        r#"{"searchPaths": ["APP/lib"], "stripComments": true}"#,
    );
    write_file(&temp.path().join("lib/util.js"), "// util\nutil();\n");
    write_file(&temp.path().join("main.js"), "//= require <util>\nmain();\n");

    jsfold(temp.path())
        .args(["--config", "conf/bundle.json", "build", "main.js"])
        .assert()
        .success()
        .stdout("util();\n\nmain();\n\n");
}

#[test]
fn verbose_logs_to_stderr() {
    let temp = tempdir().unwrap();
    sample_project(temp.path());

    jsfold(temp.path())
        .args(["-v", "build", "webroot/js/app.js"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Including"));
}
