//! Integration tests for the Prax Mapper CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BLOG: &str = r#"
[planner]
max_depth = 8

[models.User]
table = "users"
properties = { display_name = ["profile_picture"] }

[models.User.associations.posts]
kind = "one_to_many"
model = "Post"
key = "user_id"

[models.Post]
table = "posts"

[models.Post.associations.author]
kind = "many_to_one"
model = "User"
key = "user_id"
"#;

/// Get the prax-mapper binary
#[allow(deprecated)]
fn mapper_cmd() -> Command {
    Command::cargo_bin("prax-mapper").unwrap()
}

fn write_config(content: &str) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapper.toml");
    fs::write(&path, content).unwrap();
    let path = path.display().to_string();
    (dir, path)
}

#[test]
fn test_help_command() {
    mapper_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prax Mapper"))
        .stdout(predicate::str::contains("Usage: prax-mapper <COMMAND>"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("sql"));
}

#[test]
fn test_version_command() {
    mapper_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_plan_help() {
    mapper_cmd()
        .args(["plan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--fields"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_validate_valid_config() {
    let (_dir, path) = write_config(BLOG);

    mapper_cmd()
        .args(["validate", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resource graph is valid"))
        .stdout(predicate::str::contains("Models"));
}

#[test]
fn test_validate_empty_graph_warns() {
    let (_dir, path) = write_config("[planner]\nmax_depth = 8\n");

    mapper_cmd()
        .args(["validate", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("No models declared"));
}

#[test]
fn test_validate_missing_config() {
    let dir = TempDir::new().unwrap();

    mapper_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_validate_unknown_target() {
    let (_dir, path) = write_config(
        r#"
[models.User.associations.posts]
kind = "one_to_many"
model = "Post"
key = "user_id"
"#,
    );

    mapper_cmd()
        .args(["validate", "--config", &path])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Post"))
        .stderr(predicate::str::contains("validation errors"));
}

#[test]
fn test_plan_json() {
    let (_dir, path) = write_config(BLOG);

    let output = mapper_cmd()
        .args([
            "plan",
            "--config",
            &path,
            "--model",
            "User",
            "--fields",
            r#"{"display_name": true, "posts": {"title": true}}"#,
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["User"]["select"], serde_json::json!(["profile_picture"]));
    assert_eq!(plan["User"]["track"], serde_json::json!(["posts"]));
    assert_eq!(plan["Post"]["select"], serde_json::json!(["user_id", "title"]));
}

#[test]
fn test_plan_pretty() {
    let (_dir, path) = write_config(BLOG);

    mapper_cmd()
        .args(["plan", "-c", &path, "-m", "Post", "-f", r#"{"*": true}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selector Plan for Post"))
        .stdout(predicate::str::contains("*"));
}

#[test]
fn test_plan_invalid_fields() {
    let (_dir, path) = write_config(BLOG);

    mapper_cmd()
        .args(["plan", "-c", &path, "-m", "User", "-f", r#"{"id": false}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("P1004"));
}

#[test]
fn test_plan_unknown_model() {
    let (_dir, path) = write_config(BLOG);

    mapper_cmd()
        .args(["plan", "-c", &path, "-m", "Comment", "-f", r#"{"id": true}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("P7102"));
}

#[test]
fn test_plan_dependency_cycle() {
    let (_dir, path) = write_config(
        r#"
[models.User]
properties = { a = ["b"], b = ["a"] }
"#,
    );

    mapper_cmd()
        .args(["plan", "-c", &path, "-m", "User", "-f", r#"{"a": true}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("P7106"))
        .stderr(predicate::str::contains("User.a -> User.b -> User.a"));
}

#[test]
fn test_plan_environment_override() {
    let (_dir, path) = write_config(
        r#"
[models.User]
properties = { a = ["b"], b = ["c"], c = ["id"] }

[environments.strict.planner]
max_depth = 1
"#,
    );

    mapper_cmd()
        .args(["plan", "-c", &path, "-m", "User", "-f", r#"{"a": true}"#])
        .assert()
        .success();

    mapper_cmd()
        .args(["plan", "-c", &path, "-e", "strict", "-m", "User", "-f", r#"{"a": true}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("P7107"));
}

#[test]
fn test_sql_command() {
    let (_dir, path) = write_config(BLOG);

    mapper_cmd()
        .args([
            "sql",
            "-c",
            &path,
            "-m",
            "User",
            "-f",
            r#"{"id": true, "posts": {"title": true}}"#,
            "--limit",
            "10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("SELECT id FROM users LIMIT 10;"))
        .stdout(predicate::str::contains("SELECT user_id, title FROM posts;"))
        .stdout(predicate::str::contains("-- eager: posts"));
}
