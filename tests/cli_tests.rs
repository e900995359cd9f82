use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), "{}\n").unwrap();
    fs::create_dir_all(dir.path().join("packages/backend/src")).unwrap();
    fs::create_dir_all(dir.path().join("packages/frontend/src")).unwrap();
    fs::write(dir.path().join("packages/backend/src/a.txt"), "hello").unwrap();
    fs::write(dir.path().join("packages/frontend/src/app.ts"), "app\n").unwrap();
    dir
}

fn projsplit() -> Command {
    let mut cmd = Command::cargo_bin("projsplit").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("PROJSPLIT_CONFIG");
    cmd
}

#[test]
fn test_splits_into_working_directory() {
    let dir = project();

    projsplit()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Project root:"))
        .stdout(predicate::str::contains("✅ Backend concatenated to backend_all.txt"))
        .stdout(predicate::str::contains("✅ Frontend concatenated to frontend_all.txt"));

    let backend = fs::read_to_string(dir.path().join("backend_all.txt")).unwrap();
    assert!(backend.contains("\n\n&^&^&^&^&^&^ packages/backend/src/a.txt &^&^&^&^&^&^\nhello"));

    let frontend = fs::read_to_string(dir.path().join("frontend_all.txt")).unwrap();
    assert!(frontend.contains("packages/frontend/src/app.ts"));
    assert!(!frontend.contains("a.txt"));
}

#[test]
fn test_missing_marker_fails_without_outputs() {
    let dir = TempDir::new().unwrap();

    projsplit()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No package.json found"));

    assert!(!dir.path().join("backend_all.txt").exists());
    assert!(!dir.path().join("frontend_all.txt").exists());
}

#[test]
fn test_root_flag_and_custom_outputs() {
    let dir = project();
    let out = TempDir::new().unwrap();
    let backend = out.path().join("api.txt");
    let frontend = out.path().join("web.txt");

    projsplit()
        .arg("--root")
        .arg(dir.path())
        .arg("--backend-output")
        .arg(&backend)
        .arg("--frontend-output")
        .arg(&frontend)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(fs::read_to_string(&backend).unwrap().ends_with("hello"));
    assert!(fs::read_to_string(&frontend).unwrap().ends_with("app\n"));
}

#[test]
fn test_exclude_flag_replaces_defaults() {
    let dir = project();
    fs::create_dir_all(dir.path().join("packages/backend/dist")).unwrap();
    fs::write(dir.path().join("packages/backend/dist/bundle.js"), "bundle").unwrap();

    projsplit()
        .current_dir(dir.path())
        .args(["-x", "dist", "-q"])
        .assert()
        .success();

    let backend = fs::read_to_string(dir.path().join("backend_all.txt")).unwrap();
    assert!(!backend.contains("bundle"));
    assert!(backend.contains("a.txt"));
}

#[test]
fn test_config_file_in_root_is_used() {
    let dir = project();
    fs::write(
        dir.path().join("projsplit.toml"),
        "backend_output = \"server.txt\"\n",
    )
    .unwrap();

    projsplit()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend concatenated to server.txt"));

    assert!(dir.path().join("server.txt").exists());
    assert!(!dir.path().join("backend_all.txt").exists());
}

#[test]
fn test_invalid_config_reports_error() {
    let dir = project();
    fs::write(dir.path().join("projsplit.toml"), "bogus_key = 1\n").unwrap();

    projsplit()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_dry_run_and_report() {
    let dir = project();
    let report = dir.path().join("report.json");

    projsplit()
        .current_dir(dir.path())
        .arg("--dry-run")
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!dir.path().join("backend_all.txt").exists());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["backend"]["files"], 1);
    assert_eq!(json["frontend"]["files"], 1);
}

#[test]
fn test_init_writes_default_config() {
    let dir = TempDir::new().unwrap();

    projsplit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("projsplit.toml")).unwrap();
    assert!(content.contains("packages/backend"));
    assert!(content.contains("node_modules"));

    projsplit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_check_shows_routing_without_writing() {
    let dir = project();

    projsplit()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved configuration"))
        .stdout(predicate::str::contains("Backend:  1 files"));

    assert!(!dir.path().join("backend_all.txt").exists());
}

#[test]
fn test_shared_output_path_is_rejected() {
    let dir = project();

    projsplit()
        .current_dir(dir.path())
        .args(["--backend-output", "all.txt", "--frontend-output", "./all.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("both resolve to"));

    assert!(!dir.path().join("all.txt").exists());
}
