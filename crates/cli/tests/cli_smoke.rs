//! CLI smoke tests for elm-desktop-app.
//!
//! External tools are replaced with small shell scripts through the
//! `ELM_DESKTOP_APP_*` environment variables.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the elm-desktop-app binary, isolated from the user's
/// data directory.
fn app_cmd(temp: &TempDir) -> Command {
  let mut cmd = cargo_bin_cmd!("elm-desktop-app");
  cmd
    .env("XDG_DATA_HOME", temp.path().join("data"))
    .env("APPDATA", temp.path().join("data"))
    .env_remove("RUST_LOG");
  cmd
}

// =============================================================================
// Help & usage
// =============================================================================

#[test]
fn help_flag_works() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn no_command_prints_usage_and_succeeds() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn unknown_command_prints_usage_and_succeeds() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .arg("frobnicate")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();
  for cmd in &["init", "build", "run", "package"] {
    app_cmd(&temp)
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn host_is_hidden_from_help() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("host").not());
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_without_manifest_fails() {
  let temp = TempDir::new().unwrap();
  let project = temp.path().join("empty");
  std::fs::create_dir_all(&project).unwrap();

  app_cmd(&temp)
    .arg("build")
    .arg(&project)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("elm.json"));

  assert!(!project.join("elm-stuff").exists());
}

#[test]
fn package_rejects_unknown_target() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .arg("package")
    .arg(temp.path())
    .arg("--target")
    .arg("sparc-plan9")
    .assert()
    .failure()
    .stderr(predicate::str::contains("sparc-plan9"));
}

#[test]
fn invalid_tool_timeout_is_reported() {
  let temp = TempDir::new().unwrap();
  app_cmd(&temp)
    .arg("build")
    .arg(temp.path())
    .env("ELM_DESKTOP_APP_TOOL_TIMEOUT", "soon")
    .assert()
    .failure()
    .stderr(predicate::str::contains("ELM_DESKTOP_APP_TOOL_TIMEOUT"));
}

// =============================================================================
// init -> build with a fake compiler
// =============================================================================

#[cfg(unix)]
mod with_fake_elm {
  use super::*;
  use std::os::unix::fs::PermissionsExt;
  use std::path::{Path, PathBuf};

  const FAKE_ELM: &str = r#"#!/bin/sh
case "$1" in
  init)
    read answer
    mkdir -p src
    printf '%s' '{"type":"application","source-directories":["src"],"elm-version":"0.19.1","dependencies":{"direct":{"elm/browser":"1.0.2","elm/core":"1.0.5","elm/html":"1.0.0"},"indirect":{"elm/json":"1.1.3","elm/time":"1.0.0","elm/url":"1.0.0","elm/virtual-dom":"1.0.3"}},"test-dependencies":{"direct":{},"indirect":{}}}' > elm.json
    ;;
  make)
    out=""
    prev=""
    for arg in "$@"; do
      if [ "$prev" = "--output" ]; then out="$arg"; fi
      prev="$arg"
    done
    printf 'var Elm = {};' > "$out"
    ;;
esac
"#;

  fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  #[test]
  fn init_then_build_records_app_id_in_package_json() {
    let temp = TempDir::new().unwrap();
    let elm = write_script(&temp.path().join("bin"), "elm", FAKE_ELM);
    let project = temp.path().join("myapp");

    app_cmd(&temp)
      .arg("init")
      .arg(&project)
      .arg("my.app.id")
      .env("ELM_DESKTOP_APP_ELM", &elm)
      .assert()
      .success()
      .stdout(predicate::str::contains("my.app.id"));

    assert!(project.join("src").join("Main.elm").exists());
    let manifest: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(project.join("elm.json")).unwrap()).unwrap();
    assert_eq!(manifest["dependencies"]["direct"]["elm/json"], "1.1.3");

    app_cmd(&temp)
      .arg("build")
      .arg(&project)
      .env("ELM_DESKTOP_APP_ELM", &elm)
      .assert()
      .success()
      .stdout(predicate::str::contains("Built in"));

    let app_dir = project.join("elm-stuff").join("elm-desktop-app").join("app");
    let package: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(app_dir.join("package.json")).unwrap()).unwrap();
    assert_eq!(package["build"]["appId"], "my.app.id");
    assert!(app_dir.join("elm.js").exists());
    assert!(app_dir.join("index.js").exists());
  }

  #[test]
  fn init_refuses_to_overwrite_entry_without_force() {
    let temp = TempDir::new().unwrap();
    let elm = write_script(&temp.path().join("bin"), "elm", FAKE_ELM);
    let project = temp.path().join("myapp");
    std::fs::create_dir_all(project.join("src")).unwrap();
    std::fs::write(project.join("src").join("Main.elm"), "-- keep me").unwrap();

    app_cmd(&temp)
      .arg("init")
      .arg(&project)
      .env("ELM_DESKTOP_APP_ELM", &elm)
      .assert()
      .failure()
      .stderr(predicate::str::contains("--force"));

    assert_eq!(
      std::fs::read_to_string(project.join("src").join("Main.elm")).unwrap(),
      "-- keep me"
    );

    app_cmd(&temp)
      .arg("init")
      .arg(&project)
      .arg("--force")
      .env("ELM_DESKTOP_APP_ELM", &elm)
      .assert()
      .success();

    assert_ne!(
      std::fs::read_to_string(project.join("src").join("Main.elm")).unwrap(),
      "-- keep me"
    );
  }

  #[test]
  fn failing_compiler_exit_code_is_propagated() {
    let temp = TempDir::new().unwrap();
    let elm = write_script(&temp.path().join("bin"), "elm", FAKE_ELM);
    let broken = write_script(&temp.path().join("bin"), "broken-elm", "#!/bin/sh\nexit 3\n");
    let project = temp.path().join("myapp");

    app_cmd(&temp)
      .arg("init")
      .arg(&project)
      .arg("my.app.id")
      .env("ELM_DESKTOP_APP_ELM", &elm)
      .assert()
      .success();

    app_cmd(&temp)
      .arg("build")
      .arg(&project)
      .env("ELM_DESKTOP_APP_ELM", &broken)
      .assert()
      .code(3);
  }

  #[test]
  fn host_answers_load_requests() {
    let temp = TempDir::new().unwrap();
    let app_dir = temp.path().join("app");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("elm.json"), r#"{"app-settings": {"app-id": "my.app.id"}}"#).unwrap();
    let data = temp.path().join("data.json");
    std::fs::write(&data, "saved").unwrap();

    app_cmd(&temp)
      .arg("host")
      .arg(&app_dir)
      .arg(&data)
      .write_stdin("{\"channel\":\"load-user-data\"}\n")
      .assert()
      .success()
      .stdout(predicate::str::contains(r#"{"channel":"user-data-loaded","payload":"saved"}"#));
  }
}
