//! Test utilities for elm-desktop-lib.
//!
//! Helpers for faking the external tools the pipeline invokes.

use std::path::{Path, PathBuf};

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  let mut perms = std::fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(&path, perms).unwrap();
  path
}

/// A fake `elm` that writes a bundle to the path following `--output`.
///
/// `elm init` answers by writing the manifest the real scaffolder writes,
/// with `elm/json` only as an indirect dependency.
#[cfg(unix)]
pub fn fake_elm(dir: &Path) -> PathBuf {
  fake_tool(
    dir,
    "elm",
    r#"
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
"#,
  )
}

/// A fake `elm` whose `make` always fails with exit code 1.
#[cfg(unix)]
pub fn failing_elm(dir: &Path) -> PathBuf {
  fake_tool(dir, "elm", "echo 'COMPILE ERROR' >&2\nexit 1")
}

/// Minimal project manifest with an app id.
pub fn project_manifest(app_id: &str) -> String {
  format!(
    r#"{{
  "type": "application",
  "source-directories": ["src"],
  "elm-version": "0.19.1",
  "dependencies": {{
    "direct": {{ "elm/core": "1.0.5", "avh4/elm-desktop-app": "1.0.0" }},
    "indirect": {{}}
  }},
  "app-settings": {{ "app-id": "{}" }}
}}
"#,
    app_id
  )
}
