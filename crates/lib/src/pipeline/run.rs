use std::ffi::OsString;

use tracing::info;

use super::{BuildError, BuildOptions, ProjectLayout, build};
use crate::consts::LAUNCH_MARKER_ENV;
use crate::tools::Tool;

/// Build, then launch the GUI host against the build directory.
///
/// `extra_args` are forwarded positionally after the build directory, so
/// `run . notes.json` starts the app with `notes.json` as its data file.
/// Returns the host's exit code.
pub async fn run(options: &BuildOptions, extra_args: &[OsString]) -> Result<i32, BuildError> {
  let result = build(options).await?;
  let layout = &result.layout;

  let electron = match &options.tools.electron {
    Some(electron) => electron.clone(),
    None => {
      ensure_node_module(options, layout, "electron").await?;
      layout.installed_electron()
    }
  };

  info!(app_id = %result.app_id, "launching");
  let status = Tool::new(&electron)
    .arg(&layout.app_dir)
    .args(extra_args)
    .env(LAUNCH_MARKER_ENV, "1")
    .status()
    .await?;

  Ok(status.code().unwrap_or(1))
}

/// Install an npm package into the build directory unless it is already
/// there.
pub(super) async fn ensure_node_module(
  options: &BuildOptions,
  layout: &ProjectLayout,
  package: &str,
) -> Result<(), BuildError> {
  if layout.node_module(package).is_dir() {
    return Ok(());
  }

  info!(package = %package, "installing into build directory");
  Tool::new(&options.tools.npm)
    .args(["install", "--save-dev", package])
    .current_dir(&layout.app_dir)
    .timeout(options.tools.timeout)
    .run()
    .await?;
  Ok(())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use super::*;
  use crate::tools::{ToolConfig, ToolError};
  use crate::util::testutil::{fake_elm, fake_tool, project_manifest};
  use std::fs;
  use std::path::PathBuf;
  use tempfile::TempDir;

  fn setup(temp: &TempDir) -> (PathBuf, PathBuf) {
    let project = temp.path().join("app");
    fs::create_dir_all(project.join("src")).unwrap();
    fs::write(project.join("elm.json"), project_manifest("run.test")).unwrap();
    let bin = temp.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    (project, bin)
  }

  #[tokio::test]
  async fn forwards_args_and_marker_to_host() {
    let temp = TempDir::new().unwrap();
    let (project, bin) = setup(&temp);
    let record = temp.path().join("host-args.txt");
    let host = fake_tool(
      &bin,
      "electron",
      &format!(
        "printf '%s\\n' \"$@\" \"marker=${}\" > {}\nexit 4",
        LAUNCH_MARKER_ENV,
        record.display()
      ),
    );

    let mut options = BuildOptions::new(&project, ToolConfig {
      elm: fake_elm(&bin),
      electron: Some(host),
      ..ToolConfig::default()
    });
    options.support_dir = temp.path().join("support");

    let code = run(&options, &[OsString::from("data.json")]).await.unwrap();

    assert_eq!(code, 4);
    let recorded = fs::read_to_string(&record).unwrap();
    let lines: Vec<_> = recorded.lines().collect();
    assert!(lines[0].ends_with("elm-stuff/elm-desktop-app/app"));
    assert_eq!(lines[1], "data.json");
    assert_eq!(lines[2], "marker=1");
  }

  #[tokio::test]
  async fn installs_electron_when_missing() {
    let temp = TempDir::new().unwrap();
    let (project, bin) = setup(&temp);
    // fake npm creates the package and its .bin launcher
    let npm = fake_tool(
      &bin,
      "npm",
      "mkdir -p node_modules/electron node_modules/.bin\nprintf '#!/bin/sh\\nexit 0\\n' > node_modules/.bin/electron\nchmod +x node_modules/.bin/electron",
    );

    let mut options = BuildOptions::new(&project, ToolConfig {
      elm: fake_elm(&bin),
      npm,
      ..ToolConfig::default()
    });
    options.support_dir = temp.path().join("support");

    let code = run(&options, &[]).await.unwrap();

    assert_eq!(code, 0);
    assert!(project.join("elm-stuff/elm-desktop-app/app/node_modules/electron").is_dir());
  }

  #[tokio::test]
  async fn failing_install_aborts_with_its_exit_code() {
    let temp = TempDir::new().unwrap();
    let (project, bin) = setup(&temp);
    let npm = fake_tool(&bin, "npm", "exit 9");

    let mut options = BuildOptions::new(&project, ToolConfig {
      elm: fake_elm(&bin),
      npm,
      ..ToolConfig::default()
    });
    options.support_dir = temp.path().join("support");

    let err = run(&options, &[]).await.unwrap_err();
    assert!(matches!(err, BuildError::Tool(ToolError::Failed { code: Some(9), .. })));
    assert_eq!(err.exit_code(), 9);
  }
}
