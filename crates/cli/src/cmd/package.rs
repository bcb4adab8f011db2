//! Implementation of the `elm-desktop-app package` command.

use std::path::Path;

use anyhow::{Context, Result};

use elm_desktop_lib::pipeline::package;
use elm_desktop_lib::platform::Platform;

use crate::cmd::{build_options, runtime};
use crate::output::{print_info, print_success};

/// Execute the package command.
///
/// Builds the project and runs the packager once per target platform.
pub fn cmd_package(directory: &Path, targets: &[String]) -> Result<()> {
  let targets = targets
    .iter()
    .map(|t| t.parse::<Platform>())
    .collect::<Result<Vec<_>, _>>()
    .context("Invalid --target")?;
  let options = build_options(directory)?;

  let rt = runtime()?;
  let result = rt.block_on(package(&options, &targets)).context("Packaging failed")?;

  for platform in &result.targets {
    print_info(&format!("Packaged for {}", platform));
  }
  print_success(&format!(
    "Installers written under {}",
    result.layout.app_dir.join("dist").display()
  ));

  Ok(())
}
