//! Implementation of the `elm-desktop-app build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use elm_desktop_lib::pipeline::build;

use crate::cmd::{build_options, runtime};
use crate::output::{format_duration, print_stat, print_success};

/// Execute the build command.
///
/// Compiles the project and stages everything the GUI host needs into
/// `elm-stuff/elm-desktop-app/app`. A failed compile leaves the previous
/// build in place.
pub fn cmd_build(directory: &Path) -> Result<()> {
  let options = build_options(directory)?;
  let started = Instant::now();

  let rt = runtime()?;
  let result = rt.block_on(build(&options)).context("Build failed")?;

  print_success(&format!("Built in {}", format_duration(started.elapsed())));
  print_stat("App id", &result.app_id);
  print_stat("Build directory", &result.layout.app_dir.display().to_string());

  Ok(())
}
