//! Implementation of the `elm-desktop-app run` command.

use std::ffi::OsString;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use elm_desktop_lib::pipeline::run;

use crate::cmd::{build_options, runtime};

/// Execute the run command.
///
/// Builds the project, then launches it with `extra` passed through.
/// Returns the application's exit code.
pub fn cmd_run(directory: &Path, extra: &[OsString]) -> Result<i32> {
  let options = build_options(directory)?;

  let rt = runtime()?;
  let code = rt.block_on(run(&options, extra)).context("Run failed")?;

  info!(code, "application exited");
  Ok(code)
}
