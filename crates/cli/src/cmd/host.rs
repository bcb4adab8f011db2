//! Implementation of the hidden `elm-desktop-app host` command.
//!
//! The staged `index.js` spawns this command and talks to it over
//! stdin/stdout, one JSON message per line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

use elm_desktop_lib::consts::LAUNCH_MARKER_ENV;
use elm_desktop_lib::runtime::{HostOptions, LaunchMode, run_host};

use crate::cmd::runtime;

/// Execute the host command. Returns 0 when the user cancels the data file
/// prompt.
pub fn cmd_host(app_dir: &Path, data_file: Option<PathBuf>) -> Result<i32> {
  let options = HostOptions {
    app_dir: dunce::canonicalize(app_dir).with_context(|| format!("No app directory at {}", app_dir.display()))?,
    data_file,
    launch: LaunchMode::from_marker(std::env::var_os(LAUNCH_MARKER_ENV).as_deref()),
    cwd: std::env::current_dir().context("Failed to read current directory")?,
  };

  let rt = runtime()?;
  let result = rt.block_on(run_host(
    &options,
    BufReader::new(tokio::io::stdin()),
    tokio::io::stdout(),
  ));

  match result {
    Ok(()) => Ok(0),
    Err(e) if e.exit_code() == 0 => {
      info!("no data file chosen, exiting");
      Ok(0)
    }
    Err(e) => Err(e).context("Runtime bridge failed"),
  }
}
