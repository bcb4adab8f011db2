mod build;
mod host;
mod init;
mod package;
mod run;

pub use build::cmd_build;
pub use host::cmd_host;
pub use init::cmd_init;
pub use package::cmd_package;
pub use run::cmd_run;

use std::path::Path;

use anyhow::{Context, Result};

use elm_desktop_lib::pipeline::BuildOptions;
use elm_desktop_lib::tools::ToolConfig;

/// Pipeline options for `directory`, with tools taken from the environment
/// and this executable as the runtime bridge.
fn build_options(directory: &Path) -> Result<BuildOptions> {
  let tools = ToolConfig::from_env().context("Invalid tool configuration")?;
  let mut options = BuildOptions::new(directory, tools);
  options.bridge_executable = std::env::current_exe().ok();
  Ok(options)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}
