//! Implementation of the `elm-desktop-app init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use elm_desktop_lib::consts::ENTRY_FILE;
use elm_desktop_lib::pipeline::{EntryPolicy, InitOptions, init};
use elm_desktop_lib::tools::ToolConfig;

use crate::cmd::runtime;
use crate::output::symbols;
use crate::prompts::confirm;

/// Execute the init command.
///
/// Scaffolds `elm.json` if missing, records the application id and writes
/// `src/Main.elm`. An existing entry module is only replaced after
/// confirmation or with `--force`.
pub fn cmd_init(directory: &Path, app_id: Option<String>, force: bool) -> Result<()> {
  let entry = directory.join(ENTRY_FILE);
  let entry_policy = if entry.exists() && confirm(&format!("{} exists. Overwrite it?", entry.display()), force)? {
    EntryPolicy::Overwrite
  } else {
    EntryPolicy::Refuse
  };

  let options = InitOptions {
    project_dir: directory.to_path_buf(),
    app_id,
    entry_policy,
    tools: ToolConfig::from_env().context("Invalid tool configuration")?,
  };

  let rt = runtime()?;
  let result = rt.block_on(init(&options)).context("Failed to initialize project")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized Elm desktop app!".green().bold()
  );
  println!();
  println!("  {} Project:     {}", symbols::INFO.cyan(), result.project_dir.display());
  println!("  {} App id:      {}", symbols::INFO.cyan(), result.app_id);
  println!("  {} Entry point: {}", symbols::INFO.cyan(), result.entry_file.display());
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. Edit {} to build your app", result.entry_file.display().to_string().cyan());
  println!(
    "  2. Run: {}",
    format!("elm-desktop-app run {}", result.project_dir.display()).cyan()
  );

  Ok(())
}
