mod cmd;
mod output;
mod prompts;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use elm_desktop_lib::pipeline::{BuildError, InitError};

use crate::output::print_error;

/// elm-desktop-app - Build, run and package Elm desktop applications
#[derive(Parser)]
#[command(name = "elm-desktop-app")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a new project, or set up an existing one
  Init {
    /// Project directory
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Application id (reverse DNS, e.g. com.example.todo); generated if omitted
    app_id: Option<String>,

    /// Overwrite an existing src/Main.elm without asking
    #[arg(short, long)]
    force: bool,
  },

  /// Compile the project into its build directory
  Build {
    /// Project directory
    #[arg(default_value = ".")]
    directory: PathBuf,
  },

  /// Build the project and launch it
  Run {
    /// Project directory
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Arguments passed to the application
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    extra: Vec<OsString>,
  },

  /// Build the project and create installers
  Package {
    /// Project directory
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Target platform triple (e.g. x86_64-linux); repeatable, defaults to the current platform
    #[arg(short, long = "target")]
    targets: Vec<String>,
  },

  /// Serve a running application's requests over stdin and stdout
  #[command(hide = true)]
  Host {
    /// Build directory of the application
    app_dir: PathBuf,

    /// Data file to use instead of the default
    data_file: Option<PathBuf>,
  },
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) if matches!(e.kind(), ErrorKind::InvalidSubcommand | ErrorKind::MissingSubcommand) => {
      return usage();
    }
    Err(e) => e.exit(),
  };

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  // stdout carries the host protocol, so logs always go to stderr.
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let Some(command) = cli.command else {
    return usage();
  };

  let result: Result<i32> = match command {
    Commands::Init {
      directory,
      app_id,
      force,
    } => cmd::cmd_init(&directory, app_id, force).map(|_| 0),
    Commands::Build { directory } => cmd::cmd_build(&directory).map(|_| 0),
    Commands::Run { directory, extra } => cmd::cmd_run(&directory, &extra),
    Commands::Package { directory, targets } => cmd::cmd_package(&directory, &targets).map(|_| 0),
    Commands::Host { app_dir, data_file } => cmd::cmd_host(&app_dir, data_file),
  };

  match result {
    Ok(code) => exit_code_from(code),
    Err(err) => {
      print_error(&format!("{:#}", err));
      exit_code_from(exit_code(&err))
    }
  }
}

/// Absent or unknown commands print usage and succeed.
fn usage() -> ExitCode {
  let _ = Cli::command().print_help();
  ExitCode::SUCCESS
}

fn exit_code(err: &anyhow::Error) -> i32 {
  if let Some(e) = err.downcast_ref::<BuildError>() {
    e.exit_code()
  } else if let Some(e) = err.downcast_ref::<InitError>() {
    e.exit_code()
  } else {
    1
  }
}

fn exit_code_from(code: i32) -> ExitCode {
  ExitCode::from(u8::try_from(code).unwrap_or(1))
}
