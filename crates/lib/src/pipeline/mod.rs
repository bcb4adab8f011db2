//! The build pipeline: `init`, `build`, `run` and `package`.
//!
//! Every command is a fixed sequence of steps executed strictly in order.
//! External tools block the pipeline until they exit and their exit code
//! decides whether it continues. Nothing is retried.

mod build;
mod init;
mod layout;
mod package;
mod run;
pub mod templates;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::assemble::AssemblyError;
use crate::build_lock::BuildLockError;
use crate::manifest::ConfigError;
use crate::platform::paths;
use crate::support::SupportError;
use crate::tools::{ToolConfig, ToolError};

pub use build::{BuildResult, build};
pub use init::{EntryPolicy, InitError, InitOptions, InitResult, init};
pub use layout::ProjectLayout;
pub use package::{PackageResult, package};
pub use run::run;

/// Options shared by `build`, `run` and `package`.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub project_dir: PathBuf,
  pub tools: ToolConfig,
  /// Where the embedded support library is installed.
  pub support_dir: PathBuf,
  /// Executable copied into the build directory as the runtime bridge.
  pub bridge_executable: Option<PathBuf>,
}

impl BuildOptions {
  pub fn new(project_dir: impl Into<PathBuf>, tools: ToolConfig) -> Self {
    Self {
      project_dir: project_dir.into(),
      tools,
      support_dir: paths::support_dir(),
      bridge_executable: None,
    }
  }
}

/// Errors that abort `build`, `run` or `package`.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("project directory {}: {source}", path.display())]
  ProjectDir { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Lock(#[from] BuildLockError),

  #[error(transparent)]
  Support(#[from] SupportError),

  #[error(transparent)]
  Assembly(#[from] AssemblyError),

  #[error("compilation failed{}", code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
  Compile { code: Option<i32> },

  #[error(transparent)]
  Tool(#[from] ToolError),

  #[error("packaging for {platform} failed: {source}")]
  Package {
    platform: String,
    #[source]
    source: ToolError,
  },

  #[error("no packaging target given and the current platform is not supported")]
  UnsupportedPlatform,

  #[error("failed to stage {}: {source}", path.display())]
  Stage { path: PathBuf, source: io::Error },
}

impl BuildError {
  /// Process exit code for this failure: the failing external tool's own
  /// code where there is one, 1 otherwise.
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::Compile { code: Some(code) } => *code,
      BuildError::Tool(e) | BuildError::Package { source: e, .. } => e.exit_code(),
      _ => 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exit_code_passes_tool_code_through() {
    assert_eq!(BuildError::Compile { code: Some(2) }.exit_code(), 2);
    assert_eq!(BuildError::Compile { code: None }.exit_code(), 1);

    let err = BuildError::Package {
      platform: "x86_64-linux".to_string(),
      source: ToolError::Failed {
        tool: "npx".to_string(),
        code: Some(7),
      },
    };
    assert_eq!(err.exit_code(), 7);
    assert_eq!(
      err.to_string(),
      "packaging for x86_64-linux failed: npx failed with exit code 7"
    );
  }

  #[test]
  fn config_errors_exit_with_one() {
    assert_eq!(BuildError::Config(ConfigError::MissingAppId).exit_code(), 1);
  }
}
