use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ELM_ENV: &str = "ELM_DESKTOP_APP_ELM";
pub const NPM_ENV: &str = "ELM_DESKTOP_APP_NPM";
pub const NPX_ENV: &str = "ELM_DESKTOP_APP_NPX";
pub const ELECTRON_ENV: &str = "ELM_DESKTOP_APP_ELECTRON";
pub const TIMEOUT_ENV: &str = "ELM_DESKTOP_APP_TOOL_TIMEOUT";

#[derive(Debug, Error)]
pub enum ToolConfigError {
  #[error("invalid ELM_DESKTOP_APP_TOOL_TIMEOUT value {value:?}: {source}")]
  Timeout {
    value: String,
    source: humantime::DurationError,
  },
}

/// Which executables the pipeline invokes, and how long they may take.
#[derive(Debug, Clone)]
pub struct ToolConfig {
  pub elm: PathBuf,
  pub npm: PathBuf,
  pub npx: PathBuf,
  /// GUI host. `None` uses the copy installed in the build directory.
  pub electron: Option<PathBuf>,
  /// Limit for every tool except the GUI host.
  pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      elm: PathBuf::from("elm"),
      npm: PathBuf::from(npm_program()),
      npx: PathBuf::from(npx_program()),
      electron: None,
      timeout: None,
    }
  }
}

#[cfg(windows)]
fn npm_program() -> &'static str {
  "npm.cmd"
}

#[cfg(not(windows))]
fn npm_program() -> &'static str {
  "npm"
}

#[cfg(windows)]
fn npx_program() -> &'static str {
  "npx.cmd"
}

#[cfg(not(windows))]
fn npx_program() -> &'static str {
  "npx"
}

impl ToolConfig {
  /// Defaults overridden by `ELM_DESKTOP_APP_*` environment variables.
  pub fn from_env() -> Result<Self, ToolConfigError> {
    let mut config = Self::default();
    let var = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(elm) = var(ELM_ENV) {
      config.elm = elm;
    }
    if let Some(npm) = var(NPM_ENV) {
      config.npm = npm;
    }
    if let Some(npx) = var(NPX_ENV) {
      config.npx = npx;
    }
    config.electron = var(ELECTRON_ENV);

    if let Ok(value) = std::env::var(TIMEOUT_ENV)
      && !value.trim().is_empty()
    {
      let timeout = humantime::parse_duration(value.trim()).map_err(|e| ToolConfigError::Timeout {
        value: value.clone(),
        source: e,
      })?;
      config.timeout = Some(timeout);
    }

    Ok(config)
  }
}
