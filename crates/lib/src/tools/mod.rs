//! External tool invocation.
//!
//! The compiler, scaffolder, package manager, packager and GUI host are all
//! opaque executables. Each is spawned with `tokio::process`, awaited before
//! the pipeline continues, and optionally bounded by a timeout after which
//! the child is killed.

mod config;

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub use config::{ToolConfig, ToolConfigError};

#[derive(Debug, Error)]
pub enum ToolError {
  #[error("failed to start {tool}: {source}")]
  Spawn { tool: String, source: io::Error },

  #[error("failed to feed input to {tool}: {source}")]
  Stdin { tool: String, source: io::Error },

  #[error("failed waiting for {tool}: {source}")]
  Wait { tool: String, source: io::Error },

  #[error("{tool} did not finish within {}", humantime::format_duration(*after))]
  Timeout { tool: String, after: Duration },

  #[error("{tool} failed with exit code {}", display_code(*code))]
  Failed { tool: String, code: Option<i32> },
}

fn display_code(code: Option<i32>) -> String {
  code.map(|c| c.to_string()).unwrap_or_else(|| "none (terminated by signal)".to_string())
}

impl ToolError {
  /// Exit code to report for this failure. Tools that exited on their own
  /// pass theirs through; anything else maps to 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      ToolError::Failed { code: Some(code), .. } => *code,
      _ => 1,
    }
  }
}

/// One invocation of an external tool.
#[derive(Debug, Clone)]
pub struct Tool {
  program: OsString,
  args: Vec<OsString>,
  cwd: Option<PathBuf>,
  env: Vec<(OsString, OsString)>,
  stdin: Option<String>,
  timeout: Option<Duration>,
}

impl Tool {
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Self {
      program: program.as_ref().to_os_string(),
      args: Vec::new(),
      cwd: None,
      env: Vec::new(),
      stdin: None,
      timeout: None,
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  pub fn current_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
    self.env.push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
    self
  }

  /// Text written to the tool's stdin, which is closed afterwards. Without
  /// it the tool inherits this process's stdin.
  pub fn stdin(mut self, input: impl Into<String>) -> Self {
    self.stdin = Some(input.into());
    self
  }

  pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  /// Short name for messages (`elm`, `npm`, ...).
  pub fn name(&self) -> String {
    Path::new(&self.program)
      .file_name()
      .unwrap_or(self.program.as_os_str())
      .to_string_lossy()
      .into_owned()
  }

  /// Run to completion and return the exit status, whatever it is.
  pub async fn status(&self) -> Result<ExitStatus, ToolError> {
    let tool = self.name();
    info!(tool = %tool, args = ?self.args, cwd = ?self.cwd, "running external tool");

    let mut command = Command::new(&self.program);
    command.args(&self.args).kill_on_drop(true);
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    for (key, value) in &self.env {
      command.env(key, value);
    }
    if self.stdin.is_some() {
      command.stdin(Stdio::piped());
    }

    let mut child = command.spawn().map_err(|e| ToolError::Spawn {
      tool: tool.clone(),
      source: e,
    })?;

    if let (Some(input), Some(mut pipe)) = (&self.stdin, child.stdin.take()) {
      match pipe.write_all(input.as_bytes()).await {
        Ok(()) => {}
        // The child exited without reading everything; its status says why.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
          debug!(tool = %tool, "stdin closed early by the tool");
        }
        Err(e) => {
          return Err(ToolError::Stdin {
            tool: tool.clone(),
            source: e,
          });
        }
      }
      drop(pipe);
    }

    let status = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
        Ok(waited) => waited,
        Err(_) => {
          warn!(tool = %tool, "timed out, killing");
          if let Err(e) = child.kill().await {
            debug!(tool = %tool, error = %e, "kill after timeout failed");
          }
          return Err(ToolError::Timeout { tool, after: limit });
        }
      },
      None => child.wait().await,
    }
    .map_err(|e| ToolError::Wait {
      tool: tool.clone(),
      source: e,
    })?;

    debug!(tool = %tool, code = ?status.code(), "external tool exited");
    Ok(status)
  }

  /// Run to completion, failing unless the tool exits successfully.
  pub async fn run(&self) -> Result<(), ToolError> {
    let status = self.status().await?;
    if !status.success() {
      return Err(ToolError::Failed {
        tool: self.name(),
        code: status.code(),
      });
    }
    Ok(())
  }
}
