//! The single user-data document of a running application.
//!
//! Which file backs the document is decided once per process. [`decide`] is
//! the pure part of that decision; [`resolve`] adds the interactive prompt
//! for the one case that needs it.

use std::ffi::OsStr;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::consts::USER_DATA_FILENAME;
use crate::manifest::AppSettings;
use crate::platform::paths;
use crate::util::fs::write_atomic;

#[derive(Debug, Error)]
pub enum PersistenceError {
  #[error("failed to read user data from {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("no data file was chosen")]
  PromptCancelled,

  #[error("data file prompt failed: {0}")]
  Prompt(String),
}

/// How the application was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
  /// Through the command line wrapper, which never prompts.
  Cli,
  /// Directly, e.g. from a desktop launcher.
  Direct,
}

impl LaunchMode {
  /// Interpret the value of the launch marker environment variable.
  pub fn from_marker(value: Option<&OsStr>) -> Self {
    match value {
      Some(v) if !v.is_empty() => LaunchMode::Cli,
      _ => LaunchMode::Direct,
    }
  }
}

/// Where the application keeps its document by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFileMode {
  /// A fixed file name inside the per-user application data directory.
  UserData { dir: PathBuf },
  /// A file named `filename` in the directory the app was started from.
  CurrentDirectory { cwd: PathBuf, filename: String },
}

impl DataFileMode {
  /// Mode selected by an application's `app-settings`.
  pub fn from_settings(app_id: &str, settings: &AppSettings, cwd: PathBuf) -> Self {
    match &settings.use_data_file_in_current_directory {
      Some(filename) => DataFileMode::CurrentDirectory {
        cwd,
        filename: filename.clone(),
      },
      None => DataFileMode::UserData {
        dir: paths::app_data_dir(app_id),
      },
    }
  }

  /// File name used when a directory is given instead of a file.
  pub fn default_filename(&self) -> &str {
    match self {
      DataFileMode::UserData { .. } => USER_DATA_FILENAME,
      DataFileMode::CurrentDirectory { filename, .. } => filename,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Resolved(PathBuf),
  NeedsPrompt,
}

/// Decide which file backs the document.
///
/// `hint` is a path given on the command line. In current-directory mode a
/// hint naming an existing directory gets the default file name appended.
pub fn decide(hint: Option<&Path>, mode: &DataFileMode, launch: LaunchMode) -> Decision {
  match mode {
    DataFileMode::CurrentDirectory { cwd, filename } => match hint {
      Some(path) => Decision::Resolved(file_in(path, filename)),
      None if launch == LaunchMode::Cli => Decision::Resolved(cwd.join(filename)),
      None => Decision::NeedsPrompt,
    },
    DataFileMode::UserData { dir } => match hint {
      Some(path) => Decision::Resolved(path.to_path_buf()),
      None => Decision::Resolved(dir.join(USER_DATA_FILENAME)),
    },
  }
}

fn file_in(path: &Path, filename: &str) -> PathBuf {
  if path.is_dir() {
    path.join(filename)
  } else {
    path.to_path_buf()
  }
}

/// Asks the user for a data file or a directory to keep it in.
pub trait DataFilePrompt {
  /// `Ok(None)` means the user cancelled.
  fn pick_data_file(&mut self) -> impl Future<Output = Result<Option<PathBuf>, PersistenceError>> + Send;
}

/// [`decide`], prompting when needed.
pub async fn resolve<P: DataFilePrompt>(
  hint: Option<&Path>,
  mode: &DataFileMode,
  launch: LaunchMode,
  prompt: &mut P,
) -> Result<PathBuf, PersistenceError> {
  match decide(hint, mode, launch) {
    Decision::Resolved(path) => Ok(path),
    Decision::NeedsPrompt => {
      debug!("prompting for a data file");
      match prompt.pick_data_file().await? {
        Some(choice) => Ok(file_in(&choice, mode.default_filename())),
        None => Err(PersistenceError::PromptCancelled),
      }
    }
  }
}

/// Loads and writes the document at one resolved path.
///
/// Loads and writes are serialized by an async mutex around the path.
#[derive(Debug)]
pub struct PersistenceService {
  path: Mutex<PathBuf>,
}

impl PersistenceService {
  pub fn new(path: PathBuf) -> Self {
    info!(path = %path.display(), "using data file");
    Self { path: Mutex::new(path) }
  }

  /// Resolve the data file and open a service on it.
  pub async fn open<P: DataFilePrompt>(
    hint: Option<&Path>,
    mode: &DataFileMode,
    launch: LaunchMode,
    prompt: &mut P,
  ) -> Result<Self, PersistenceError> {
    let path = resolve(hint, mode, launch, prompt).await?;
    Ok(Self::new(path))
  }

  pub async fn path(&self) -> PathBuf {
    self.path.lock().await.clone()
  }

  /// The whole document, or `None` if it does not exist yet.
  ///
  /// # Errors
  ///
  /// Any read failure other than a missing file.
  pub async fn load(&self) -> Result<Option<String>, PersistenceError> {
    let path = self.path.lock().await;
    match tokio::fs::read_to_string(&*path).await {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no user data yet");
        Ok(None)
      }
      Err(e) => Err(PersistenceError::Read {
        path: path.clone(),
        source: e,
      }),
    }
  }

  /// Replace the document with `content`. Failures are logged, not returned.
  pub async fn write(&self, content: String) {
    let path = self.path.lock().await;
    let target = path.clone();
    let result = tokio::task::spawn_blocking(move || write_atomic(&target, content.as_bytes())).await;
    match result {
      Ok(Ok(())) => debug!(path = %path.display(), "wrote user data"),
      Ok(Err(e)) => error!(path = %path.display(), error = %e, "failed to write user data"),
      Err(e) => error!(path = %path.display(), error = %e, "user data write task failed"),
    }
  }
}
