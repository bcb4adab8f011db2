use crate::consts::APP_NAME;
use std::path::PathBuf;
use tracing::warn;

/// Reads a directory from the environment, ignoring unset or empty values
fn env_dir(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Used when the environment names no home: the current directory, or `.`
fn fallback_dir() -> PathBuf {
  std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's home directory
pub fn home_dir() -> PathBuf {
  let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
  env_dir(var).unwrap_or_else(|| {
    warn!("{var} is not set, using the current directory instead");
    fallback_dir()
  })
}

/// Returns the per-user base directory applications keep their data in
#[cfg(windows)]
pub fn data_home() -> PathBuf {
  env_dir("APPDATA").unwrap_or_else(home_dir)
}

/// Returns the per-user base directory applications keep their data in
#[cfg(not(windows))]
pub fn data_home() -> PathBuf {
  env_dir("XDG_DATA_HOME").unwrap_or_else(|| home_dir().join(".local").join("share"))
}

/// Returns the directory for data files of the build tool itself
pub fn data_dir() -> PathBuf {
  data_home().join(APP_NAME)
}

/// Returns where the embedded support library is installed for this version
pub fn support_dir() -> PathBuf {
  data_dir().join("support").join(env!("CARGO_PKG_VERSION"))
}

/// Returns the data directory of a built application, keyed by its app id
pub fn app_data_dir(app_id: &str) -> PathBuf {
  data_home().join(app_id)
}
