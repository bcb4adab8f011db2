//! Project and build-output manifests.
//!
//! Reads the project's `elm.json`, merges it with the generated support
//! layer for compilation, and derives the packager's `package.json`. The
//! merge and derive steps are pure; only [`load_project_manifest`] and
//! [`write_json`] touch the disk.

mod app_id;
mod output;
mod project;

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::util::fs::write_atomic;

pub use app_id::generate_app_id;
pub use output::{BuildOutputManifest, derive_build_output_manifest};
pub use project::{AppSettings, ProjectManifest, inject_app_settings, merge_for_build, require_direct_dependency};

/// Errors reading, validating or writing a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("project manifest not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("invalid {}: {message}", path.display())]
  Invalid { path: PathBuf, message: String },

  #[error("project manifest has no app-settings.app-id (run `elm-desktop-app init` to add one)")]
  MissingAppId,

  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Load and validate a project manifest.
pub fn load_project_manifest(path: &Path) -> Result<ProjectManifest, ConfigError> {
  let content = match std::fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    Err(e) => {
      return Err(ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  debug!(path = %path.display(), "loaded project manifest");
  ProjectManifest::parse(path, &content)
}

/// Serialize a JSON document and replace `path` with it in one write.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
  let mut content = serde_json::to_string_pretty(value).map_err(ConfigError::Serialize)?;
  content.push('\n');
  write_atomic(path, content.as_bytes()).map_err(|e| ConfigError::Write {
    path: path.to_path_buf(),
    source: e,
  })?;
  debug!(path = %path.display(), "wrote manifest");
  Ok(())
}
