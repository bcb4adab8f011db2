use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use super::ProjectLayout;
use super::templates::MAIN_ELM_TEMPLATE;
use crate::consts::{JSON_PACKAGE, JSON_PACKAGE_VERSION};
use crate::manifest::{
  ConfigError, generate_app_id, inject_app_settings, load_project_manifest, require_direct_dependency, write_json,
};
use crate::tools::{Tool, ToolConfig, ToolError};
use crate::util::fs::write_atomic;

/// What `init` does when the entry module already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryPolicy {
  /// Fail with [`InitError::EntryExists`] and change nothing.
  #[default]
  Refuse,
  /// Replace it with the template.
  Overwrite,
}

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: io::Error },

  #[error("file already exists: {} (use --force to overwrite)", path.display())]
  EntryExists { path: PathBuf },

  #[error("project scaffolding failed: {0}")]
  Scaffold(#[source] ToolError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },
}

impl InitError {
  pub fn exit_code(&self) -> i32 {
    match self {
      InitError::Scaffold(e) => e.exit_code(),
      _ => 1,
    }
  }
}

/// Options for initializing a project.
#[derive(Debug, Clone)]
pub struct InitOptions {
  pub project_dir: PathBuf,
  /// Application id to record; generated when `None` and the manifest has
  /// none yet.
  pub app_id: Option<String>,
  pub entry_policy: EntryPolicy,
  pub tools: ToolConfig,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  pub project_dir: PathBuf,
  pub manifest: PathBuf,
  pub entry_file: PathBuf,
  pub app_id: String,
  /// Whether the scaffolder had to create `elm.json`.
  pub scaffolded: bool,
  /// Whether an existing entry module was replaced.
  pub entry_overwritten: bool,
}

/// Initialize a desktop app project.
///
/// Creates the directory if needed, runs the project scaffolder when there
/// is no `elm.json` yet, makes `elm/json` a direct dependency, records the
/// application id under `app-settings`, and writes the entry module from the
/// template.
///
/// # Errors
///
/// Returns [`InitError::EntryExists`] before changing anything if the entry
/// module exists and the policy is [`EntryPolicy::Refuse`].
pub async fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  fs::create_dir_all(&options.project_dir).map_err(|e| InitError::CreateDir {
    path: options.project_dir.clone(),
    source: e,
  })?;
  let project_dir = dunce::canonicalize(&options.project_dir).map_err(|e| InitError::Canonicalize {
    path: options.project_dir.clone(),
    source: e,
  })?;
  let layout = ProjectLayout::new(&project_dir);

  let entry_exists = layout.entry_file.exists();
  if entry_exists && options.entry_policy == EntryPolicy::Refuse {
    return Err(InitError::EntryExists {
      path: layout.entry_file.clone(),
    });
  }

  let scaffolded = !layout.manifest.exists();
  if scaffolded {
    info!(dir = %project_dir.display(), "scaffolding project");
    Tool::new(&options.tools.elm)
      .arg("init")
      .current_dir(&project_dir)
      .stdin("y\n")
      .timeout(options.tools.timeout)
      .run()
      .await
      .map_err(InitError::Scaffold)?;
  }

  let manifest = load_project_manifest(&layout.manifest)?;
  let app_id = match (&options.app_id, manifest.app_id()) {
    (Some(id), _) => id.clone(),
    (None, Some(existing)) => existing.to_string(),
    (None, None) => generate_app_id(),
  };
  if !manifest.source_directories().iter().any(|d| d == "src") {
    warn!("source-directories does not list \"src\"; the entry module may not compile");
  }

  let updated = require_direct_dependency(&manifest, JSON_PACKAGE, JSON_PACKAGE_VERSION);
  let updated = inject_app_settings(&updated, &app_id);
  write_json(&layout.manifest, &updated)?;

  write_atomic(&layout.entry_file, MAIN_ELM_TEMPLATE.as_bytes()).map_err(|e| InitError::WriteFile {
    path: layout.entry_file.clone(),
    source: e,
  })?;

  info!(app_id = %app_id, "initialized project");
  Ok(InitResult {
    project_dir,
    manifest: layout.manifest,
    entry_file: layout.entry_file,
    app_id,
    scaffolded,
    entry_overwritten: entry_exists,
  })
}
