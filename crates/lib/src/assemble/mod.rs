//! Generated source tree assembly.
//!
//! Every build replaces the generated tree wholesale: the previous contents
//! are deleted, the support library is copied in, and the stub runtime-ports
//! module inside the copy is overwritten with the real implementation. There
//! is no incremental sync, so files removed from the support library never
//! linger in a later build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Path of the stub module inside the support tree that the override replaces.
pub const OVERRIDE_TARGET: [&str; 2] = ["DesktopApp", "Ports.elm"];

#[derive(Debug, Error)]
pub enum AssemblyError {
  #[error("failed to remove {}: {source}", path.display())]
  RemoveDir { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to walk {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy { from: PathBuf, to: PathBuf, source: io::Error },

  #[error("support tree has no {} to override", path.display())]
  MissingOverrideTarget { path: PathBuf },
}

/// Result of assembling the generated tree.
#[derive(Debug)]
pub struct AssembleResult {
  /// Number of files copied from the support tree.
  pub files_copied: usize,
  /// The file inside the generated tree replaced by the override.
  pub overridden: PathBuf,
}

/// Rebuild `generated_src_dir` from `support_tree_src` and `override_file`.
///
/// # Errors
///
/// Fails on any I/O error, or if the support tree lacks the module the
/// override replaces. The generated tree is then in an unknown state; the
/// next successful call rebuilds it from scratch.
pub fn assemble(
  support_tree_src: &Path,
  override_file: &Path,
  generated_src_dir: &Path,
) -> Result<AssembleResult, AssemblyError> {
  info!(
    support = %support_tree_src.display(),
    generated = %generated_src_dir.display(),
    "assembling generated source tree"
  );

  remove_dir_if_exists(generated_src_dir)?;
  fs::create_dir_all(generated_src_dir).map_err(|e| AssemblyError::CreateDir {
    path: generated_src_dir.to_path_buf(),
    source: e,
  })?;

  let files_copied = copy_tree(support_tree_src, generated_src_dir)?;

  let overridden = OVERRIDE_TARGET
    .iter()
    .fold(generated_src_dir.to_path_buf(), |p, c| p.join(c));
  if !overridden.is_file() {
    return Err(AssemblyError::MissingOverrideTarget { path: overridden });
  }
  fs::copy(override_file, &overridden).map_err(|e| AssemblyError::Copy {
    from: override_file.to_path_buf(),
    to: overridden.clone(),
    source: e,
  })?;
  debug!(path = %overridden.display(), "applied override");

  Ok(AssembleResult {
    files_copied,
    overridden,
  })
}

fn remove_dir_if_exists(path: &Path) -> Result<(), AssemblyError> {
  match fs::remove_dir_all(path) {
    Ok(()) => {
      debug!(path = %path.display(), "removed previous generated tree");
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(AssemblyError::RemoveDir {
      path: path.to_path_buf(),
      source: e,
    }),
  }
}

/// Recursively copy the contents of `src` into `dst`, returning the number
/// of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, AssemblyError> {
  let mut count = 0;

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|e| AssemblyError::Walk {
      path: src.to_path_buf(),
      message: e.to_string(),
    })?;

    let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
    if rel.as_os_str().is_empty() {
      continue;
    }
    let target = dst.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| AssemblyError::CreateDir {
        path: target.clone(),
        source: e,
      })?;
    } else {
      fs::copy(entry.path(), &target).map_err(|e| AssemblyError::Copy {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source: e,
      })?;
      count += 1;
    }
  }

  Ok(count)
}
