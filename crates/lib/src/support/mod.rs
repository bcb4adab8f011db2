//! The embedded Elm support library.
//!
//! The support sources and the runtime-ports override ship inside the
//! binary and are written out once per tool version, so the assembler has a
//! real directory tree to copy from.

mod files;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use files::{OVERRIDE_PORTS, SUPPORT_FILES};

/// Marks a complete install. Written last.
const STAMP_FILENAME: &str = ".complete";

#[derive(Debug, Error)]
pub enum SupportError {
  #[error("failed to reset support directory {}: {source}", path.display())]
  Reset { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Locations of an installed support library.
#[derive(Debug, Clone)]
pub struct SupportLibrary {
  /// Root of the Elm sources (`DesktopApp.elm`, `DesktopApp/...`).
  pub src_dir: PathBuf,
  /// The port-backed replacement for `DesktopApp/Ports.elm`.
  pub override_file: PathBuf,
}

impl SupportLibrary {
  fn at(dir: &Path) -> Self {
    Self {
      src_dir: dir.join("src"),
      override_file: dir.join("override").join("Ports.elm"),
    }
  }
}

/// Install the embedded support library into `dir` unless a complete
/// install is already there.
pub fn install(dir: &Path) -> Result<SupportLibrary, SupportError> {
  let stamp = dir.join(STAMP_FILENAME);
  if stamp.is_file() {
    debug!(path = %dir.display(), "support library already installed");
    return Ok(SupportLibrary::at(dir));
  }

  info!(path = %dir.display(), "installing support library");

  match fs::remove_dir_all(dir) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => {
      return Err(SupportError::Reset {
        path: dir.to_path_buf(),
        source: e,
      });
    }
  }

  let library = SupportLibrary::at(dir);
  for (rel, content) in SUPPORT_FILES {
    write_file(&library.src_dir.join(rel), content)?;
  }
  write_file(&library.override_file, OVERRIDE_PORTS)?;
  write_file(&stamp, env!("CARGO_PKG_VERSION"))?;

  Ok(library)
}

fn write_file(path: &Path, content: &str) -> Result<(), SupportError> {
  let write = || -> io::Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
  };
  write().map_err(|e| SupportError::Write {
    path: path.to_path_buf(),
    source: e,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn install_writes_sources_override_and_stamp() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("support");

    let library = install(&dir).unwrap();

    assert!(library.src_dir.join("DesktopApp.elm").is_file());
    assert!(library.src_dir.join("DesktopApp").join("Ports.elm").is_file());
    assert!(library.override_file.is_file());
    assert!(dir.join(STAMP_FILENAME).is_file());
  }

  #[test]
  fn install_skips_complete_install() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("support");
    let library = install(&dir).unwrap();
    fs::write(library.src_dir.join("Marker.elm"), "kept").unwrap();

    install(&dir).unwrap();

    assert!(library.src_dir.join("Marker.elm").exists());
  }

  #[test]
  fn install_replaces_incomplete_install() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("support");
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src").join("Partial.elm"), "half written").unwrap();

    let library = install(&dir).unwrap();

    assert!(!library.src_dir.join("Partial.elm").exists());
    assert!(library.src_dir.join("DesktopApp.elm").is_file());
  }

  #[test]
  fn override_differs_from_stub() {
    let stub = SUPPORT_FILES
      .iter()
      .find(|(rel, _)| *rel == "DesktopApp/Ports.elm")
      .map(|(_, content)| *content)
      .unwrap();
    assert!(OVERRIDE_PORTS.starts_with("port module"));
    assert!(!stub.starts_with("port module"));
  }
}
