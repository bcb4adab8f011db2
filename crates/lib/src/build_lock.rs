//! Per-project build lock.
//!
//! Two pipelines writing the same generated tree and build directory would
//! interleave their full-tree replaces, so `build` holds an exclusive
//! advisory lock on `<build root>/.lock` for its whole run. The lock file
//! records who holds it so a second build can name the one in its way.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::pipeline::ProjectLayout;

const LOCK_FILENAME: &str = ".lock";

/// Contents of the lock file while a build runs.
#[derive(Debug, Serialize, Deserialize)]
struct Holder {
  pid: u32,
  since_unix: u64,
  app_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum BuildLockError {
  #[error(
    "another build of this project is running (PID {pid}, since Unix time {since_unix})\n\
     If no other build is running, remove {}",
    lock_path.display()
  )]
  Busy { pid: u32, since_unix: u64, lock_path: PathBuf },

  #[error("another build of this project is running\nIf no other build is running, remove {}", lock_path.display())]
  BusyUnknownHolder { lock_path: PathBuf },

  #[error("lock file {}: {source}", lock_path.display())]
  Io { lock_path: PathBuf, source: io::Error },
}

/// Held for the duration of a build; released on drop.
pub struct BuildLock {
  _file: File,
}

impl BuildLock {
  /// Take the exclusive lock in the layout's build root, failing immediately
  /// if another process holds it.
  pub fn acquire(layout: &ProjectLayout) -> Result<Self, BuildLockError> {
    let lock_path = layout.build_root.join(LOCK_FILENAME);
    let io_err = |source| BuildLockError::Io {
      lock_path: lock_path.clone(),
      source,
    };

    std::fs::create_dir_all(&layout.build_root).map_err(io_err)?;
    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(io_err)?;

    match try_lock(&file) {
      Ok(()) => {}
      Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Err(busy(&lock_path)),
      Err(err) => return Err(io_err(err)),
    }

    let holder = Holder {
      pid: std::process::id(),
      since_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
      app_dir: layout.app_dir.clone(),
    };
    record(&file, &holder).map_err(io_err)?;
    debug!(lock = %lock_path.display(), "build lock taken");

    Ok(BuildLock { _file: file })
  }
}

fn record(mut file: &File, holder: &Holder) -> io::Result<()> {
  file.set_len(0)?;
  serde_json::to_writer(file, holder).map_err(io::Error::other)?;
  file.flush()
}

fn busy(lock_path: &Path) -> BuildLockError {
  let holder = std::fs::read_to_string(lock_path)
    .ok()
    .and_then(|contents| serde_json::from_str::<Holder>(&contents).ok());

  match holder {
    Some(holder) => BuildLockError::Busy {
      pid: holder.pid,
      since_unix: holder.since_unix,
      lock_path: lock_path.to_path_buf(),
    },
    None => BuildLockError::BusyUnknownHolder {
      lock_path: lock_path.to_path_buf(),
    },
  }
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: a zeroed OVERLAPPED is valid and the handle is owned by `file`.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(
      handle,
      LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn holder_on_disk(layout: &ProjectLayout) -> Holder {
    let contents = std::fs::read_to_string(layout.build_root.join(LOCK_FILENAME)).unwrap();
    serde_json::from_str(&contents).unwrap()
  }

  #[test]
  fn acquire_records_this_process_as_holder() {
    let temp = TempDir::new().unwrap();
    let layout = ProjectLayout::new(temp.path());

    let _lock = BuildLock::acquire(&layout).unwrap();

    let holder = holder_on_disk(&layout);
    assert_eq!(holder.pid, std::process::id());
    assert_eq!(holder.app_dir, layout.app_dir);
  }

  #[test]
  #[cfg(unix)]
  fn second_build_names_the_running_one() {
    let temp = TempDir::new().unwrap();
    let layout = ProjectLayout::new(temp.path());
    let _held = BuildLock::acquire(&layout).unwrap();

    let err = BuildLock::acquire(&layout).err().unwrap();

    match &err {
      BuildLockError::Busy { pid, lock_path, .. } => {
        assert_eq!(*pid, std::process::id());
        assert_eq!(lock_path, &layout.build_root.join(LOCK_FILENAME));
      }
      other => panic!("expected a busy lock, got {other:?}"),
    }
    assert!(err.to_string().contains("another build of this project is running"));
  }

  #[test]
  #[cfg(unix)]
  fn unreadable_holder_still_reports_busy() {
    let temp = TempDir::new().unwrap();
    let layout = ProjectLayout::new(temp.path());
    let held = BuildLock::acquire(&layout).unwrap();
    held._file.set_len(0).unwrap();

    let err = BuildLock::acquire(&layout).err().unwrap();

    assert!(matches!(err, BuildLockError::BusyUnknownHolder { .. }));
  }

  #[test]
  fn lock_released_on_drop() {
    let temp = TempDir::new().unwrap();
    let layout = ProjectLayout::new(temp.path());
    drop(BuildLock::acquire(&layout).unwrap());

    assert!(BuildLock::acquire(&layout).is_ok());
  }
}
