//! Filesystem helpers.

use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

/// Replace `path` with `contents` as a single whole-file write.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the destination, so readers see either the old or the new
/// document.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
  let parent = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  std::fs::create_dir_all(parent)?;

  let mut temp = NamedTempFile::new_in(parent)?;
  temp.write_all(contents)?;
  temp.flush()?;
  temp.persist(path).map_err(|e| e.error)?;
  Ok(())
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other),
    }
  }
  if out.as_os_str().is_empty() {
    out.push(".");
  }
  out
}

/// Make `path` absolute relative to `base`, then normalize it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    normalize_lexically(path)
  } else {
    normalize_lexically(&base.join(path))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn write_atomic_replaces_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.json");

    write_atomic(&path, b"first version that is longer").unwrap();
    write_atomic(&path, b"second").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
  }

  #[test]
  fn write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("doc.json");

    write_atomic(&path, b"{}").unwrap();

    assert!(path.exists());
  }

  #[test]
  fn write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    write_atomic(&temp.path().join("doc.json"), b"x").unwrap();

    let names: Vec<_> = std::fs::read_dir(temp.path())
      .unwrap()
      .map(|e| e.unwrap().file_name())
      .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("doc.json")]);
  }

  #[test]
  #[cfg(unix)]
  fn normalize_removes_dot_segments() {
    assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
    assert_eq!(normalize_lexically(Path::new("../x")), PathBuf::from("../x"));
    assert_eq!(normalize_lexically(Path::new("./")), PathBuf::from("."));
  }

  #[test]
  #[cfg(unix)]
  fn absolutize_joins_relative_paths() {
    let base = Path::new("/projects/app");
    assert_eq!(absolutize(base, Path::new("src")), PathBuf::from("/projects/app/src"));
    assert_eq!(absolutize(base, Path::new("../shared/src")), PathBuf::from("/projects/shared/src"));
    assert_eq!(absolutize(base, Path::new("/opt/lib")), PathBuf::from("/opt/lib"));
  }
}
