use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, BUILD_ROOT, BUNDLE_FILENAME, ENTRY_FILE, MANIFEST_FILENAME};

/// Where everything lives for one project.
///
/// ```text
/// <project>/
/// ├── elm.json
/// ├── src/Main.elm
/// └── elm-stuff/elm-desktop-app/
///     ├── .lock
///     ├── gen/            # compiler working directory
///     │   ├── elm.json    # merged manifest
///     │   ├── package.json
///     │   ├── elm.js      # fresh bundle, staged only on success
///     │   └── src/        # generated source tree
///     └── app/            # build directory
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
  pub project_dir: PathBuf,
  pub manifest: PathBuf,
  pub entry_file: PathBuf,
  pub build_root: PathBuf,
  pub gen_dir: PathBuf,
  pub gen_src_dir: PathBuf,
  pub app_dir: PathBuf,
}

impl ProjectLayout {
  /// `project_dir` should already be absolute.
  pub fn new(project_dir: &Path) -> Self {
    let build_root = BUILD_ROOT.iter().fold(project_dir.to_path_buf(), |p, c| p.join(c));
    let gen_dir = build_root.join("gen");
    Self {
      project_dir: project_dir.to_path_buf(),
      manifest: project_dir.join(MANIFEST_FILENAME),
      entry_file: project_dir.join(ENTRY_FILE),
      gen_src_dir: gen_dir.join("src"),
      app_dir: build_root.join("app"),
      gen_dir,
      build_root,
    }
  }

  pub fn gen_bundle(&self) -> PathBuf {
    self.gen_dir.join(BUNDLE_FILENAME)
  }

  pub fn app_bundle(&self) -> PathBuf {
    self.app_dir.join(BUNDLE_FILENAME)
  }

  /// Runtime bridge executable inside the build directory.
  pub fn bridge(&self) -> PathBuf {
    self
      .app_dir
      .join("bin")
      .join(format!("{}{}", APP_NAME, std::env::consts::EXE_SUFFIX))
  }

  /// `node_modules/<package>` inside the build directory.
  pub fn node_module(&self, package: &str) -> PathBuf {
    self.app_dir.join("node_modules").join(package)
  }

  /// The GUI host installed into the build directory by npm.
  pub fn installed_electron(&self) -> PathBuf {
    let bin = self.app_dir.join("node_modules").join(".bin");
    if cfg!(windows) {
      bin.join("electron.cmd")
    } else {
      bin.join("electron")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  #[cfg(unix)]
  fn layout_nests_under_elm_stuff() {
    let layout = ProjectLayout::new(Path::new("/work/app"));
    assert_eq!(layout.build_root, Path::new("/work/app/elm-stuff/elm-desktop-app"));
    assert_eq!(layout.gen_src_dir, Path::new("/work/app/elm-stuff/elm-desktop-app/gen/src"));
    assert_eq!(layout.app_dir, Path::new("/work/app/elm-stuff/elm-desktop-app/app"));
    assert_eq!(layout.entry_file, Path::new("/work/app/src/Main.elm"));
    assert_eq!(layout.app_bundle(), Path::new("/work/app/elm-stuff/elm-desktop-app/app/elm.js"));
  }
}
