use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::templates::{RUNTIME_ASSETS, package_json_template};
use super::{BuildError, BuildOptions, ProjectLayout};
use crate::assemble::assemble;
use crate::build_lock::BuildLock;
use crate::consts::{BUILD_OUTPUT_MANIFEST_FILENAME, MANIFEST_FILENAME};
use crate::manifest::{derive_build_output_manifest, load_project_manifest, merge_for_build, write_json};
use crate::support;
use crate::tools::{Tool, ToolError};
use crate::util::fs::write_atomic;

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildResult {
  pub layout: ProjectLayout,
  pub app_id: String,
  /// Support library files copied into the generated tree.
  pub support_files: usize,
}

/// Build the project into its build directory.
///
/// Steps, in order:
/// 1. Load `elm.json` and derive `package.json` from it; configuration
///    errors stop here, before anything on disk changes
/// 2. Take the project's build lock
/// 3. Install the support library (once per tool version) and rebuild the
///    generated source tree from it
/// 4. Write the merged `elm.json` and the derived `package.json` into the
///    compiler's working directory
/// 5. Compile the entry module to a fresh bundle
/// 6. Only if compilation succeeded, stage runtime assets, bundle and
///    manifests into the build directory
///
/// A failed build never touches the build directory, so the previous
/// successful build stays runnable.
pub async fn build(options: &BuildOptions) -> Result<BuildResult, BuildError> {
  let project_dir = dunce::canonicalize(&options.project_dir).map_err(|e| BuildError::ProjectDir {
    path: options.project_dir.clone(),
    source: e,
  })?;
  let layout = ProjectLayout::new(&project_dir);
  info!(project = %project_dir.display(), "building");

  let manifest = load_project_manifest(&layout.manifest)?;
  let output_manifest = derive_build_output_manifest(&package_json_template()?, &manifest)?;
  let app_id = output_manifest.app_id().unwrap_or_default().to_string();

  let _lock = BuildLock::acquire(&layout)?;

  let library = support::install(&options.support_dir)?;
  let assembled = assemble(&library.src_dir, &library.override_file, &layout.gen_src_dir)?;

  let merged = merge_for_build(&manifest, &project_dir, &layout.gen_src_dir);
  write_json(&layout.gen_dir.join(MANIFEST_FILENAME), &merged)?;
  write_json(&layout.gen_dir.join(BUILD_OUTPUT_MANIFEST_FILENAME), &output_manifest)?;

  compile(options, &layout).await?;
  stage(&layout, options.bridge_executable.as_deref())?;

  info!(app_id = %app_id, dir = %layout.app_dir.display(), "build complete");
  Ok(BuildResult {
    layout,
    app_id,
    support_files: assembled.files_copied,
  })
}

async fn compile(options: &BuildOptions, layout: &ProjectLayout) -> Result<(), BuildError> {
  let bundle = layout.gen_bundle();
  match fs::remove_file(&bundle) {
    Ok(()) => debug!(path = %bundle.display(), "removed previous bundle"),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(stage_error(&bundle, e)),
  }

  let result = Tool::new(&options.tools.elm)
    .arg("make")
    .arg(&layout.entry_file)
    .arg("--output")
    .arg(&bundle)
    .current_dir(&layout.gen_dir)
    .timeout(options.tools.timeout)
    .run()
    .await;

  match result {
    Ok(()) => Ok(()),
    Err(ToolError::Failed { code, .. }) => Err(BuildError::Compile { code }),
    Err(e) => Err(e.into()),
  }
}

fn stage(layout: &ProjectLayout, bridge: Option<&Path>) -> Result<(), BuildError> {
  let app = &layout.app_dir;
  fs::create_dir_all(app).map_err(|e| stage_error(app, e))?;

  for (name, content) in RUNTIME_ASSETS {
    let path = app.join(name);
    write_atomic(&path, content.as_bytes()).map_err(|e| stage_error(&path, e))?;
  }
  #[cfg(unix)]
  make_executable(&app.join("cli.js"))?;

  copy_into(&layout.gen_bundle(), &layout.app_bundle())?;
  copy_into(
    &layout.gen_dir.join(BUILD_OUTPUT_MANIFEST_FILENAME),
    &app.join(BUILD_OUTPUT_MANIFEST_FILENAME),
  )?;
  copy_into(&layout.manifest, &app.join(MANIFEST_FILENAME))?;

  if let Some(bridge) = bridge {
    let target = layout.bridge();
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(|e| stage_error(parent, e))?;
    }
    copy_into(bridge, &target)?;
  }

  debug!(dir = %app.display(), "staged runtime assets");
  Ok(())
}

fn copy_into(from: &Path, to: &Path) -> Result<(), BuildError> {
  fs::copy(from, to).map(|_| ()).map_err(|e| stage_error(to, e))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), BuildError> {
  use std::os::unix::fs::PermissionsExt;

  let mut perms = fs::metadata(path).map_err(|e| stage_error(path, e))?.permissions();
  perms.set_mode(0o755);
  fs::set_permissions(path, perms).map_err(|e| stage_error(path, e))
}

fn stage_error(path: &Path, source: io::Error) -> BuildError {
  BuildError::Stage {
    path: PathBuf::from(path),
    source,
  }
}
