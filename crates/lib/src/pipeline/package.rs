use tracing::info;

use super::run::ensure_node_module;
use super::{BuildError, BuildOptions, ProjectLayout, build};
use crate::platform::Platform;
use crate::tools::Tool;

/// Result of packaging.
#[derive(Debug)]
pub struct PackageResult {
  pub layout: ProjectLayout,
  pub targets: Vec<Platform>,
}

/// Build, then run the packager once per target platform.
///
/// With no targets, packages for the current platform. The first failing
/// packager run aborts the command.
pub async fn package(options: &BuildOptions, targets: &[Platform]) -> Result<PackageResult, BuildError> {
  let targets = if targets.is_empty() {
    vec![Platform::current().ok_or(BuildError::UnsupportedPlatform)?]
  } else {
    targets.to_vec()
  };

  let result = build(options).await?;
  let layout = result.layout;

  ensure_node_module(options, &layout, "electron-builder").await?;

  for platform in &targets {
    info!(platform = %platform, app_id = %result.app_id, "packaging");
    Tool::new(&options.tools.npx)
      .arg("electron-builder")
      .args(platform.builder_args())
      .current_dir(&layout.app_dir)
      .timeout(options.tools.timeout)
      .run()
      .await
      .map_err(|e| BuildError::Package {
        platform: platform.triple(),
        source: e,
      })?;
  }

  Ok(PackageResult { layout, targets })
}
