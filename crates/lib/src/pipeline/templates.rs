//! Files embedded into the binary and written out by `init` and `build`.

use std::path::Path;

use serde_json::Value;

use crate::manifest::ConfigError;

/// Entry module written by `init`.
pub const MAIN_ELM_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/templates/Main.elm"));

/// Packager manifest template; `name` and `build.appId` are filled per build.
pub const PACKAGE_JSON_TEMPLATE: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/runtime/package.json"));

/// Static runtime files staged into every build directory.
pub const RUNTIME_ASSETS: &[(&str, &str)] = &[
  (
    "index.js",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/runtime/index.js")),
  ),
  (
    "index.html",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/runtime/index.html")),
  ),
  (
    "preload.js",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/runtime/preload.js")),
  ),
  (
    "cli.js",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/runtime/cli.js")),
  ),
];

pub fn package_json_template() -> Result<Value, ConfigError> {
  serde_json::from_str(PACKAGE_JSON_TEMPLATE).map_err(|e| ConfigError::Parse {
    path: Path::new("package.json (template)").to_path_buf(),
    source: e,
  })
}
