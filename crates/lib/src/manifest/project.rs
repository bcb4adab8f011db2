use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ConfigError;
use crate::consts::SUPPORT_PACKAGE;
use crate::util::fs::{absolutize, normalize_lexically};

const SOURCE_DIRECTORIES: &str = "source-directories";
const DEPENDENCIES: &str = "dependencies";
const APP_SETTINGS: &str = "app-settings";
const APP_ID: &str = "app-id";

/// The project's `elm.json`.
///
/// Kept as the raw JSON object so fields this tool does not know about
/// survive a rewrite in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectManifest {
  doc: Map<String, Value>,
}

/// The `app-settings` object of a project manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppSettings {
  #[serde(default)]
  pub app_id: Option<String>,
  /// Keep the user-data document next to where the app is started, under
  /// this filename, instead of in the per-user data directory.
  #[serde(default)]
  pub use_data_file_in_current_directory: Option<String>,
}

impl ProjectManifest {
  /// Parse and validate manifest text. `path` is only used in errors.
  pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;
    Self::from_value(path, doc)
  }

  fn from_value(path: &Path, doc: Value) -> Result<Self, ConfigError> {
    let invalid = |message: &str| ConfigError::Invalid {
      path: path.to_path_buf(),
      message: message.to_string(),
    };

    let Value::Object(obj) = doc else {
      return Err(invalid("expected a JSON object"));
    };

    if let Some(dirs) = obj.get(SOURCE_DIRECTORIES) {
      let ok = dirs
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string));
      if !ok {
        return Err(invalid("source-directories must be an array of strings"));
      }
    }

    if let Some(settings) = obj.get(APP_SETTINGS) {
      if !settings.is_object() {
        return Err(invalid("app-settings must be an object"));
      }
      AppSettings::deserialize(settings).map_err(|e| invalid(&format!("app-settings: {}", e)))?;
    }

    Ok(Self { doc: obj })
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.doc
  }

  /// Entries of `source-directories`, as written.
  pub fn source_directories(&self) -> Vec<String> {
    self
      .doc
      .get(SOURCE_DIRECTORIES)
      .and_then(Value::as_array)
      .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
      .unwrap_or_default()
  }

  pub fn app_settings(&self) -> AppSettings {
    self
      .doc
      .get(APP_SETTINGS)
      .and_then(|v| AppSettings::deserialize(v).ok())
      .unwrap_or_default()
  }

  /// The application id, if present and non-empty.
  pub fn app_id(&self) -> Option<&str> {
    self
      .doc
      .get(APP_SETTINGS)
      .and_then(|s| s.get(APP_ID))
      .and_then(Value::as_str)
      .filter(|id| !id.trim().is_empty())
  }

  /// Whether `name` appears anywhere in `dependencies`, flat or under
  /// `direct`/`indirect`.
  pub fn has_dependency(&self, name: &str) -> bool {
    match self.doc.get(DEPENDENCIES).and_then(Value::as_object) {
      Some(deps) => {
        deps.contains_key(name)
          || ["direct", "indirect"]
            .iter()
            .filter_map(|group| deps.get(*group).and_then(Value::as_object))
            .any(|group| group.contains_key(name))
      }
      None => false,
    }
  }

  /// Number of dependency entries across all groups.
  pub fn dependency_count(&self) -> usize {
    let Some(deps) = self.doc.get(DEPENDENCIES).and_then(Value::as_object) else {
      return 0;
    };
    deps
      .iter()
      .map(|(key, value)| match (key.as_str(), value.as_object()) {
        ("direct" | "indirect", Some(group)) => group.len(),
        _ => 1,
      })
      .sum()
  }

  fn remove_dependency(&mut self, name: &str) {
    let Some(deps) = self.doc.get_mut(DEPENDENCIES).and_then(Value::as_object_mut) else {
      return;
    };
    deps.shift_remove(name);
    for group in ["direct", "indirect"] {
      if let Some(group) = deps.get_mut(group).and_then(Value::as_object_mut) {
        group.shift_remove(name);
      }
    }
  }
}

/// Prepare a project manifest for compiling against the generated tree.
///
/// Every `source-directories` entry becomes an absolute path rooted at
/// `project_dir` (which must itself be absolute), `generated_src_dir` is
/// appended unless already listed, and the support library's own package is
/// dropped from `dependencies`. Nothing else changes.
pub fn merge_for_build(manifest: &ProjectManifest, project_dir: &Path, generated_src_dir: &Path) -> ProjectManifest {
  let mut merged = manifest.clone();

  let mut dirs: Vec<String> = manifest
    .source_directories()
    .iter()
    .map(|dir| absolutize(project_dir, Path::new(dir)).to_string_lossy().into_owned())
    .collect();

  let generated = normalize_lexically(generated_src_dir).to_string_lossy().into_owned();
  if !dirs.contains(&generated) {
    dirs.push(generated);
  }

  merged.doc.insert(
    SOURCE_DIRECTORIES.to_string(),
    Value::Array(dirs.into_iter().map(Value::String).collect()),
  );
  merged.remove_dependency(SUPPORT_PACKAGE);
  merged
}

/// Set `app-settings.app-id`, creating `app-settings` if needed and keeping
/// any other settings already there.
pub fn inject_app_settings(manifest: &ProjectManifest, app_id: &str) -> ProjectManifest {
  let mut updated = manifest.clone();
  let obj = &mut updated.doc;

  let settings = obj
    .entry(APP_SETTINGS.to_string())
    .or_insert_with(|| Value::Object(Map::new()));
  if !settings.is_object() {
    *settings = Value::Object(Map::new());
  }
  if let Some(settings) = settings.as_object_mut() {
    settings.insert(APP_ID.to_string(), Value::String(app_id.to_string()));
  }
  updated
}

/// Make `name` a direct dependency.
///
/// Elm only lets an application import modules of its direct dependencies.
/// A package listed under `indirect` moves to `direct` with its pinned
/// version; one not listed at all is added at `version`. Flat dependency maps
/// get a flat entry.
pub fn require_direct_dependency(manifest: &ProjectManifest, name: &str, version: &str) -> ProjectManifest {
  let mut updated = manifest.clone();
  let deps = updated
    .doc
    .entry(DEPENDENCIES.to_string())
    .or_insert_with(|| serde_json::json!({"direct": {}, "indirect": {}}));
  let Some(deps) = deps.as_object_mut() else {
    return updated;
  };

  if !deps.contains_key("direct") && !deps.contains_key("indirect") {
    if !deps.contains_key(name) {
      deps.insert(name.to_string(), Value::String(version.to_string()));
    }
    return updated;
  }

  let pinned = deps
    .get_mut("indirect")
    .and_then(Value::as_object_mut)
    .and_then(|indirect| indirect.shift_remove(name));
  let direct = deps
    .entry("direct".to_string())
    .or_insert_with(|| Value::Object(Map::new()));
  if let Some(direct) = direct.as_object_mut()
    && !direct.contains_key(name)
  {
    direct.insert(
      name.to_string(),
      pinned.unwrap_or_else(|| Value::String(version.to_string())),
    );
  }
  updated
}
