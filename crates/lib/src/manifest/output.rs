use serde::Serialize;
use serde_json::{Map, Value};

use super::{ConfigError, ProjectManifest};

/// The packager's `package.json`, derived from a template on every build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BuildOutputManifest {
  doc: Value,
}

impl BuildOutputManifest {
  pub fn name(&self) -> Option<&str> {
    self.doc.get("name").and_then(Value::as_str)
  }

  pub fn app_id(&self) -> Option<&str> {
    self.doc.get("build").and_then(|b| b.get("appId")).and_then(Value::as_str)
  }

  pub fn as_value(&self) -> &Value {
    &self.doc
  }
}

/// Copy `template` and stamp the project's app id into `name` and
/// `build.appId`.
pub fn derive_build_output_manifest(
  template: &Value,
  manifest: &ProjectManifest,
) -> Result<BuildOutputManifest, ConfigError> {
  let app_id = manifest.app_id().ok_or(ConfigError::MissingAppId)?;

  let mut doc = match template {
    Value::Object(obj) => obj.clone(),
    _ => Map::new(),
  };
  doc.insert("name".to_string(), Value::String(app_id.to_string()));

  let build = doc
    .entry("build".to_string())
    .or_insert_with(|| Value::Object(Map::new()));
  if !build.is_object() {
    *build = Value::Object(Map::new());
  }
  if let Some(build) = build.as_object_mut() {
    build.insert("appId".to_string(), Value::String(app_id.to_string()));
  }

  Ok(BuildOutputManifest { doc: Value::Object(doc) })
}
