//! Messages exchanged between the GUI shell and the bridge.
//!
//! Every message is a JSON object `{"channel": ..., "payload": ...}`; the
//! payload is omitted for channels that carry none.

use serde::{Deserialize, Serialize};

/// Messages sent by the shell to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum Request {
  LoadUserData,
  /// Full replacement document. Never acknowledged.
  WriteUserData(String),
  SetMenu(MenuDescriptor),
  /// Answer to [`Outbound::PickDataFile`]; `None` when the user cancelled.
  DataFilePicked(Option<String>),
}

/// Messages sent by the bridge to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum Outbound {
  /// Reply to [`Request::LoadUserData`]; `None` when no document exists yet.
  UserDataLoaded(Option<String>),
  MenuChanged(crate::runtime::MenuState),
  /// Ask the shell to show a file picker.
  PickDataFile,
}

/// What a `set-menu` request installs on the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MenuDescriptor {
  NoMenu,
  DefaultMenu,
  CustomMenu { items: Vec<MenuItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
  pub label: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub accelerator: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub submenu: Vec<MenuItem>,
}

impl MenuItem {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      role: None,
      accelerator: None,
      submenu: Vec::new(),
    }
  }
}
