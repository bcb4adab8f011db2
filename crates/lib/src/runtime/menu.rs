//! Translating menu descriptors into window menu state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::protocol::{MenuDescriptor, MenuItem};

/// Menu operations a host window supports. Each call replaces whatever menu
/// the window had before.
pub trait WindowMenu {
  /// Remove all menu chrome from the window.
  fn remove_menu(&mut self);

  /// Restore the host's default application menu.
  fn restore_default_menu(&mut self);

  /// Build a menu from `items` and install it.
  fn set_menu(&mut self, items: &[MenuItem]);
}

/// The menu a window currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MenuState {
  Hidden,
  #[default]
  Default,
  Custom { items: Vec<MenuItem> },
}

impl MenuState {
  /// Top-level items the window exposes. `None` for the host's default menu,
  /// whose contents this process does not know.
  pub fn items(&self) -> Option<&[MenuItem]> {
    match self {
      MenuState::Hidden => Some(&[]),
      MenuState::Default => None,
      MenuState::Custom { items } => Some(items),
    }
  }
}

/// Apply `descriptor` to `window`. Last write wins.
pub fn apply_menu<W: WindowMenu + ?Sized>(window: &mut W, descriptor: &MenuDescriptor) {
  match descriptor {
    MenuDescriptor::NoMenu => {
      debug!("removing window menu");
      window.remove_menu();
    }
    MenuDescriptor::DefaultMenu => {
      debug!("restoring default menu");
      window.restore_default_menu();
    }
    MenuDescriptor::CustomMenu { items } => {
      debug!(items = items.len(), "installing custom menu");
      window.set_menu(items);
    }
  }
}

/// A window stand-in that only remembers its menu state.
///
/// The bridge uses it to track what the shell should display; the shell is
/// told about every change.
#[derive(Debug, Default)]
pub struct RecordedMenu {
  state: MenuState,
}

impl RecordedMenu {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> &MenuState {
    &self.state
  }
}

impl WindowMenu for RecordedMenu {
  fn remove_menu(&mut self) {
    self.state = MenuState::Hidden;
  }

  fn restore_default_menu(&mut self) {
    self.state = MenuState::Default;
  }

  fn set_menu(&mut self, items: &[MenuItem]) {
    self.state = MenuState::Custom { items: items.to_vec() };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn custom(labels: &[&str]) -> MenuDescriptor {
    MenuDescriptor::CustomMenu {
      items: labels.iter().map(|l| MenuItem::new(*l)).collect(),
    }
  }

  #[test]
  fn new_window_shows_default_menu() {
    assert_eq!(RecordedMenu::new().state(), &MenuState::Default);
  }

  #[test]
  fn no_menu_then_custom_leaves_exactly_the_custom_items() {
    let mut window = RecordedMenu::new();

    apply_menu(&mut window, &MenuDescriptor::NoMenu);
    assert_eq!(window.state().items(), Some(&[][..]));

    apply_menu(&mut window, &custom(&["File", "Edit", "Help"]));

    let labels: Vec<_> = window.state().items().unwrap().iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["File", "Edit", "Help"]);
  }

  #[test]
  fn each_descriptor_replaces_the_previous_one() {
    let mut window = RecordedMenu::new();

    apply_menu(&mut window, &custom(&["A", "B"]));
    apply_menu(&mut window, &custom(&["C"]));
    assert_eq!(window.state().items().map(<[_]>::len), Some(1));

    apply_menu(&mut window, &MenuDescriptor::DefaultMenu);
    assert_eq!(window.state(), &MenuState::Default);
    assert!(window.state().items().is_none());
  }

  #[test]
  fn state_serializes_for_the_shell() {
    let value = serde_json::to_value(MenuState::Hidden).unwrap();
    assert_eq!(value, serde_json::json!({"type": "hidden"}));
  }
}
