//! The runtime side of a built application.
//!
//! The GUI shell forwards protocol messages to a bridge process that owns
//! the user-data document and the window menu state. This module holds the
//! message types, the persistence service, the menu configurator and the
//! serve loop tying them together.

pub mod host;
pub mod menu;
pub mod persistence;
pub mod protocol;

pub use host::{HostError, HostOptions, run_host, serve};
pub use menu::{MenuState, RecordedMenu, WindowMenu, apply_menu};
pub use persistence::{
  DataFileMode, DataFilePrompt, Decision, LaunchMode, PersistenceError, PersistenceService, decide, resolve,
};
pub use protocol::{MenuDescriptor, MenuItem, Outbound, Request};
