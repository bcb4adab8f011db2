//! elm-desktop-lib: build pipeline and runtime bridge for Elm desktop apps
//!
//! The build side turns an Elm application project into a directory the
//! Electron host can run or package:
//! - `manifest`: reading, merging and deriving the JSON manifests
//! - `assemble`: the generated source tree the compiler consumes
//! - `pipeline`: the `init`, `build`, `run` and `package` commands
//!
//! The runtime side (`runtime`) serves the running app's user-data and menu
//! requests.

pub mod assemble;
pub mod build_lock;
pub mod consts;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod runtime;
pub mod support;
pub mod tools;
pub mod util;
