//! Embedded support library sources.

/// Support library sources, relative to the library's `src` directory.
pub const SUPPORT_FILES: &[(&str, &str)] = &[
  (
    "DesktopApp.elm",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/elm/src/DesktopApp.elm")),
  ),
  (
    "DesktopApp/Ports.elm",
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/elm/src/DesktopApp/Ports.elm")),
  ),
];

/// Port-backed `DesktopApp.Ports`, swapped in over the stub on every build.
pub const OVERRIDE_PORTS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/elm/override/Ports.elm"));
