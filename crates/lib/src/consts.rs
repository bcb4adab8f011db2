//! Fixed names shared by the build pipeline and the runtime bridge.

/// Application name, used for the per-user data directory and log targets.
pub const APP_NAME: &str = "elm-desktop-app";

/// The project manifest read by the Elm compiler.
pub const MANIFEST_FILENAME: &str = "elm.json";

/// The manifest consumed by the packager.
pub const BUILD_OUTPUT_MANIFEST_FILENAME: &str = "package.json";

/// Build root, relative to the project directory.
pub const BUILD_ROOT: [&str; 2] = ["elm-stuff", "elm-desktop-app"];

/// The support library's own package name. Builds inline its sources, so a
/// project dependency on it has to be dropped before compiling.
pub const SUPPORT_PACKAGE: &str = "avh4/elm-desktop-app";

/// The project's entry module, relative to the project directory.
pub const ENTRY_FILE: &str = "src/Main.elm";

/// Compiled bundle name inside the build directory.
pub const BUNDLE_FILENAME: &str = "elm.js";

/// Fixed name of the user-data document in the per-user data directory.
pub const USER_DATA_FILENAME: &str = "user-data.json";

/// Set by `run` and the staged launcher when the host is started from the CLI.
pub const LAUNCH_MARKER_ENV: &str = "ELM_DESKTOP_APP_LAUNCHED_FROM_CLI";

/// Reverse-DNS prefix for generated application ids.
pub const APP_ID_PREFIX: &str = "local.elmdesktop";

/// Package whose modules the support library and the entry template import.
/// `elm init` only lists it as an indirect dependency.
pub const JSON_PACKAGE: &str = "elm/json";

/// Version added when the project does not list [`JSON_PACKAGE`] at all.
pub const JSON_PACKAGE_VERSION: &str = "1.1.3";
