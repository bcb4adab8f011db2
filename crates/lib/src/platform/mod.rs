pub mod arch;
pub mod os;
pub mod paths;

use arch::Arch;
use os::Os;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Platform identifier combining architecture and OS (e.g., "aarch64-darwin")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

#[derive(Debug, Error)]
#[error("unsupported platform triple: {0} (expected <arch>-<os>, e.g. x86_64-linux)")]
pub struct ParsePlatformError(pub String);

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }

  /// Packager arguments building installers for this platform
  pub fn builder_args(&self) -> [&'static str; 2] {
    [self.os.builder_flag(), self.arch.builder_flag()]
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

impl FromStr for Platform {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (arch, os) = s.split_once('-').ok_or_else(|| ParsePlatformError(s.to_string()))?;
    match (Arch::parse(arch), Os::parse(os)) {
      (Some(arch), Some(os)) => Ok(Self { arch, os }),
      _ => Err(ParsePlatformError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn platform_triple_format() {
    // Verifies the triple format is "arch-os"
    let platform = Platform::new(Arch::Aarch64, Os::MacOs);
    assert_eq!(platform.triple(), "aarch64-darwin");

    let platform = Platform::new(Arch::X86_64, Os::Linux);
    assert_eq!(platform.triple(), "x86_64-linux");
  }

  #[test]
  fn parse_triple() {
    let platform: Platform = "x86_64-windows".parse().unwrap();
    assert_eq!(platform, Platform::new(Arch::X86_64, Os::Windows));
    assert_eq!(platform.builder_args(), ["--win", "--x64"]);
  }

  #[test]
  fn parse_rejects_unknown_triples() {
    assert!("sparc-solaris".parse::<Platform>().is_err());
    assert!("linux".parse::<Platform>().is_err());
  }
}
