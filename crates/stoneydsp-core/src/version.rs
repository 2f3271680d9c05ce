//! Structured version descriptor.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::uint32;

/// A library version: `major.minor.patch[-pre]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Pre-release tag without the leading dash; empty for a release.
    #[serde(default)]
    pub pre: Cow<'static, str>,
}

/// Version of this build, fixed at compile time from the package metadata.
pub const VERSION: Version = Version {
    major: parse_component(env!("CARGO_PKG_VERSION_MAJOR")),
    minor: parse_component(env!("CARGO_PKG_VERSION_MINOR")),
    patch: parse_component(env!("CARGO_PKG_VERSION_PATCH")),
    pre: Cow::Borrowed(env!("CARGO_PKG_VERSION_PRE")),
};

/// Copyright holder, from the package authors.
pub const COPYRIGHT: &str = env!("CARGO_PKG_AUTHORS");

const fn parse_component(s: &str) -> u32 {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "empty version component");
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        assert!(bytes[i].is_ascii_digit(), "version component is not numeric");
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}

impl Version {
    /// A release version (no pre-release tag).
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Cow::Borrowed(""),
        }
    }

    /// Packed form `0xMMMMmmpp`.
    pub const fn hex(&self) -> u32 {
        (self.major << 16) | (self.minor << 8) | self.patch
    }

    /// Decimal form `major * 10000 + minor * 100 + patch`.
    pub const fn long(&self) -> u32 {
        self.major * 10000 + self.minor * 100 + self.patch
    }

    pub fn is_release(&self) -> bool {
        self.pre.is_empty()
    }

    /// Build banner, e.g. `INFO:StoneyDSP version [1.0.0-pre]`.
    pub fn banner(&self) -> String {
        format!("INFO:StoneyDSP version [{self}]")
    }

    /// Parse a semver string. Build metadata is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let v = semver::Version::parse(s.trim())?;
        let out_of_range = || ConfigError::VersionOutOfRange {
            version: s.trim().to_string(),
        };
        let component = |n: u64, max: u32| match u32::try_from(n) {
            Ok(n) if n <= max => Ok(n),
            _ => Err(out_of_range()),
        };
        Ok(Self {
            major: component(v.major, 0xFFFF)?,
            minor: component(v.minor, 0xFF)?,
            patch: component(v.patch, 0xFF)?,
            pre: Cow::Owned(v.pre.as_str().to_string()),
        })
    }

    pub fn to_semver(&self) -> Result<semver::Version> {
        let mut v = semver::Version::new(self.major.into(), self.minor.into(), self.patch.into());
        if !self.pre.is_empty() {
            v.pre = semver::Prerelease::new(&self.pre)?;
        }
        Ok(v)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        Ok(())
    }
}

crate::public_function! {
    /// Packed library version, see [`Version::hex`].
    pub fn stoneydsp_version_hex() -> uint32 {
        VERSION.hex()
    }

    /// Decimal library version, see [`Version::long`].
    pub fn stoneydsp_version_long() -> uint32 {
        VERSION.long()
    }
}
