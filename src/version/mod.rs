// src/version/mod.rs

//! Android Gradle Plugin version model
//!
//! This module provides parsing, formatting and total ordering of AGP
//! releases as they are published in the Google maven repository,
//! including pre-release qualifiers:
//!
//! - `8.1.0` - final release
//! - `8.2.0-alpha03`, `8.2.0-beta01`, `8.2.0-rc02` - numbered previews
//! - `8.3.0-dev` - development build, newer than every numbered preview
//!
//! [`ShortVersion`] is the `major.minor` key used wherever only that
//! granularity matters (version mappings, descriptor upper bounds).

pub mod mapping;

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub use mapping::{VERSION_MAPPING_FILE, VersionInfo, VersionMapping};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-([a-z]+)(\d*))?$").unwrap()
});

static SHORT_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)$").unwrap());

/// Pre-release qualifier of a release
///
/// Declaration order is the comparison rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreviewKind {
    Alpha,
    Beta,
    Rc,
    /// Always the latest build of its branch, above all published previews
    Dev,
    Final,
}

impl PreviewKind {
    /// Tag used in the published version string, if any
    pub fn public_name(self) -> Option<&'static str> {
        match self {
            PreviewKind::Alpha => Some("alpha"),
            PreviewKind::Beta => Some("beta"),
            PreviewKind::Rc => Some("rc"),
            PreviewKind::Dev => Some("dev"),
            PreviewKind::Final => None,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "alpha" => Some(PreviewKind::Alpha),
            "beta" => Some(PreviewKind::Beta),
            "rc" => Some(PreviewKind::Rc),
            "dev" => Some(PreviewKind::Dev),
            _ => None,
        }
    }
}

/// A published (or development) AGP release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    /// The micro, or patch version
    pub micro: u32,
    pub preview_kind: PreviewKind,
    /// e.g. 5 for `7.0.0-alpha05`. 0 for final and dev releases
    pub preview_number: u32,
}

impl ReleaseVersion {
    /// Create a final release
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            preview_kind: PreviewKind::Final,
            preview_number: 0,
        }
    }

    /// Create a pre-release
    pub fn preview(major: u32, minor: u32, micro: u32, kind: PreviewKind, number: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            preview_kind: kind,
            preview_number: number,
        }
    }

    /// Parse a version string
    ///
    /// Format: `major.minor.micro[-{alpha|beta|rc}NN|-dev]`
    /// Examples:
    /// - "8.1.0" → final
    /// - "8.2.0-rc02" → Rc, 2
    /// - "8.3.0-dev" → Dev
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedVersion(s.to_string());

        let caps = VERSION_RE.captures(s).ok_or_else(malformed)?;
        let number = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());

        let (preview_kind, preview_number) = match caps.get(4) {
            None => (PreviewKind::Final, 0),
            Some(tag) => {
                let kind = PreviewKind::from_tag(tag.as_str()).ok_or_else(malformed)?;
                let digits = caps.get(5).map_or("", |m| m.as_str());
                match (kind, digits.is_empty()) {
                    (PreviewKind::Dev, true) => (PreviewKind::Dev, 0),
                    (PreviewKind::Dev, false) | (_, true) => return Err(malformed()),
                    (kind, false) => (kind, digits.parse::<u32>().map_err(|_| malformed())?),
                }
            }
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            micro: number(3)?,
            preview_kind,
            preview_number,
        })
    }

    /// Truncate to `major.minor`
    pub fn to_short(&self) -> ShortVersion {
        ShortVersion::new(self.major, self.minor)
    }

    // Releases before 3.1.0 (and the 3.1.0 betas) were published with
    // single-digit preview numbers.
    fn uses_two_digit_preview(&self) -> bool {
        self.major > 3
            || (self.major == 3 && self.minor > 1)
            || (self.major == 3
                && self.minor == 1
                && self.micro == 0
                && self.preview_kind != PreviewKind::Beta)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        match self.preview_kind {
            PreviewKind::Final => Ok(()),
            PreviewKind::Dev => write!(f, "-dev"),
            kind => {
                let tag = kind.public_name().unwrap_or_default();
                if self.uses_two_digit_preview() {
                    write!(f, "-{}{:02}", tag, self.preview_number)
                } else {
                    write!(f, "-{}{}", tag, self.preview_number)
                }
            }
        }
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.micro.cmp(&other.micro))
            .then(self.preview_kind.cmp(&other.preview_kind))
            .then(self.preview_number.cmp(&other.preview_number))
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A `major.minor` AGP version
///
/// Field order gives the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortVersion {
    pub major: u32,
    pub minor: u32,
}

impl ShortVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `X.Y`, returning `None` for anything else
    ///
    /// Absence is not an error: callers use this to tell a short form from
    /// a full release string.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = SHORT_VERSION_RE.captures(s)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        Some(Self { major, minor })
    }

    /// Whether a full release string belongs to this `major.minor`
    pub fn matches_prefix(&self, release: &str) -> bool {
        release.starts_with(&format!("{}.{}.", self.major, self.minor))
    }
}

impl fmt::Display for ShortVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ShortVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::MalformedVersion(s.to_string()))
    }
}

impl From<ReleaseVersion> for ShortVersion {
    fn from(version: ReleaseVersion) -> Self {
        version.to_short()
    }
}
