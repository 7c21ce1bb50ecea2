//! Launcher version numbers
//!
//! The update server publishes the launcher version in one of two shapes:
//! - `MAJOR.MINOR.PATCH`
//! - `MAJOR.MINOR.RELEASE.PATCH`
//!
//! The two shapes are ordered against each other with a format-aware rule
//! (see [`VersionNumber::is_greater_than`]) that is not a total order, so
//! `VersionNumber` does not implement `Ord`.

use crate::error::VersionError;
use std::fmt;
use std::str::FromStr;

/// The shape a version string was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionFormat {
    /// `MAJOR.MINOR.PATCH`
    ThreePart,
    /// `MAJOR.MINOR.RELEASE.PATCH`
    FourPart,
}

/// A parsed launcher version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
    /// Always 0 for [`VersionFormat::ThreePart`]
    pub release: u32,
    pub patch: u32,
    pub format: VersionFormat,
}

impl VersionNumber {
    /// Creates a `MAJOR.MINOR.PATCH` version
    pub fn three_part(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            release: 0,
            patch,
            format: VersionFormat::ThreePart,
        }
    }

    /// Creates a `MAJOR.MINOR.RELEASE.PATCH` version
    pub fn four_part(major: u32, minor: u32, release: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            release,
            patch,
            format: VersionFormat::FourPart,
        }
    }

    /// Parse a dot-delimited version string
    ///
    /// Three segments produce a [`VersionFormat::ThreePart`] value, four or
    /// more a [`VersionFormat::FourPart`] value built from the first four.
    /// Segments past the fourth must still be numeric but are otherwise
    /// ignored.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::malformed(input, "empty version string"));
        }

        let segments = trimmed
            .split('.')
            .map(|segment| parse_segment(input, segment))
            .collect::<Result<Vec<u32>, _>>()?;

        match segments.as_slice() {
            [major, minor, patch] => Ok(Self::three_part(*major, *minor, *patch)),
            [major, minor, release, patch, ..] => {
                Ok(Self::four_part(*major, *minor, *release, *patch))
            }
            _ => Err(VersionError::malformed(
                input,
                format!("expected at least 3 segments, found {}", segments.len()),
            )),
        }
    }

    /// Returns true if `self` is strictly newer than `other`
    ///
    /// Major and minor dominate. With equal major/minor the decision depends
    /// on both formats:
    ///
    /// | self       | other      | self is greater when                         |
    /// |------------|------------|----------------------------------------------|
    /// | three-part | three-part | `patch > other.patch`                        |
    /// | three-part | four-part  | `other.release == 0 && patch > other.patch`  |
    /// | four-part  | three-part | `release > 0`, or `patch > other.patch`      |
    /// | four-part  | four-part  | `release`, then `patch`                      |
    pub fn is_greater_than(&self, other: &VersionNumber) -> bool {
        if self.major != other.major {
            return self.major > other.major;
        }
        if self.minor != other.minor {
            return self.minor > other.minor;
        }

        match (self.format, other.format) {
            (VersionFormat::ThreePart, VersionFormat::ThreePart) => self.patch > other.patch,
            (VersionFormat::ThreePart, VersionFormat::FourPart) => {
                other.release == 0 && self.patch > other.patch
            }
            (VersionFormat::FourPart, VersionFormat::ThreePart) => {
                self.release > 0 || self.patch > other.patch
            }
            (VersionFormat::FourPart, VersionFormat::FourPart) => {
                if self.release != other.release {
                    self.release > other.release
                } else {
                    self.patch > other.patch
                }
            }
        }
    }
}

/// Parse a single segment as a non-negative integer (digits only, no sign)
fn parse_segment(input: &str, segment: &str) -> Result<u32, VersionError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::malformed(
            input,
            format!("segment '{}' is not a non-negative integer", segment),
        ));
    }
    segment.parse().map_err(|_| {
        VersionError::malformed(input, format!("segment '{}' is out of range", segment))
    })
}

impl FromStr for VersionNumber {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            VersionFormat::ThreePart => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
            VersionFormat::FourPart => write!(
                f,
                "{}.{}.{}.{}",
                self.major, self.minor, self.release, self.patch
            ),
        }
    }
}
