//! SemVer 2.0 version parsing, normalization, and total ordering, with the
//! NuGet extension of an optional fourth release component.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::RepositoryError;

/// A parsed, validated SemVer 2.0 version string.
///
/// Release components are kept as normalized (no leading zero) decimal
/// strings rather than fixed-width integers, so arbitrarily large release
/// numbers parse and order correctly without a bignum dependency.
#[derive(Debug, Clone)]
pub struct Version {
    release: Vec<String>,
    prerelease: Option<Vec<String>>,
    build: Option<Vec<String>>,
    original: String,
}

impl Version {
    /// Validate and parse a version string per spec grammar.
    ///
    /// Release components are 2 to 4 non-negative integers; leading zeros
    /// are tolerated on input and stripped during normalization. Prerelease
    /// identifiers are `[0-9A-Za-z-]`, non-empty, and purely numeric
    /// identifiers must not carry a leading zero. Build metadata shares the
    /// character class but is not validated beyond that.
    ///
    /// # Example
    /// ```
    /// # use nuget_repo_domain::Version;
    /// let version = Version::parse("1.2.3-alpha.1+build.5").unwrap();
    /// assert_eq!(version.normalized(), "1.2.3-alpha.1");
    /// assert_eq!(version.original(), "1.2.3-alpha.1+build.5");
    /// ```
    ///
    /// A single release component is rejected; SemVer 2.0 requires at
    /// least major.minor:
    /// ```
    /// # use nuget_repo_domain::Version;
    /// assert!(Version::parse("1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Version, RepositoryError> {
        if s.is_empty() {
            return Err(invalid(s));
        }

        let (without_build, build) = match s.split_once('+') {
            Some((head, tail)) => (head, Some(parse_ident_list(tail, s)?)),
            None => (s, None),
        };

        let (release_part, prerelease) = match without_build.split_once('-') {
            Some((head, tail)) => (head, Some(parse_prerelease_list(tail, s)?)),
            None => (without_build, None),
        };

        let release = parse_release(release_part, s)?;

        Ok(Version {
            release,
            prerelease,
            build,
            original: s.to_string(),
        })
    }

    /// The canonical string representation: normalized release components,
    /// a dropped trailing-zero fourth component, verbatim prerelease, and no
    /// build metadata.
    ///
    /// # Example
    /// ```
    /// # use nuget_repo_domain::Version;
    /// assert_eq!(Version::parse("1.00.0.0").unwrap().normalized(), "1.0.0");
    /// assert_eq!(Version::parse("2.1+meta").unwrap().normalized(), "2.1");
    /// ```
    pub fn normalized(&self) -> String {
        let release = if self.release.len() == 4 && self.release[3] == "0" {
            self.release[..3].join(".")
        } else {
            self.release.join(".")
        };

        match &self.prerelease {
            Some(idents) => format!("{release}-{}", idents.join(".")),
            None => release,
        }
    }

    /// The exact string this version was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    fn padded_release(&self) -> [&str; 4] {
        let mut out = ["0", "0", "0", "0"];
        for (slot, component) in out.iter_mut().zip(self.release.iter()) {
            *slot = component.as_str();
        }
        out
    }

    fn cmp_release(&self, other: &Version) -> Ordering {
        let a = self.padded_release();
        let b = other.padded_release();
        for i in 0..4 {
            let ord = compare_numeric(a[i], b[i]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    fn cmp_prerelease(&self, other: &Version) -> Ordering {
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            // A version with a prerelease is less than the same version without one.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = compare_ident(x, y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl FromStr for Version {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.cmp_release(other) {
            Ordering::Equal => self.cmp_prerelease(other),
            ord => ord,
        }
    }
}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.padded_release().hash(state);
        self.prerelease.hash(state);
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.normalized())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse-and-normalize a version string in one call, matching spec.md's
/// `normalized()` wording literally for callers that don't need a `Version`
/// value around.
pub fn normalize(s: &str) -> Result<String, RepositoryError> {
    Version::parse(s).map(|v| v.normalized())
}

fn invalid(s: &str) -> RepositoryError {
    RepositoryError::InvalidVersion(s.to_string())
}

fn parse_release(s: &str, original: &str) -> Result<Vec<String>, RepositoryError> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(invalid(original));
    }
    parts
        .into_iter()
        .map(|p| normalize_numeric(p).ok_or_else(|| invalid(original)))
        .collect()
}

fn normalize_numeric(s: &str) -> Option<String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = s.trim_start_matches('0');
    Some(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

fn parse_prerelease_list(s: &str, original: &str) -> Result<Vec<String>, RepositoryError> {
    let idents = parse_ident_list(s, original)?;
    for ident in &idents {
        let is_numeric = ident.bytes().all(|b| b.is_ascii_digit());
        if is_numeric && ident.len() > 1 && ident.starts_with('0') {
            return Err(invalid(original));
        }
    }
    Ok(idents)
}

fn parse_ident_list(s: &str, original: &str) -> Result<Vec<String>, RepositoryError> {
    if s.is_empty() {
        return Err(invalid(original));
    }
    s.split('.')
        .map(|ident| {
            if ident.is_empty()
                || !ident
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            {
                Err(invalid(original))
            } else {
                Ok(ident.to_string())
            }
        })
        .collect()
}

/// Compare two normalized (no leading zero) non-negative decimal integer
/// strings by value: longer is greater; equal length compares lexically.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_ident(a: &str, b: &str) -> Ordering {
    let a_numeric = a.bytes().all(|b| b.is_ascii_digit());
    let b_numeric = b.bytes().all(|b| b.is_ascii_digit());
    match (a_numeric, b_numeric) {
        (true, true) => compare_numeric(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
