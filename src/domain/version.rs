use crate::domain::Stability;
use crate::error::{Result, VersionError};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

/// Matches most common version formats.
///
/// No prefix or build-metadata. For historic reasons the stability suffix may
/// be separated by a hyphen or dot, both optional (`1.0.0-beta1`, `1.0.0-beta-1`,
/// `1.0.0.beta.1` are all the same version).
const VERSION_PATTERN: &str = r"(?i)^v?(?P<major>\d+)\.(?P<minor>\d+)(?:\.(?P<patch>\d+))?(?:[-.]?(?P<stability>alpha|beta|rc|stable)(?:[-.]?(?P<metaver>\d+))?)?$";

fn version_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// A single release version: major.minor.patch plus a stability tier and a
/// pre-release sequence number (the "2" in beta2)
///
/// Immutable value type. Equality, hashing and ordering are all keyed on the
/// canonical text, so differently-constructed instances that render the same
/// are the same version (`0.2` and `0.2-beta1` both canonicalize to `0.2.0`).
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub stability: Stability,
    pub metaver: u32,
    full: String,
}

impl Version {
    /// Create a new version from validated components
    ///
    /// A `major` of 0 forces the stability to `Alpha`: pre-1.0 releases carry
    /// no stability distinction and always render as plain `major.minor.patch`.
    ///
    /// # Errors
    /// Fails when `stability` is `Stable` with a nonzero `metaver`.
    pub fn new(
        major: u32,
        minor: u32,
        patch: u32,
        stability: Stability,
        metaver: u32,
    ) -> Result<Self> {
        let stability = if major == 0 { Stability::Alpha } else { stability };

        if stability == Stability::Stable && metaver > 0 {
            return Err(VersionError::invalid(
                "meta version of the stability flag cannot be set for stable",
            ));
        }

        Ok(Self::make(major, minor, patch, stability, metaver))
    }

    /// Internal constructor for components known to satisfy the invariants
    pub(crate) fn make(
        major: u32,
        minor: u32,
        patch: u32,
        stability: Stability,
        metaver: u32,
    ) -> Self {
        let stability = if major == 0 { Stability::Alpha } else { stability };
        debug_assert!(stability != Stability::Stable || metaver == 0);

        let full = if major > 0 && stability < Stability::Stable {
            format!("{}.{}.{}-{}{}", major, minor, patch, stability.label(), metaver)
        } else {
            format!("{}.{}.{}", major, minor, patch)
        };

        Version {
            major,
            minor,
            patch,
            stability,
            metaver,
            full,
        }
    }

    /// Parse a version literal (e.g. "v1.2.3", "1.0", "1.0.0-beta-1")
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    /// The canonical text of this version
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Every version reachable as an immediate next release from this one
    ///
    /// * `0.1.0` -> `[0.1.1, 0.2.0, 1.0.0-BETA1, 1.0.0]`
    /// * `1.0.0` -> `[1.0.1, 1.1.0-BETA1, 1.1.0, 2.0.0-ALPHA1, 2.0.0-BETA1, 2.0.0]`
    /// * `1.0.0-alpha1` -> `[1.0.0-ALPHA2, 1.0.0-BETA1, 1.0.0-RC1, 1.0.0]`
    /// * `1.0.0-beta1` -> `[1.0.0-BETA2, 1.0.0-RC1, 1.0.0]`
    pub fn next_candidates(&self) -> Vec<Version> {
        // Pre-1.0 lines keep incrementing freely or jump straight to the 1.0
        // stabilization track. The first major release goes directly to beta
        // or stable; alpha and RC are skipped.
        if self.major == 0 {
            return vec![
                self.increase(Increment::Patch),
                self.increase(Increment::Minor),
                Version::make(1, 0, 0, Stability::Beta, 1),
                Version::make(1, 0, 0, Stability::Stable, 0),
            ];
        }

        // A pre-release track is outstanding: only forward progress within the
        // track is legal. Minor and major must not move, and a stability only
        // applies to x.y.0.
        if self.stability < Stability::Stable {
            let mut candidates = vec![Version::make(
                self.major,
                self.minor,
                0,
                self.stability,
                self.metaver + 1,
            )];

            for tier in self.stability.escalations() {
                candidates.push(Version::make(self.major, self.minor, 0, tier, 1));
            }

            candidates.push(Version::make(self.major, self.minor, 0, Stability::Stable, 0));

            return candidates;
        }

        // Stable: a patch, a new minor (optionally opened with a beta), or a
        // new major. RC is reachable only via an explicit request, never as a
        // default candidate.
        vec![
            self.increase(Increment::Patch),
            self.increase(Increment::Beta),
            self.increase(Increment::Minor),
            Version::make(self.major + 1, 0, 0, Stability::Alpha, 1),
            Version::make(self.major + 1, 0, 0, Stability::Beta, 1),
            Version::make(self.major + 1, 0, 0, Stability::Stable, 0),
        ]
    }

    /// Apply a single deterministic increment
    ///
    /// * `Major` on a pre-release produces the stable release of *that* major.
    /// * `Stable` on an existing stable increases the minor instead.
    /// * `Patch` inside a counted pre-release track increases the metaver
    ///   (pre-release tracks have no patch axis).
    pub fn increase(&self, kind: Increment) -> Version {
        match kind {
            Increment::Patch => {
                if self.major > 0 && self.metaver > 0 {
                    self.next_minor_or_meta()
                } else {
                    Version::make(self.major, self.minor, self.patch + 1, Stability::Stable, 0)
                }
            }
            Increment::Minor => Version::make(self.major, self.minor + 1, 0, Stability::Stable, 0),
            Increment::Major => self.next_major(),
            Increment::Alpha => self.next_at_tier(Stability::Alpha),
            Increment::Beta => self.next_at_tier(Stability::Beta),
            Increment::Rc => self.next_at_tier(Stability::Rc),
            Increment::Stable => self.next_stable(),
            Increment::Next => self.next_minor_or_meta(),
        }
    }

    fn next_minor_or_meta(&self) -> Version {
        if self.major > 0 && self.stability < Stability::Stable {
            return Version::make(
                self.major,
                self.minor,
                self.patch,
                self.stability,
                self.metaver + 1,
            );
        }

        Version::make(self.major, self.minor + 1, 0, Stability::Stable, 0)
    }

    fn next_major(&self) -> Version {
        // An unstable major stabilizes in place, it does not skip ahead.
        if self.stability < Stability::Stable {
            return Version::make(self.major.max(1), 0, 0, Stability::Stable, 0);
        }

        Version::make(self.major + 1, 0, 0, Stability::Stable, 0)
    }

    fn next_at_tier(&self, tier: Stability) -> Version {
        if self.stability == tier {
            return Version::make(self.major, self.minor, 0, self.stability, self.metaver + 1);
        }

        if tier > self.stability {
            return Version::make(self.major, self.minor, 0, tier, 1);
        }

        // Cannot downgrade stability within the same line, open a new minor.
        Version::make(self.major, self.minor + 1, 0, tier, 1)
    }

    fn next_stable(&self) -> Version {
        if self.stability == Stability::Stable {
            return Version::make(self.major, self.minor + 1, 0, Stability::Stable, 0);
        }

        if self.major == 0 {
            return Version::make(1, 0, 0, Stability::Stable, 0);
        }

        Version::make(self.major, self.minor, 0, Stability::Stable, 0)
    }

    // Comparison key matching numeric-aware version-string ordering: versions
    // that render plain sort as stable, pre-release suffixes sort below it.
    fn sort_key(&self) -> (u32, u32, u32, Stability, u32) {
        if self.major > 0 && self.stability < Stability::Stable {
            (self.major, self.minor, self.patch, self.stability, self.metaver)
        } else {
            (self.major, self.minor, self.patch, Stability::Stable, 0)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.full == other.full
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self> {
        let captures = version_regex()
            .captures(input)
            .ok_or_else(|| VersionError::malformed(input))?;

        let number = |name: &str| -> Result<u32> {
            match captures.name(name) {
                Some(digits) => digits
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::malformed(input)),
                None => Ok(0),
            }
        };

        let stability = match captures.name("stability") {
            Some(tier) => tier.as_str().parse()?,
            None => Stability::Stable,
        };

        Version::new(
            number("major")?,
            number("minor")?,
            number("patch")?,
            stability,
            number("metaver")?,
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let literal = <String as serde::Deserialize>::deserialize(deserializer)?;
        literal.parse().map_err(serde::de::Error::custom)
    }
}

/// The kind of increment to apply with [`Version::increase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Increment {
    Patch,
    Minor,
    Major,
    Alpha,
    Beta,
    Rc,
    Stable,
    Next,
}

impl FromStr for Increment {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "patch" => Ok(Increment::Patch),
            "minor" => Ok(Increment::Minor),
            "major" => Ok(Increment::Major),
            "alpha" => Ok(Increment::Alpha),
            "beta" => Ok(Increment::Beta),
            "rc" => Ok(Increment::Rc),
            "stable" => Ok(Increment::Stable),
            "next" => Ok(Increment::Next),
            other => Err(VersionError::UnknownIncrement(other.to_string())),
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Increment::Patch => "patch",
            Increment::Minor => "minor",
            Increment::Major => "major",
            Increment::Alpha => "alpha",
            Increment::Beta => "beta",
            Increment::Rc => "rc",
            Increment::Stable => "stable",
            Increment::Next => "next",
        };
        write!(f, "{}", kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_literal() {
        let version = Version::parse("1.0.0-beta-5").unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 0);
        assert_eq!(version.patch, 0);
        assert_eq!(version.stability, Stability::Beta);
        assert_eq!(version.metaver, 5);
        assert_eq!(version.to_string(), "1.0.0-BETA5");
    }

    #[test]
    fn test_parse_explicit_stable() {
        let version = Version::parse("1.0.0-stable").unwrap();
        assert_eq!(version.stability, Stability::Stable);
        assert_eq!(version.metaver, 0);
        assert_eq!(version.to_string(), "1.0.0");
    }

    #[test]
    fn test_parse_without_patch() {
        let version = Version::parse("1.0").unwrap();
        assert_eq!(version.patch, 0);
        assert_eq!(version.to_string(), "1.0.0");
    }

    #[test]
    fn test_parse_with_prefix() {
        assert_eq!(Version::parse("v1.0.0").unwrap().to_string(), "1.0.0");
        assert_eq!(Version::parse("V1.0.0").unwrap().to_string(), "1.0.0");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("1.0.0-WAT").is_err());
        assert!(Version::parse("1").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.0.0+build5").is_err());
    }

    #[test]
    fn test_parse_stable_with_metaver_rejected() {
        let err = Version::parse("1.0.0-stable-5").unwrap_err();
        assert!(err.to_string().contains("stable"));
    }

    #[test]
    fn test_major_zero_forces_alpha() {
        let version = Version::parse("0.2-beta1").unwrap();
        assert_eq!(version.stability, Stability::Alpha);
        assert_eq!(version.to_string(), "0.2.0");
    }

    #[test]
    fn test_new_rejects_stable_with_metaver() {
        assert!(Version::new(1, 0, 0, Stability::Stable, 5).is_err());
        assert!(Version::new(1, 0, 0, Stability::Stable, 0).is_ok());
    }

    #[test]
    fn test_equality_is_canonical_text() {
        let version = Version::parse("1.0.0-beta-5").unwrap();
        assert_eq!(version, Version::parse("1.0.0-beta5").unwrap());
        assert_ne!(version, Version::parse("1.0.0-beta6").unwrap());

        // Renders identically, so equal despite distinct fields.
        assert_eq!(
            Version::parse("0.2").unwrap(),
            Version::parse("0.2-beta1").unwrap()
        );
    }

    #[test]
    fn test_ordering_pre_release_below_stable() {
        let beta = Version::parse("1.0.0-beta1").unwrap();
        let rc = Version::parse("1.0.0-rc1").unwrap();
        let stable = Version::parse("1.0.0").unwrap();
        assert!(beta < rc);
        assert!(rc < stable);
        assert!(stable < Version::parse("1.0.1").unwrap());
    }

    #[test]
    fn test_ordering_consistent_with_equality() {
        let plain = Version::parse("0.2").unwrap();
        let forced = Version::parse("0.2-beta1").unwrap();
        assert_eq!(plain.cmp(&forced), Ordering::Equal);
    }

    #[test]
    fn test_increment_parse_unknown() {
        let err = "next-stable".parse::<Increment>().unwrap_err();
        assert!(err.to_string().contains("\"next-stable\""));
    }

    #[test]
    fn test_increment_parse_roundtrip() {
        for kind in [
            Increment::Patch,
            Increment::Minor,
            Increment::Major,
            Increment::Alpha,
            Increment::Beta,
            Increment::Rc,
            Increment::Stable,
            Increment::Next,
        ] {
            assert_eq!(kind.to_string().parse::<Increment>().unwrap(), kind);
        }
    }

    #[test]
    fn test_candidates_for_initial_dev_version() {
        let candidates = Version::parse("0.1.0").unwrap().next_candidates();
        let expected: Vec<Version> = ["0.1.1", "0.2.0", "1.0.0-BETA1", "1.0.0"]
            .iter()
            .map(|s| Version::parse(s).unwrap())
            .collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_candidates_for_stable_exclude_rc() {
        let candidates = Version::parse("1.0.0").unwrap().next_candidates();
        assert_eq!(candidates.len(), 6);
        assert!(candidates.iter().all(|v| v.stability != Stability::Rc));
    }

    #[test]
    fn test_increase_major_stabilizes_pre_release() {
        let beta = Version::parse("1.0.0-beta1").unwrap();
        assert_eq!(beta.increase(Increment::Major).to_string(), "1.0.0");

        let stable = Version::parse("1.0.0").unwrap();
        assert_eq!(stable.increase(Increment::Major).to_string(), "2.0.0");
    }
}
