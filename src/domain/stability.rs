use crate::error::{Result, VersionError};
use std::fmt;
use std::str::FromStr;

/// Stability tier of a release, ordered by maturity
///
/// `Alpha < Beta < Rc < Stable`, so tiers can be compared directly
/// (e.g. `stability < Stability::Stable` selects any pre-release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Alpha,
    Beta,
    Rc,
    Stable,
}

impl Stability {
    /// Upper-cased label as it appears in canonical version text (e.g. "BETA")
    pub fn label(&self) -> &'static str {
        match self {
            Stability::Alpha => "ALPHA",
            Stability::Beta => "BETA",
            Stability::Rc => "RC",
            Stability::Stable => "STABLE",
        }
    }

    /// Pre-release tiers strictly above `self`, in ascending order
    ///
    /// Stable is not a pre-release tier and is never included.
    pub fn escalations(&self) -> impl Iterator<Item = Stability> + '_ {
        [Stability::Beta, Stability::Rc]
            .into_iter()
            .filter(move |tier| tier > self)
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Alpha => write!(f, "alpha"),
            Stability::Beta => write!(f, "beta"),
            Stability::Rc => write!(f, "rc"),
            Stability::Stable => write!(f, "stable"),
        }
    }
}

impl FromStr for Stability {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(Stability::Alpha),
            "beta" => Ok(Stability::Beta),
            "rc" => Ok(Stability::Rc),
            "stable" => Ok(Stability::Stable),
            other => Err(VersionError::invalid(format!(
                "unknown stability tier '{}'",
                other
            ))),
        }
    }
}
