//! History-aware continuity checks for proposed release versions

use crate::domain::{Increment, Stability, Version};
use std::collections::BTreeMap;

/// Outcome of a continuity check: the verdict plus the reachable set it was
/// judged against (useful for diagnostics, e.g. "expected one of ...")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuityCheck {
    pub accepted: bool,
    pub possible: Vec<Version>,
}

/// Validates that a candidate version legally continues a release history
///
/// Given the set of existing releases, each check resolves the relevant
/// "current tip" for the candidate's major.minor line and accepts the
/// candidate only if it is among that tip's reachable next versions. Lines
/// superseded by a newer minor or major are restricted to patch backports.
///
/// The validator holds no mutable state; sharing one instance across threads
/// for concurrent checks is safe.
pub struct ContinuityValidator {
    versions: Vec<Version>,
}

impl ContinuityValidator {
    /// Create a validator over the existing release history
    pub fn new(versions: Vec<Version>) -> Self {
        ContinuityValidator { versions }
    }

    /// Check whether `candidate` is a legal continuation of the history
    pub fn check(&self, candidate: &Version) -> ContinuityCheck {
        let possible = self.possible_versions(candidate);
        let accepted = possible.iter().any(|version| version == candidate);

        ContinuityCheck { accepted, possible }
    }

    /// Convenience for callers that only need the verdict
    pub fn is_continuous(&self, candidate: &Version) -> bool {
        self.check(candidate).accepted
    }

    fn possible_versions(&self, candidate: &Version) -> Vec<Version> {
        let lines = self.arrange_lines();

        let Some(minors) = lines.get(&candidate.major) else {
            // No history for this major at all: a brand-new line behaves like
            // starting fresh from the overall latest release.
            return match lines.last_key_value().and_then(|(_, m)| m.last_key_value()) {
                Some((_, latest)) => latest.next_candidates(),
                None => bootstrap_candidates(),
            };
        };

        // Resolve the reference version: the candidate's own minor line if
        // known, otherwise the best known minor under this major.
        let Some((&resolved_minor, reference)) = minors
            .get_key_value(&candidate.minor)
            .or_else(|| minors.last_key_value())
        else {
            return bootstrap_candidates();
        };

        let newer_minor = minors
            .keys()
            .next_back()
            .is_some_and(|last| *last > resolved_minor);
        let newer_major = lines
            .keys()
            .next_back()
            .is_some_and(|last| *last > reference.major);

        // A superseded line may only receive fixes, never advance.
        if newer_minor || newer_major {
            return vec![reference.increase(Increment::Patch)];
        }

        reference.next_candidates()
    }

    // Best-known version per (major, minor) line, keeping the greatest among
    // duplicates.
    fn arrange_lines(&self) -> BTreeMap<u32, BTreeMap<u32, Version>> {
        let mut lines: BTreeMap<u32, BTreeMap<u32, Version>> = BTreeMap::new();

        for version in &self.versions {
            let line = lines.entry(version.major).or_default();
            match line.get(&version.minor) {
                Some(existing) if existing >= version => {}
                _ => {
                    line.insert(version.minor, version.clone());
                }
            }
        }

        lines
    }
}

// The fixed candidates offered when no release history exists yet.
fn bootstrap_candidates() -> Vec<Version> {
    vec![
        Version::make(0, 1, 0, Stability::Alpha, 0),
        Version::make(1, 0, 0, Stability::Alpha, 1),
        Version::make(1, 0, 0, Stability::Beta, 1),
        Version::make(1, 0, 0, Stability::Stable, 0),
    ]
}
