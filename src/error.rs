use thiserror::Error;

/// Unified error type for version-continuity operations
#[derive(Error, Debug)]
pub enum VersionError {
    #[error(
        "Unable to parse version \"{0}\". Expects a SemVer compatible version \
         without build-metadata, e.g. \"1.0.0\", \"1.0\", \"1.0.0-beta1\" or \"1.0.0-beta-1\""
    )]
    Malformed(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error(
        "Unknown increment kind \"{0}\", accepts \
         \"alpha\", \"beta\", \"rc\", \"stable\", \"major\", \"next\", \"minor\", \"patch\""
    )]
    UnknownIncrement(String),
}

/// Convenience type alias for Results in version-continuity
pub type Result<T> = std::result::Result<T, VersionError>;

impl VersionError {
    /// Create a malformed-literal error naming the offending input
    pub fn malformed(input: impl Into<String>) -> Self {
        VersionError::Malformed(input.into())
    }

    /// Create an invalid-version error with context
    pub fn invalid(msg: impl Into<String>) -> Self {
        VersionError::InvalidVersion(msg.into())
    }
}
