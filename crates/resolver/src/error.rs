//! Error types for navms resolution

use thiserror::Error;

/// Why a request could not be resolved to a redirect target.
///
/// None of these ever surface as an HTTP error status; the server maps
/// them to a 302 toward the project page with a `msg` reason code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no short key present in URL")]
    ShortMissing,

    #[error("no redirect entry or alias for short '{0}'")]
    ShortNotFound(String),

    #[error("short '{short}' has no target for cloud '{cloud}'")]
    CloudNotSupported { short: String, cloud: String },
}

impl ResolveError {
    /// Reason code carried on the fallback redirect's `msg` parameter.
    pub fn reason_code(&self) -> &'static str {
        match self {
            ResolveError::ShortMissing => "noShortFound",
            ResolveError::ShortNotFound(_) => "noRedirectFound",
            ResolveError::CloudNotSupported { .. } => "noRedirectForCloud",
        }
    }
}

/// Errors loading or validating the redirect table. Fatal at startup.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read redirect table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse redirect table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("short '{short}' is keyed by unknown cloud '{cloud}'")]
    UnknownCloud { short: String, cloud: String },

    #[error("short '{short}' cloud '{cloud}' has {len} targets, expected 1 or 2")]
    InvalidTargets {
        short: String,
        cloud: String,
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ResolveError::ShortMissing.reason_code(), "noShortFound");
        assert_eq!(
            ResolveError::ShortNotFound("go".into()).reason_code(),
            "noRedirectFound"
        );
        assert_eq!(
            ResolveError::CloudNotSupported {
                short: "go".into(),
                cloud: "dod".into()
            }
            .reason_code(),
            "noRedirectForCloud"
        );
    }
}
