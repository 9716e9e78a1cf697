//! Error types shared by the router, controllers and record stores.
//!
//! Only [`Error::RecordNotFound`] is recovered inside the crate, once, at the
//! controller dispatch boundary. Everything else propagates to the host.

use crate::store::AttrKind;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// `find` was asked for an identity the store does not hold
    #[error("{model} record not found: {id}")]
    RecordNotFound {
        /// Model name from the record's schema
        model: &'static str,
        /// The identity that was looked up
        id: String,
    },

    /// The matched controller has no action for the request verb
    #[error("controller `{controller}` has no action for {verb}")]
    UnhandledVerb {
        controller: &'static str,
        verb: String,
    },

    /// The inbound method string is not a valid HTTP method token
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("unknown attribute `{attribute}` for {model}")]
    UnknownAttribute {
        model: &'static str,
        attribute: String,
    },

    #[error("attribute `{attribute}` of {model} expects {expected}, got {found}")]
    AttributeType {
        model: &'static str,
        attribute: &'static str,
        expected: AttrKind,
        found: &'static str,
    },

    /// An action asked for a capture the matched route did not produce
    #[error("missing route argument `{0}`")]
    MissingArgument(String),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("render failed: {0}")]
    Render(#[from] minijinja::Error),

    /// Arbitrary application failure, not classified by this crate
    #[error(transparent)]
    Application(#[from] anyhow::Error),
}

impl Error {
    #[must_use]
    pub fn is_record_not_found(&self) -> bool {
        matches!(self, Error::RecordNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_display() {
        let err = Error::RecordNotFound {
            model: "todo",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "todo record not found: 42");
        assert!(err.is_record_not_found());
    }

    #[test]
    fn test_application_error_is_transparent() {
        let err: Error = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "disk on fire");
        assert!(!err.is_record_not_found());
    }

    #[test]
    fn test_attribute_type_display() {
        let err = Error::AttributeType {
            model: "todo",
            attribute: "completed",
            expected: AttrKind::Boolean,
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "attribute `completed` of todo expects boolean, got string"
        );
    }
}
