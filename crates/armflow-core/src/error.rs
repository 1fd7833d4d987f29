//! Identifier and validation error types

use thiserror::Error;

/// Errors raised while parsing a resource identifier.
///
/// These are always fatal to the calling operation and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("parsing {input:?} as a {description} ID: the ID was empty")]
    Empty {
        description: &'static str,
        input: String,
    },

    #[error("parsing {input:?} as a {description} ID: ID was missing the `{segment}` element")]
    MissingSegment {
        description: &'static str,
        input: String,
        segment: &'static str,
    },

    #[error(
        "parsing {input:?} as a {description} ID: expected the segment `{expected}` but got `{found}`"
    )]
    UnexpectedSegment {
        description: &'static str,
        input: String,
        expected: &'static str,
        found: String,
    },

    #[error("parsing {input:?} as a {description} ID: unexpected trailing segments `{trailing}`")]
    TrailingSegments {
        description: &'static str,
        input: String,
        trailing: String,
    },

    #[error(
        "parsing {input:?} as a {description} ID: expected exactly one `{separator}` separator but found {found}"
    )]
    CompositeSeparator {
        description: &'static str,
        input: String,
        separator: &'static str,
        found: usize,
    },

    #[error("parsing {input:?} as a {description} ID: {source}")]
    Component {
        description: &'static str,
        input: String,
        #[source]
        source: Box<IdError>,
    },

    #[error("parsing {input:?} as a {description} URL: {reason}")]
    InvalidUrl {
        description: &'static str,
        input: String,
        reason: String,
    },

    #[error(
        "parsing {input:?}: domain suffix `{found}` does not match `{expected}` for the {environment} environment"
    )]
    DomainSuffixMismatch {
        input: String,
        environment: String,
        expected: String,
        found: String,
    },
}

/// A failed field validation, keyed by the configuration field name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{key}: {message}")]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdError>;
