//! Error types for excursion-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Location, ReviewKind};

/// The kind of entity an error or a listing refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Noun {
    Operator,
    Activity,
    Review,
}

impl fmt::Display for Noun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noun::Operator => write!(f, "operator"),
            Noun::Activity => write!(f, "activity"),
            Noun::Review => write!(f, "review"),
        }
    }
}

/// Every rejected registry operation. None of these are fatal; the front end
/// reports them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Name shorter than three characters after trimming.
    #[error("'{name}' is not a valid {noun} name")]
    InvalidName { noun: Noun, name: String },

    #[error("'{input}' is an invalid location")]
    InvalidLocation { input: String },

    /// An operator with the same (case-insensitive) name exists at the location.
    #[error("operator '{name}' already exists in '{location}'")]
    DuplicateOperator { name: String, location: Location },

    #[error("'{id}' is an invalid operator ID")]
    OperatorNotFound { id: String },

    #[error("'{id}' is an invalid activity ID")]
    ActivityNotFound { id: String },

    #[error("'{id}' is an invalid review ID")]
    ReviewNotFound { id: String },

    /// The review exists but is not the variant the operation needs.
    #[error("'{id}' does not have review type {expected}")]
    WrongReviewType { id: String, expected: ReviewKind },

    /// A search or listing produced nothing.
    #[error("there are no matching {noun} results")]
    NoMatches { noun: Noun },

    /// Wrong option count or malformed rating for a review submission.
    #[error("malformed {kind} review options: {reason}")]
    MalformedOptions { kind: ReviewKind, reason: String },
}

/// Errors from loading the front-end configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML; includes the file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = RegistryError::InvalidName { noun: Noun::Activity, name: "ab".into() };
        assert_eq!(err.to_string(), "'ab' is not a valid activity name");

        let err = RegistryError::WrongReviewType { id: "X-R1".into(), expected: ReviewKind::Expert };
        assert_eq!(err.to_string(), "'X-R1' does not have review type Expert");
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
