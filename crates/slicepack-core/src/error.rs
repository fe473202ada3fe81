//! The engine's single error type.
//!
//! Every fallible entry point (`load_release`, `Release::validate`,
//! `select`) returns `Result<_, Error>`. Errors are never partially
//! recovered internally — a failed load yields no `Release`, a failed
//! `select` yields no `Selection`.

use thiserror::Error as ThisError;

use slicepack_schema::{IdentError, PathOptionError};

/// The eight error kinds the engine can raise.
#[derive(ThisError, Debug)]
pub enum Error {
    /// The declarative-format text could not be parsed at all.
    #[error("{path}: syntax error: {source}")]
    Syntax {
        /// Path of the offending file, relative to the release root.
        path: String,
        /// Underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field was missing/empty, an enum value was unrecognized,
    /// or an identifier contained an illegal character.
    #[error("{path}: schema error: {message}")]
    Schema {
        /// Path of the offending file, relative to the release root.
        path: String,
        /// Description of the violated schema rule.
        message: String,
    },

    /// A PGP public key's armor could not be decoded, or its declared `id`
    /// did not match its decoded fingerprint.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A per-path option combination was invalid.
    #[error("{path}: {source}")]
    PathOption {
        /// Path of the offending package file, relative to the release
        /// root.
        path: String,
        /// Underlying validation failure.
        #[source]
        source: PathOptionError,
    },

    /// Two slices disagreed on a literal path, or a glob/generate pattern
    /// covered a path claimed by a different package.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An essential reference was malformed, a self-reference, a
    /// duplicate, or pointed at a non-existent package/slice.
    #[error("dependency error: {0}")]
    Dependency(String),

    /// A strongly-connected component of size > 1 was found in the
    /// essential graph.
    #[error("cycle detected among slices: {0}")]
    Cycle(String),

    /// A selection referenced a slice not in the release, or one of its
    /// selected paths had an unrecognized `generate` value.
    #[error("selection error: {0}")]
    Selection(String),
}

impl From<IdentError> for Error {
    fn from(e: IdentError) -> Self {
        Error::Schema {
            path: String::new(),
            message: e.to_string(),
        }
    }
}

/// Attach a file path to a schema-level identifier error.
pub(crate) fn schema_err(path: &str, message: impl Into<String>) -> Error {
    Error::Schema {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Attach a file path to an underlying `serde_yaml` parse failure.
pub(crate) fn syntax_err(path: &str, source: serde_yaml::Error) -> Error {
    Error::Syntax {
        path: path.to_string(),
        source,
    }
}

/// Attach a file path to a per-path option validation failure.
pub(crate) fn path_option_err(path: &str, source: PathOptionError) -> Error {
    Error::PathOption {
        path: path.to_string(),
        source,
    }
}
