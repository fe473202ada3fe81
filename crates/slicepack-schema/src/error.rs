//! Error types for identifier and path-option validation.

use thiserror::Error;

/// An identifier (package name, slice name, or slice key) failed its
/// pattern check.
///
/// See the identifier-validator module for the authoritative character
/// classes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentError {
    /// A package name did not match `[a-z0-9](-?[.a-z0-9+])+`.
    #[error("invalid package name {0:?}")]
    InvalidPackageName(String),

    /// A slice name did not match `[a-z](-?[a-z0-9]){{2,}}`.
    #[error("invalid slice name {0:?}")]
    InvalidSliceName(String),

    /// A slice key did not split into `<package>_<slice>` with both halves
    /// individually valid.
    #[error("invalid slice key {0:?}")]
    InvalidSliceKey(String),

    /// An architecture identifier was not recognized.
    #[error("unknown architecture {0:?}")]
    UnknownArch(String),
}

/// A per-path option combination, or the path string itself, violated one
/// of the shape rules for content paths and per-path options.
///
/// This is the schema-level half of what the top-level engine exposes as
/// `Error::PathOption`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathOptionError {
    /// The content path was not absolute.
    #[error("content path {0:?} is not absolute")]
    NotAbsolute(String),

    /// The non-directory form of a content path was not already clean
    /// (contained `.`, `..`, or a duplicate slash).
    #[error("content path {0:?} is not clean (expected {1:?})")]
    NotClean(String, String),

    /// A `generate` path did not end in `/**`, or its prefix contained a
    /// second wildcard character.
    #[error("malformed generate path {0:?}: {1}")]
    MalformedGeneratePath(String, &'static str),

    /// `generate` was set alongside another path option.
    #[error("path {0:?} sets `generate` together with other options")]
    GenerateWithExtraOptions(String),

    /// The path string contains `*`/`?` (making it a glob) and also sets a
    /// non-glob option.
    #[error("glob path {0:?} sets non-glob options")]
    GlobWithExtraOptions(String),

    /// More than one of `make`/`text`/`symlink`/`copy` was set on the same
    /// path, so the kind is ambiguous.
    #[error("path {0:?} is ambiguous: matches kinds {1:?}")]
    AmbiguousKind(String, Vec<&'static str>),

    /// `make: true` was set but the path does not end in `/`.
    #[error("path {0:?} has `make: true` but does not end in '/'")]
    DirNotSlashTerminated(String),

    /// `mutable: true` was set on a kind other than Text or (non-directory)
    /// Copy.
    #[error("path {0:?} sets `mutable: true` on a kind that does not support it")]
    MutableOnUnsupportedKind(String),

    /// `until` held a value other than the empty/unset state or `"mutate"`.
    #[error("path {0:?} has invalid `until` value {1:?}")]
    InvalidUntil(String, String),
}
