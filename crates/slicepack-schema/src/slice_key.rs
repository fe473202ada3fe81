//! The canonical `package_slice` slice-key value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentError;
use crate::ident::split_slice_key;

/// A `(package, slice)` pair, the unit of selection and dependency
/// reference throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SliceKey {
    package: String,
    slice: String,
}

impl SliceKey {
    /// Construct a key from already-validated parts, without re-running
    /// the identifier patterns.
    pub fn new(package: impl Into<String>, slice: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            slice: slice.into(),
        }
    }

    /// The package half of the key.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The slice half of the key.
    pub fn slice(&self) -> &str {
        &self.slice
    }
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.package, self.slice)
    }
}

impl FromStr for SliceKey {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (package, slice) = split_slice_key(s)?;
        Ok(Self { package, slice })
    }
}

impl TryFrom<String> for SliceKey {
    type Error = IdentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SliceKey> for String {
    fn from(key: SliceKey) -> Self {
        key.to_string()
    }
}
