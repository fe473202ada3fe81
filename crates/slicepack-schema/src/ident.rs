//! Package, slice, and slice-key identifier validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::IdentError;

fn package_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9](-?[.a-z0-9+])+$").expect("valid regex"))
}

fn slice_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z](-?[a-z0-9]){2,}$").expect("valid regex"))
}

/// Validate a package name against `[a-z0-9](-?[.a-z0-9+])+`.
///
/// # Errors
///
/// Returns `IdentError::InvalidPackageName` if `name` does not match.
pub fn validate_package_name(name: &str) -> Result<(), IdentError> {
    if package_name_re().is_match(name) {
        Ok(())
    } else {
        Err(IdentError::InvalidPackageName(name.to_string()))
    }
}

/// Validate a slice name against `[a-z](-?[a-z0-9]){2,}`.
///
/// # Errors
///
/// Returns `IdentError::InvalidSliceName` if `name` does not match.
pub fn validate_slice_name(name: &str) -> Result<(), IdentError> {
    if slice_name_re().is_match(name) {
        Ok(())
    } else {
        Err(IdentError::InvalidSliceName(name.to_string()))
    }
}

/// Split and validate a slice-key string of the form `<package>_<slice>`.
///
/// Neither half's character class admits `_`, so splitting on the first
/// underscore unambiguously separates package from slice.
///
/// # Errors
///
/// Returns `IdentError::InvalidSliceKey` if there is no underscore, or if
/// either half fails its own pattern check.
pub fn split_slice_key(key: &str) -> Result<(String, String), IdentError> {
    let Some(idx) = key.find('_') else {
        return Err(IdentError::InvalidSliceKey(key.to_string()));
    };
    let (pkg, rest) = key.split_at(idx);
    let slice = &rest[1..];

    validate_package_name(pkg).map_err(|_| IdentError::InvalidSliceKey(key.to_string()))?;
    validate_slice_name(slice).map_err(|_| IdentError::InvalidSliceKey(key.to_string()))?;

    Ok((pkg.to_string(), slice.to_string()))
}
