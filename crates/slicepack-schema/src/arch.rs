//! Architecture identifier recognition.
//!
//! The engine only needs to know whether an `arch:` value names a
//! recognized platform identifier; it never branches on CPU features
//! itself: validation beyond "is this a recognized identifier" is
//! delegated to an arch validator collaborator.

use crate::error::IdentError;

/// Recognized Debian-style architecture identifiers.
///
/// This is the fixed vocabulary the collaborator accepts. `all` is the
/// architecture-independent wildcard and is always accepted.
const KNOWN_ARCHES: &[&str] = &[
    "all", "amd64", "arm64", "armhf", "armel", "i386", "mips64el", "mipsel", "ppc64el", "riscv64",
    "s390x",
];

/// Validate that `id` names a recognized architecture identifier.
///
/// # Errors
///
/// Returns `IdentError::UnknownArch` if `id` is not in the known set.
pub fn validate_arch(id: &str) -> Result<(), IdentError> {
    if KNOWN_ARCHES.contains(&id) {
        Ok(())
    } else {
        Err(IdentError::UnknownArch(id.to_string()))
    }
}
