//! Identifier validators and the path-kind model shared by the release
//! loader, conflict checker, and selector.
//!
//! This crate has no knowledge of YAML, the filesystem, or PGP — it is the
//! closed vocabulary of names and path kinds that the engine crate
//! (`slicepack-core`) builds its parsing and validation passes on top of.

/// CPU/platform architecture identifier validation.
pub mod arch;
/// Shared error types for identifier and path-option validation.
pub mod error;
/// Package, slice, and slice-key identifier patterns.
pub mod ident;
/// `PathKind`, `PathInfo`, and per-path option inference.
pub mod kinds;
/// Content-path and generate-path shape validation.
pub mod path;
/// The canonical `package_slice` slice-key value type.
pub mod slice_key;

pub use arch::validate_arch;
pub use error::{IdentError, PathOptionError};
pub use ident::{split_slice_key, validate_package_name, validate_slice_name};
pub use kinds::{GenerateKind, PathInfo, PathKind, RawPathOptions, Until};
pub use path::{path_clean, validate_content_path, validate_generate_path_shape};
pub use slice_key::SliceKey;
