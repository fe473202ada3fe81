//! The release model and slice selection engine.
//!
//! A [`model::Release`] is produced by [`load_release`], which reads a
//! release directory's `chisel.yaml` and every package file under
//! `slices/`, and validates the result as a whole (no path conflicts, no
//! dependency cycles). From a loaded release, [`select`] turns a
//! caller-chosen set of slice keys into a [`model::Selection`]: the
//! transitive closure of their essential dependencies, ordered so that
//! dependencies precede dependents.
//!
//! Nothing in this crate touches a package archive, extracts a file, or
//! runs a mutation script — it answers "what would be installed, in what
//! order, from where" and stops there.

/// The version-to-codename defaulting table, used when an archive omits
/// `suites`.
mod codename;
/// The two-pass conflict checker.
pub mod conflict;
/// PGP public-key armor decoding.
pub mod crypto;
/// The engine's single error type.
pub mod error;
/// Release discovery: `chisel.yaml` plus the `slices/` tree.
mod loader;
/// The in-memory data model.
pub mod model;
/// The dependency orderer (essential-graph topological sort).
pub mod orderer;
/// YAML decoding for release and package files.
mod parse;
/// Turning requested slice keys into a validated selection.
mod selector;
/// Projecting a `PathInfo` back into its declarative record shape.
pub mod serialize;

pub use error::Error;
pub use loader::load_release;
pub use model::{Archive, Package, PublicKey, Release, Selection, Slice};
pub use selector::select;

pub use slicepack_schema::{
    GenerateKind, IdentError, PathInfo, PathKind, PathOptionError, SliceKey, Until,
};
