//! The in-memory data model: `Release`, `Archive`, `Package`,
//! `Slice`, and `Selection`. All entities are immutable once `load_release`
//! or `select` have returned successfully.

use std::path::PathBuf;

use indexmap::IndexMap;
use slicepack_schema::{PathInfo, SliceKey};

/// A decoded PGP public key, referenced by name from archives.
#[derive(Debug, Clone)]
pub struct PublicKey {
    /// The key's declared, caller-assigned name.
    pub name: String,
    /// The key's declared `id`.
    pub id: String,
    /// Original ASCII-armored key body, kept for round-tripping.
    pub armor: String,
    /// The fingerprint decoded from `armor`, verified to equal `id`.
    pub fingerprint: String,
}

/// A named source of binary packages.
#[derive(Debug, Clone)]
pub struct Archive {
    /// The archive's name.
    pub name: String,
    /// Distribution version string.
    pub version: String,
    /// Suite names, non-empty.
    pub suites: Vec<String>,
    /// Component names, non-empty.
    pub components: Vec<String>,
    /// Names of public keys (resolved against [`Release::public_keys`]).
    pub public_keys: Vec<String>,
}

/// A named sub-package: a subset of a binary package's files plus an
/// optional mutation script.
#[derive(Debug, Clone)]
pub struct Slice {
    /// The owning package's name.
    pub package: String,
    /// This slice's name.
    pub name: String,
    /// Hard dependencies on other slices, package-level essentials merged
    /// in first, then this slice's own.
    pub essential: Vec<SliceKey>,
    /// Content-path declarations, keyed by the declared path string.
    pub contents: IndexMap<String, PathInfo>,
    /// Opaque mutation-script text; the engine never evaluates it.
    pub mutate_script: String,
}

impl Slice {
    /// This slice's canonical `package_slice` key.
    pub fn key(&self) -> SliceKey {
        SliceKey::new(self.package.clone(), self.name.clone())
    }
}

/// A binary package: a named, versioned source of slices.
#[derive(Debug, Clone)]
pub struct Package {
    /// The package's name, matching the source filename stem.
    pub name: String,
    /// Filesystem path of the package file, for diagnostics.
    pub path: PathBuf,
    /// Name of the archive this package is drawn from.
    pub archive: String,
    /// This package's slices, keyed by slice name.
    pub slices: IndexMap<String, Slice>,
}

/// The full parsed world rooted at one release directory.
#[derive(Debug, Clone)]
pub struct Release {
    /// Filesystem path this release was loaded from.
    pub root: PathBuf,
    /// All known public keys, by name.
    pub public_keys: IndexMap<String, PublicKey>,
    /// All archives, by name.
    pub archives: IndexMap<String, Archive>,
    /// All packages, by name.
    pub packages: IndexMap<String, Package>,
    /// Name of the release-wide default archive.
    pub default_archive: String,
}

impl Release {
    /// Look up a slice by its key.
    pub fn slice(&self, key: &SliceKey) -> Option<&Slice> {
        self.packages
            .get(key.package())
            .and_then(|pkg| pkg.slices.get(key.slice()))
    }

    /// The archive a package draws from.
    pub fn archive_for(&self, package: &Package) -> Option<&Archive> {
        self.archives.get(&package.archive)
    }

    /// Every slice belonging to one package, in declaration order.
    pub fn slices_of<'a>(&'a self, package: &'a Package) -> impl Iterator<Item = &'a Slice> {
        package.slices.values()
    }

    /// Every slice of every package, in package-then-slice insertion
    /// order.
    pub fn all_slices(&self) -> impl Iterator<Item = &Slice> {
        self.packages.values().flat_map(|pkg| pkg.slices.values())
    }

    /// Validate this release as a whole: every literal path agrees across
    /// the slices that declare it, every glob/generate path only covers
    /// paths in its own package, and the essential graph over every slice
    /// is free of cycles.
    ///
    /// # Errors
    ///
    /// Returns `Error::Conflict` or `Error::Cycle` on the first violation
    /// found, or `Error::Dependency` if a slice's essential list names a
    /// non-existent package or slice.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        crate::conflict::check_release(self)?;
        let all_keys: Vec<SliceKey> = self.all_slices().map(Slice::key).collect();
        crate::orderer::order(self, &all_keys)?;
        Ok(())
    }
}

/// A validated, topologically ordered subset of a release's slices.
#[derive(Debug)]
pub struct Selection<'r> {
    release: &'r Release,
    order: Vec<SliceKey>,
}

impl<'r> Selection<'r> {
    pub(crate) fn new(release: &'r Release, order: Vec<SliceKey>) -> Self {
        Self { release, order }
    }

    /// The release this selection was drawn from.
    pub fn release(&self) -> &'r Release {
        self.release
    }

    /// The selected slices, in build-safe (dependency-respecting) order.
    pub fn slices(&self) -> impl Iterator<Item = &'r Slice> + '_ {
        self.order
            .iter()
            .map(move |key| self.release.slice(key).expect("selection keys are valid"))
    }

    /// The selected slice keys, in the same order as [`Selection::slices`].
    pub fn slice_keys(&self) -> impl Iterator<Item = &SliceKey> {
        self.order.iter()
    }

    /// Number of selected slices.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
