//! Serde structs mirroring the declarative YAML shapes, before any
//! validation or legacy-format normalization is applied.

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RawReleaseFile {
    pub(super) format: String,
    #[serde(default)]
    pub(super) archives: IndexMap<String, RawArchive>,
    #[serde(rename = "public-keys", default)]
    pub(super) public_keys: IndexMap<String, RawPublicKey>,
    #[serde(rename = "v1-public-keys", default)]
    pub(super) v1_public_keys: IndexMap<String, RawPublicKey>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawArchive {
    pub(super) version: String,
    #[serde(default)]
    pub(super) suites: Option<Vec<String>>,
    #[serde(default)]
    pub(super) components: Vec<String>,
    #[serde(default)]
    pub(super) default: bool,
    #[serde(rename = "public-keys", default)]
    pub(super) public_keys: Option<Vec<String>>,
    #[serde(rename = "v1-public-keys", default)]
    pub(super) v1_public_keys: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPublicKey {
    pub(super) id: String,
    pub(super) armor: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPackageFile {
    pub(super) package: String,
    #[serde(default)]
    pub(super) archive: String,
    #[serde(default)]
    pub(super) essential: Vec<String>,
    #[serde(default)]
    pub(super) slices: IndexMap<String, RawSlice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSlice {
    #[serde(default)]
    pub(super) essential: Vec<String>,
    #[serde(default)]
    pub(super) contents: IndexMap<String, RawPathRecord>,
    #[serde(default, rename = "mutate")]
    pub(super) mutate_script: String,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawPathRecord {
    #[serde(default)]
    pub(super) make: bool,
    pub(super) text: Option<String>,
    pub(super) symlink: Option<String>,
    pub(super) copy: Option<String>,
    pub(super) generate: Option<String>,
    #[serde(default)]
    pub(super) mode: u32,
    #[serde(default)]
    pub(super) mutable: bool,
    pub(super) until: Option<String>,
    #[serde(default)]
    pub(super) arch: Option<ArchField>,
}

/// `arch:` accepts either a single identifier or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ArchField {
    Single(String),
    List(Vec<String>),
}

impl ArchField {
    pub(super) fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s],
            Self::List(v) => v,
        }
    }
}
