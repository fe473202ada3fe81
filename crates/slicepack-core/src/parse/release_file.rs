//! Top-level release-file (`chisel.yaml`) decoding: format recognition,
//! archive validation, and public-key decoding.

use indexmap::IndexMap;

use crate::codename::default_suite_for_version;
use crate::crypto::decode_public_key_fingerprint;
use crate::error::{schema_err, syntax_err, Error};
use crate::model::{Archive, PublicKey};

use super::wire::{RawArchive, RawPublicKey, RawReleaseFile};

/// The decoded contents of a release file: its archives, its public keys,
/// and the name of the default archive.
pub(crate) struct ReleaseFile {
    pub(crate) archives: IndexMap<String, Archive>,
    pub(crate) public_keys: IndexMap<String, PublicKey>,
    pub(crate) default_archive: String,
}

/// Parse and validate a `chisel.yaml` body.
///
/// `display_path` is used only for diagnostics.
///
/// # Errors
///
/// Returns `Error::Syntax` if the YAML itself doesn't parse, `Error::Schema`
/// for an unrecognized format tag or an invalid archive, and
/// `Error::Crypto` if a public key's armor doesn't decode or its
/// fingerprint doesn't match its declared `id`.
pub(crate) fn parse_release_file(bytes: &[u8], display_path: &str) -> Result<ReleaseFile, Error> {
    let mut raw: RawReleaseFile =
        serde_yaml::from_slice(bytes).map_err(|e| syntax_err(display_path, e))?;

    match raw.format.as_str() {
        "v1" => {}
        "chisel-v1" => normalize_legacy_format(&mut raw),
        other => {
            return Err(schema_err(
                display_path,
                format!("unrecognized format {other:?}"),
            ))
        }
    }

    let public_keys = build_public_keys(raw.public_keys, display_path)?;

    if raw.archives.is_empty() {
        return Err(schema_err(display_path, "release declares no archives"));
    }

    let mut archives = IndexMap::new();
    let mut default_candidates: Vec<String> = Vec::new();
    for (name, raw_archive) in raw.archives {
        if raw_archive.default {
            default_candidates.push(name.clone());
        }
        let archive = build_archive(&name, raw_archive, &public_keys, display_path)?;
        archives.insert(name, archive);
    }

    let default_archive = match default_candidates.len() {
        0 if archives.len() == 1 => archives.keys().next().cloned().expect("non-empty"),
        0 => {
            return Err(schema_err(
                display_path,
                "no archive marked `default: true` and more than one archive is declared",
            ))
        }
        1 => default_candidates.remove(0),
        _ => {
            return Err(schema_err(
                display_path,
                format!(
                    "more than one archive marked `default: true`: {}",
                    default_candidates.join(", ")
                ),
            ))
        }
    };

    Ok(ReleaseFile {
        archives,
        public_keys,
        default_archive,
    })
}

/// Alias `v1-public-keys` fields onto their canonical `public-keys`
/// counterparts, both at the top level and within each archive, when the
/// canonical field was left empty.
fn normalize_legacy_format(raw: &mut RawReleaseFile) {
    if raw.public_keys.is_empty() {
        raw.public_keys = std::mem::take(&mut raw.v1_public_keys);
    }
    for archive in raw.archives.values_mut() {
        if archive.public_keys.is_none() {
            archive.public_keys = archive.v1_public_keys.take();
        }
    }
}

fn build_public_keys(
    raw_keys: IndexMap<String, RawPublicKey>,
    display_path: &str,
) -> Result<IndexMap<String, PublicKey>, Error> {
    let mut keys = IndexMap::new();
    for (name, raw) in raw_keys {
        let fingerprint = decode_public_key_fingerprint(&raw.armor)?;
        if fingerprint != raw.id {
            return Err(Error::Crypto(format!(
                "{display_path}: public key {name:?} declares id {:?} but its armor decodes to fingerprint {fingerprint:?}",
                raw.id
            )));
        }
        keys.insert(
            name.clone(),
            PublicKey {
                name,
                id: raw.id,
                armor: raw.armor,
                fingerprint,
            },
        );
    }
    Ok(keys)
}

fn build_archive(
    name: &str,
    raw: RawArchive,
    public_keys: &IndexMap<String, PublicKey>,
    display_path: &str,
) -> Result<Archive, Error> {
    if raw.version.is_empty() {
        return Err(schema_err(
            display_path,
            format!("archive {name:?} has an empty version"),
        ));
    }
    let suites = match raw.suites {
        Some(suites) if !suites.is_empty() => suites,
        Some(_) => {
            return Err(schema_err(
                display_path,
                format!("archive {name:?} declares an empty `suites` list"),
            ))
        }
        None => {
            let codename = default_suite_for_version(&raw.version).ok_or_else(|| {
                schema_err(
                    display_path,
                    format!(
                        "archive {name:?} omits `suites` and version {:?} has no default codename",
                        raw.version
                    ),
                )
            })?;
            vec![codename.to_string()]
        }
    };
    if raw.components.is_empty() {
        return Err(schema_err(
            display_path,
            format!("archive {name:?} declares no components"),
        ));
    }

    let declared_keys = raw.public_keys.or(raw.v1_public_keys).unwrap_or_default();
    if declared_keys.is_empty() {
        return Err(schema_err(
            display_path,
            format!("archive {name:?} declares no public keys"),
        ));
    }
    for key_name in &declared_keys {
        if !public_keys.contains_key(key_name) {
            return Err(schema_err(
                display_path,
                format!("archive {name:?} references unknown public key {key_name:?}"),
            ));
        }
    }

    Ok(Archive {
        name: name.to_string(),
        version: raw.version,
        suites,
        components: raw.components,
        public_keys: declared_keys,
    })
}
