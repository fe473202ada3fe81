//! Turning a requested set of slice keys into a validated `Selection`.

use slicepack_schema::{GenerateKind, PathKind, SliceKey};

use crate::conflict::check_literal;
use crate::error::Error;
use crate::model::{Release, Selection};
use crate::orderer::order;

/// Select `requested` slices out of `release`.
///
/// Pulls in every transitive essential dependency, orders the result so
/// dependencies precede dependents, re-checks conflicts scoped to exactly
/// that set, and rejects any selected path whose `generate` tag isn't one
/// the engine recognizes.
///
/// # Errors
///
/// Returns `Error::Selection` if a requested key names a slice not in the
/// release or a selected path has an unrecognized `generate` value,
/// `Error::Dependency`/`Error::Cycle` from the orderer, or `Error::Conflict`
/// from the scoped conflict re-check.
pub fn select<'r>(release: &'r Release, requested: &[SliceKey]) -> Result<Selection<'r>, Error> {
    for key in requested {
        if release.slice(key).is_none() {
            return Err(Error::Selection(format!(
                "requested slice {key} is not in the release"
            )));
        }
    }

    let ordered = order(release, requested)?;
    check_literal(release, &ordered)?;

    for key in &ordered {
        let slice = release.slice(key).expect("orderer only returns existing slices");
        for (path, info) in &slice.contents {
            if let PathKind::Generate { kind: GenerateKind::Unknown(tag) } = &info.kind {
                return Err(Error::Selection(format!(
                    "{key}: {path}: unrecognized generate value {tag:?}"
                )));
            }
        }
    }

    Ok(Selection::new(release, ordered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Archive, Package, Slice};
    use indexmap::IndexMap;
    use slicepack_schema::PathInfo;
    use std::path::PathBuf;

    fn release_with(contents: IndexMap<String, PathInfo>) -> Release {
        let mut slices = IndexMap::new();
        slices.insert(
            "copy".to_string(),
            Slice {
                package: "p".to_string(),
                name: "copy".to_string(),
                essential: vec![],
                contents,
                mutate_script: String::new(),
            },
        );
        let mut packages = IndexMap::new();
        packages.insert(
            "p".to_string(),
            Package {
                name: "p".to_string(),
                path: PathBuf::from("slices/p.yaml"),
                archive: "main".to_string(),
                slices,
            },
        );
        let mut archives = IndexMap::new();
        archives.insert(
            "main".to_string(),
            Archive {
                name: "main".to_string(),
                version: "22.04".to_string(),
                suites: vec!["jammy".to_string()],
                components: vec!["main".to_string()],
                public_keys: vec![],
            },
        );
        Release {
            root: PathBuf::from("/tmp"),
            public_keys: IndexMap::new(),
            archives,
            packages,
            default_archive: "main".to_string(),
        }
    }

    #[test]
    fn rejects_unrecognized_generate_value_only_at_selection_time() {
        let mut contents = IndexMap::new();
        contents.insert(
            "/var/lib/manifest/**".to_string(),
            PathInfo {
                kind: PathKind::Generate {
                    kind: GenerateKind::Unknown("bogus".to_string()),
                },
                mode: 0,
                mutable: false,
                until: slicepack_schema::Until::None,
                arch: vec![],
            },
        );
        let release = release_with(contents);
        let err = select(&release, &[SliceKey::new("p", "copy")]).unwrap_err();
        assert!(matches!(err, Error::Selection(_)));
    }

    #[test]
    fn requesting_a_missing_slice_is_a_selection_error() {
        let release = release_with(IndexMap::new());
        let err = select(&release, &[SliceKey::new("p", "no-such-slice")]).unwrap_err();
        assert!(matches!(err, Error::Selection(_)));
    }
}
