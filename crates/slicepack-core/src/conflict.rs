//! The two-pass conflict checker: literal-path agreement, then
//! glob/generate coverage of other slices' literal paths.

use std::cmp::Ordering;

use indexmap::IndexMap;
use slicepack_schema::{PathKind, SliceKey};
use tracing::{debug, error};

use crate::error::Error;
use crate::model::Release;

fn owner_order(a: &SliceKey, b: &SliceKey) -> Ordering {
    (a.package(), a.slice()).cmp(&(b.package(), b.slice()))
}

/// Match a declared glob or generate path against a literal content path.
///
/// Within a path segment, `*` and `?` match any run of characters and any
/// single character respectively (never crossing a `/`). A `**` segment
/// matches zero or more whole path segments.
fn glob_match(pattern: &str, candidate: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let candidate_segments: Vec<&str> = candidate.split('/').collect();
    segments_match(&pattern_segments, &candidate_segments)
}

fn segments_match(pattern: &[&str], candidate: &[&str]) -> bool {
    match pattern.split_first() {
        None => candidate.is_empty(),
        Some((seg, rest)) if *seg == "**" => {
            segments_match(rest, candidate)
                || candidate
                    .split_first()
                    .is_some_and(|(_, tail)| segments_match(pattern, tail))
        }
        Some((seg, rest)) => match candidate.split_first() {
            None => false,
            Some((head, tail)) => segment_match(seg, head) && segments_match(rest, tail),
        },
    }
}

fn segment_match(pattern: &str, candidate: &str) -> bool {
    chars_match(pattern.as_bytes(), candidate.as_bytes())
}

fn chars_match(pattern: &[u8], candidate: &[u8]) -> bool {
    match (pattern.first(), candidate.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(b'*'), _) => {
            chars_match(&pattern[1..], candidate)
                || (!candidate.is_empty() && chars_match(pattern, &candidate[1..]))
        }
        (Some(b'?'), Some(_)) => chars_match(&pattern[1..], &candidate[1..]),
        (Some(b'?'), None) => false,
        (Some(&p), Some(&c)) if p == c => chars_match(&pattern[1..], &candidate[1..]),
        _ => false,
    }
}

struct Claim {
    owner: SliceKey,
    info: slicepack_schema::PathInfo,
}

fn agrees(a: &Claim, b: &Claim) -> bool {
    if !a.info.same_content(&b.info) {
        return false;
    }
    match &a.info.kind {
        PathKind::Copy { .. } | PathKind::Glob => a.owner.package() == b.owner.package(),
        _ => true,
    }
}

/// Run both conflict-checking passes over every slice in `release`.
///
/// # Errors
///
/// Returns `Error::Conflict` on the first disagreement found, in stable
/// (package, slice, path) order.
pub fn check_release(release: &Release) -> Result<(), Error> {
    let keys: Vec<SliceKey> = release.all_slices().map(crate::model::Slice::key).collect();
    run(release, &keys, true)
}

/// Run literal-path agreement only (pass A), restricted to `keys`.
///
/// Used by the selector's selection-scoped re-check: the glob/generate
/// coverage pass (pass B) was already enforced release-wide at load time
/// and would otherwise fire for a selection that legitimately omits one
/// side of an intra-package match.
///
/// # Errors
///
/// Returns `Error::Conflict` on the first literal-path disagreement found
/// among the given slices.
pub fn check_literal(release: &Release, keys: &[SliceKey]) -> Result<(), Error> {
    run(release, keys, false)
}

fn run(release: &Release, keys: &[SliceKey], check_wild_pass: bool) -> Result<(), Error> {
    let mut literal: IndexMap<String, Claim> = IndexMap::new();
    let mut wild: IndexMap<String, Claim> = IndexMap::new();

    for key in keys {
        let Some(slice) = release.slice(key) else {
            continue;
        };
        for (path, info) in &slice.contents {
            let claim = Claim {
                owner: key.clone(),
                info: info.clone(),
            };
            if let Some(existing) = literal.get(path) {
                if !agrees(existing, &claim) {
                    let (first, second) = order_pair(&existing.owner, &claim.owner);
                    error!(%path, %first, %second, "literal path conflict");
                    return Err(Error::Conflict(format!(
                        "{path}: {first} and {second} disagree"
                    )));
                }
                debug!(%path, owner = %existing.owner, "literal path agreement");
            } else {
                if matches!(info.kind, PathKind::Glob | PathKind::Generate { .. }) {
                    wild.insert(path.clone(), Claim {
                        owner: key.clone(),
                        info: info.clone(),
                    });
                }
                literal.insert(path.clone(), claim);
            }
        }
    }

    if !check_wild_pass {
        return Ok(());
    }

    let mut wild_paths: Vec<&String> = wild.keys().collect();
    wild_paths.sort();
    for wild_path in wild_paths {
        let wild_claim = &wild[wild_path];
        let mut other_paths: Vec<&String> = literal.keys().collect();
        other_paths.sort();
        for other_path in other_paths {
            if other_path == wild_path {
                continue;
            }
            let other_claim = &literal[other_path];
            if matches!(wild_claim.info.kind, PathKind::Glob)
                && matches!(
                    other_claim.info.kind,
                    PathKind::Glob | PathKind::Copy { .. }
                )
                && wild_claim.owner.package() == other_claim.owner.package()
            {
                continue;
            }
            if glob_match(wild_path, other_path) {
                error!(
                    %wild_path, %other_path,
                    wild_owner = %wild_claim.owner, other_owner = %other_claim.owner,
                    "glob/generate coverage conflict"
                );
                return Err(Error::Conflict(format!(
                    "{wild_path} ({}) covers {other_path} claimed by {}",
                    wild_claim.owner, other_claim.owner
                )));
            }
        }
    }

    Ok(())
}

fn order_pair(a: &SliceKey, b: &SliceKey) -> (SliceKey, SliceKey) {
    if owner_order(a, b) == Ordering::Greater {
        (b.clone(), a.clone())
    } else {
        (a.clone(), b.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_single_segment_wildcard() {
        assert!(glob_match("/usr/bin/*", "/usr/bin/ls"));
        assert!(!glob_match("/usr/bin/*", "/usr/bin/sub/ls"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(glob_match("/var/lib/manifest/**", "/var/lib/manifest/a/b/c"));
        assert!(glob_match("/var/lib/manifest/**", "/var/lib/manifest/a"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(glob_match("/etc/fstab.?", "/etc/fstab.1"));
        assert!(!glob_match("/etc/fstab.?", "/etc/fstab.12"));
    }

    /// Build a two-package release where `glob_pkg` declares a glob over
    /// `/usr/bin/*` and `literal_pkg` declares a literal copy of
    /// `/usr/bin/ls`, with no other overlap between the two packages.
    fn release_with_glob_and_foreign_literal(glob_pkg: &str, literal_pkg: &str) -> Release {
        use crate::model::{Archive, Package, Slice};
        use slicepack_schema::{PathInfo, Until};
        use std::path::PathBuf;

        let mut glob_contents = IndexMap::new();
        glob_contents.insert(
            "/usr/bin/*".to_string(),
            PathInfo {
                kind: PathKind::Glob,
                mode: 0,
                mutable: false,
                until: Until::None,
                arch: vec![],
            },
        );
        let mut literal_contents = IndexMap::new();
        literal_contents.insert(
            "/usr/bin/ls".to_string(),
            PathInfo {
                kind: PathKind::Copy { source: None },
                mode: 0,
                mutable: false,
                until: Until::None,
                arch: vec![],
            },
        );

        let mut glob_slices = IndexMap::new();
        glob_slices.insert(
            "xxx".to_string(),
            Slice {
                package: glob_pkg.to_string(),
                name: "xxx".to_string(),
                essential: vec![],
                contents: glob_contents,
                mutate_script: String::new(),
            },
        );
        let mut literal_slices = IndexMap::new();
        literal_slices.insert(
            "yyy".to_string(),
            Slice {
                package: literal_pkg.to_string(),
                name: "yyy".to_string(),
                essential: vec![],
                contents: literal_contents,
                mutate_script: String::new(),
            },
        );

        let mut packages = IndexMap::new();
        packages.insert(
            glob_pkg.to_string(),
            Package {
                name: glob_pkg.to_string(),
                path: PathBuf::from(format!("slices/{glob_pkg}.yaml")),
                archive: "main".to_string(),
                slices: glob_slices,
            },
        );
        packages.insert(
            literal_pkg.to_string(),
            Package {
                name: literal_pkg.to_string(),
                path: PathBuf::from(format!("slices/{literal_pkg}.yaml")),
                archive: "main".to_string(),
                slices: literal_slices,
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
    fn full_check_rejects_glob_over_foreign_literal_but_literal_only_does_not() {
        let release = release_with_glob_and_foreign_literal("p1", "p2");
        let keys = vec![SliceKey::new("p1", "xxx"), SliceKey::new("p2", "yyy")];

        assert!(matches!(
            check_release(&release).unwrap_err(),
            Error::Conflict(_)
        ));
        assert!(check_literal(&release, &keys).is_ok());
    }

    #[test]
    fn coverage_conflict_attributes_owners_correctly_when_glob_owner_sorts_after() {
        let release = release_with_glob_and_foreign_literal("zz", "aa");

        let err = check_release(&release).unwrap_err();
        let Error::Conflict(message) = err else {
            panic!("expected Conflict, got {err:?}");
        };
        assert!(message.contains("/usr/bin/* (zz_xxx) covers /usr/bin/ls claimed by aa_yyy"));
    }
    }
}
