//! `PathKind`/`PathInfo` — the tagged model for a single content-path
//! declaration, and the inference algorithm that turns a raw set of
//! per-path options into one.

use serde::{Deserialize, Serialize};

use crate::error::PathOptionError;
use crate::path::validate_generate_path_shape;

/// The value of the `generate` tag on a `Generate` path.
///
/// Only `Manifest` is a currently-defined sink; anything else is preserved
/// verbatim so that a release still loads successfully; unrecognized
/// values are only fatal once the owning slice is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerateKind {
    /// No generate sink (not a Generate path).
    None,
    /// The directory is a sink for a generated manifest.
    Manifest,
    /// An unrecognized generate tag, preserved for round-tripping.
    Unknown(String),
}

/// Lifetime marker for a content path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Until {
    /// No lifetime restriction.
    #[default]
    None,
    /// Present only while mutation scripts run.
    Mutate,
}

/// The kind of a content path, carrying its kind-specific payload.
///
/// Tagged as a sum type rather than a separate `kind`/`info` pair so that
/// the kind/payload relationship is a compile-time obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    /// An empty directory, created fresh.
    Dir,
    /// A file or directory tree copied from `source`. `None` means "copy
    /// from the same path" (the self-copy shorthand).
    Copy { source: Option<String> },
    /// A path containing `*`/`?`, matched against real paths at extraction.
    Glob,
    /// A file whose content is the literal string `body`.
    Text { body: String },
    /// A symlink pointing at `target`.
    Symlink { target: String },
    /// A directory that is a sink for runtime-produced content.
    Generate { kind: GenerateKind },
}

/// A fully-validated content-path declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathInfo {
    /// The path's kind and kind-specific payload.
    pub kind: PathKind,
    /// Unix permission bits; `0` means "inherit".
    pub mode: u32,
    /// Whether the path's final content is not fully determined here.
    pub mutable: bool,
    /// Lifetime marker.
    pub until: Until,
    /// Architectures this path applies to; empty means "all".
    pub arch: Vec<String>,
}

impl PathInfo {
    /// Two `PathInfo`s "agree" for conflict-checking purposes: same kind
    /// (the generate tag lives inside `PathKind::Generate`, so this also
    /// covers it), same mode, same mutable flag. `until` and `arch` are
    /// scoping metadata, not content, and are deliberately excluded: two
    /// slices may declare the same path with the same content but
    /// different `arch`/`until` scoping without conflicting.
    pub fn same_content(&self, other: &Self) -> bool {
        self.kind == other.kind && self.mode == other.mode && self.mutable == other.mutable
    }
}

/// The raw, not-yet-validated per-path options as they appear in a package
/// file, independent of how they were decoded from YAML.
#[derive(Debug, Clone, Default)]
pub struct RawPathOptions {
    /// `make: true`.
    pub make: bool,
    /// `text: <string>`. `Some` even when the string is empty — presence
    /// of the key, not its value, is what triggers the Text kind.
    pub text: Option<String>,
    /// `symlink: <string>`.
    pub symlink: Option<String>,
    /// `copy: <string>`.
    pub copy: Option<String>,
    /// `generate: <string>`. Only a non-empty value selects the Generate
    /// kind; a present-but-empty value is treated as unset.
    pub generate: Option<String>,
    /// `mode: <octal>`.
    pub mode: u32,
    /// `mutable: <bool>`.
    pub mutable: bool,
    /// `until: <string>`, pre-validation.
    pub until: Option<String>,
    /// `arch: <string>` or `arch: [<string>, ...]`, pre-validation.
    pub arch: Vec<String>,
}

impl RawPathOptions {
    fn is_zero_except_mode_and_arch(&self) -> bool {
        !self.make
            && self.text.is_none()
            && self.symlink.is_none()
            && self.copy.is_none()
            && !self.mutable
            && self.until.is_none()
    }
}

fn parse_until(raw: &Option<String>, path: &str) -> Result<Until, PathOptionError> {
    match raw.as_deref() {
        None => Ok(Until::None),
        Some("mutate") => Ok(Until::Mutate),
        Some(other) => Err(PathOptionError::InvalidUntil(
            path.to_string(),
            other.to_string(),
        )),
    }
}

/// Infer the `PathInfo` for one content-path declaration.
///
/// `path` is the declared content path (already shape-validated by the
/// caller via [`crate::path::validate_content_path`]).
///
/// # Errors
///
/// Returns `PathOptionError` for any of the following combinations: a
/// malformed generate path, extra options alongside
/// `generate` or a glob, an ambiguous kind, `make: true` without a
/// trailing slash, or `mutable: true` on an unsupported kind.
pub fn infer_path_info(path: &str, raw: RawPathOptions) -> Result<PathInfo, PathOptionError> {
    let until = parse_until(&raw.until, path)?;

    let kind = if let Some(generate) = raw.generate.as_deref().filter(|g| !g.is_empty()) {
        if !raw.is_zero_except_mode_and_arch() || until != Until::None {
            return Err(PathOptionError::GenerateWithExtraOptions(path.to_string()));
        }
        validate_generate_path_shape(path)?;
        let kind = match generate {
            "manifest" => GenerateKind::Manifest,
            other => GenerateKind::Unknown(other.to_string()),
        };
        PathKind::Generate { kind }
    } else if path.contains('*') || path.contains('?') {
        if !raw.is_zero_except_mode_and_arch() {
            return Err(PathOptionError::GlobWithExtraOptions(path.to_string()));
        }
        PathKind::Glob
    } else {
        infer_concrete_kind(path, &raw)?
    };

    if raw.mutable && !matches!(&kind, PathKind::Text { .. } | PathKind::Copy { .. }) {
        return Err(PathOptionError::MutableOnUnsupportedKind(path.to_string()));
    }
    if raw.mutable {
        if let PathKind::Copy { .. } = &kind {
            if path.ends_with('/') {
                return Err(PathOptionError::MutableOnUnsupportedKind(path.to_string()));
            }
        }
    }

    Ok(PathInfo {
        kind,
        mode: raw.mode,
        mutable: raw.mutable,
        until,
        arch: raw.arch,
    })
}

fn infer_concrete_kind(path: &str, raw: &RawPathOptions) -> Result<PathKind, PathOptionError> {
    let mut candidates: Vec<(&'static str, PathKind)> = Vec::new();

    if raw.make {
        if !path.ends_with('/') {
            return Err(PathOptionError::DirNotSlashTerminated(path.to_string()));
        }
        candidates.push(("make", PathKind::Dir));
    }
    if let Some(text) = &raw.text {
        candidates.push((
            "text",
            PathKind::Text {
                body: text.clone(),
            },
        ));
    }
    if let Some(symlink) = &raw.symlink {
        candidates.push((
            "symlink",
            PathKind::Symlink {
                target: symlink.clone(),
            },
        ));
    }
    if let Some(copy) = &raw.copy {
        let source = if copy == path { None } else { Some(copy.clone()) };
        candidates.push(("copy", PathKind::Copy { source }));
    }

    match candidates.len() {
        0 => Ok(PathKind::Copy { source: None }),
        1 => Ok(candidates.pop().expect("len checked").1),
        _ => Err(PathOptionError::AmbiguousKind(
            path.to_string(),
            candidates.iter().map(|(label, _)| *label).collect(),
        )),
    }
}
