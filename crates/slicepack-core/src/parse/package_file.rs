//! Package-file decoding: filename/field agreement, essential-list
//! merging, and per-path kind inference.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use slicepack_schema::{
    infer_path_info, validate_content_path, validate_package_name, validate_slice_name, RawPathOptions,
    SliceKey,
};

use crate::error::{path_option_err, schema_err, syntax_err, Error};
use crate::model::{Package, Slice};

use super::wire::{RawPackageFile, RawPathRecord, RawSlice};

/// Parse and validate one package file.
///
/// `display_path` is used for diagnostics; `filename_stem` is the
/// filename without its `.yaml` extension, already known to match the
/// package-name pattern (the loader checks that independently of the
/// in-file `package` field).
///
/// # Errors
///
/// Returns `Error::Syntax` for malformed YAML, `Error::Schema` if the
/// `package` field disagrees with the filename or a slice/package name is
/// invalid, `Error::Dependency` for a malformed, self-referencing, or
/// duplicate essential reference, and `Error::PathOption` for an invalid
/// content-path declaration.
pub(crate) fn parse_package_file(
    bytes: &[u8],
    display_path: &str,
    file_path: &Path,
    filename_stem: &str,
) -> Result<Package, Error> {
    let raw: RawPackageFile =
        serde_yaml::from_slice(bytes).map_err(|e| syntax_err(display_path, e))?;

    if raw.package != filename_stem {
        return Err(schema_err(
            display_path,
            format!(
                "package field {:?} does not match filename stem {filename_stem:?}",
                raw.package
            ),
        ));
    }
    validate_package_name(&raw.package).map_err(|e| schema_err(display_path, e.to_string()))?;

    let mut slices = IndexMap::new();
    for (slice_name, raw_slice) in raw.slices {
        validate_slice_name(&slice_name).map_err(|e| schema_err(display_path, e.to_string()))?;
        let slice = build_slice(&raw.package, &slice_name, raw_slice, &raw.essential, display_path)?;
        slices.insert(slice_name, slice);
    }

    Ok(Package {
        name: raw.package,
        path: file_path.to_path_buf(),
        archive: raw.archive,
        slices,
    })
}

fn build_slice(
    package: &str,
    slice_name: &str,
    raw: RawSlice,
    package_essential: &[String],
    display_path: &str,
) -> Result<Slice, Error> {
    let essential = merge_essential(
        package,
        slice_name,
        package_essential,
        &raw.essential,
        display_path,
    )?;

    let mut contents = IndexMap::new();
    for (path, record) in raw.contents {
        validate_content_path(&path).map_err(|e| path_option_err(display_path, e))?;
        let options = build_raw_options(record, &path, display_path)?;
        let info = infer_path_info(&path, options).map_err(|e| path_option_err(display_path, e))?;
        contents.insert(path, info);
    }

    Ok(Slice {
        package: package.to_string(),
        name: slice_name.to_string(),
        essential,
        contents,
        mutate_script: raw.mutate_script,
    })
}

fn build_raw_options(
    record: RawPathRecord,
    path: &str,
    display_path: &str,
) -> Result<RawPathOptions, Error> {
    let arch = record.arch.map(super::wire::ArchField::into_vec).unwrap_or_default();
    for id in &arch {
        slicepack_schema::validate_arch(id).map_err(|e| {
            schema_err(display_path, format!("{path}: {e}"))
        })?;
    }

    Ok(RawPathOptions {
        make: record.make,
        text: record.text,
        symlink: record.symlink,
        copy: record.copy,
        generate: record.generate,
        mode: record.mode,
        mutable: record.mutable,
        until: record.until,
        arch,
    })
}

/// Merge a package's shared essential list with one slice's own, per the
/// reference semantics: a self-reference coming from the package level is
/// silently dropped (it's a convenience default, not a real cycle), but a
/// self-reference at the slice level is fatal, as is any duplicate.
fn merge_essential(
    package: &str,
    slice_name: &str,
    package_level: &[String],
    slice_level: &[String],
    display_path: &str,
) -> Result<Vec<SliceKey>, Error> {
    let self_key = SliceKey::new(package, slice_name);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for raw in package_level {
        let key = parse_essential_ref(raw, display_path)?;
        if key == self_key {
            continue;
        }
        if !seen.insert(key.clone()) {
            return Err(Error::Dependency(format!(
                "{display_path}: {self_key}: duplicate essential reference {key}"
            )));
        }
        out.push(key);
    }

    for raw in slice_level {
        let key = parse_essential_ref(raw, display_path)?;
        if key == self_key {
            return Err(Error::Dependency(format!(
                "{display_path}: slice {self_key} references itself as essential"
            )));
        }
        if !seen.insert(key.clone()) {
            return Err(Error::Dependency(format!(
                "{display_path}: {self_key}: duplicate essential reference {key}"
            )));
        }
        out.push(key);
    }

    Ok(out)
}

fn parse_essential_ref(raw: &str, display_path: &str) -> Result<SliceKey, Error> {
    raw.parse::<SliceKey>().map_err(|e| {
        Error::Dependency(format!(
            "{display_path}: invalid essential reference {raw:?}: {e}"
        ))
    })
}
