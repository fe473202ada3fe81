//! Release discovery: read `chisel.yaml`, walk `slices/` for package
//! files, and assemble a `Release`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use slicepack_schema::validate_package_name;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::error::{schema_err, Error};
use crate::model::{Package, Release};
use crate::parse::{parse_package_file, parse_release_file};

/// Load a release rooted at `root`.
///
/// Reads `root/chisel.yaml`, then recursively walks `root/slices/` for
/// `*.yaml` package files. Every package filename stem must match the
/// package-name pattern; one that doesn't is rejected rather than
/// skipped, matching the loader's strict treatment of everything else
/// under `slices/`.
///
/// This does not itself run conflict checking or dependency ordering; see
/// [`crate::model::Release::validate`] for that.
///
/// # Errors
///
/// Returns `Error::Syntax`/`Error::Schema`/`Error::Crypto` from the
/// underlying parsers, or `Error::Schema` if a package is declared twice
/// or names an archive the release doesn't have.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn load_release(root: &Path) -> Result<Release, Error> {
    let release_file_path = root.join("chisel.yaml");
    let bytes = fs::read(&release_file_path)
        .map_err(|e| schema_err("chisel.yaml", format!("could not read chisel.yaml: {e}")))?;
    let release_file = parse_release_file(&bytes, "chisel.yaml")?;

    let slices_dir = root.join("slices");
    let mut packages: IndexMap<String, Package> = IndexMap::new();

    for entry in WalkDir::new(&slices_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(std::ffi::OsStr::to_str) != Some("yaml") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        let display_path = relative.to_string_lossy().to_string();

        let stem = path
            .file_stem()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        validate_package_name(&stem)
            .map_err(|e| schema_err(&display_path, format!("invalid package filename: {e}")))?;

        let bytes = fs::read(path)
            .map_err(|e| schema_err(&display_path, format!("could not read file: {e}")))?;
        debug!(path = %display_path, "discovered package file");
        let mut package = parse_package_file(&bytes, &display_path, path, &stem)?;

        if package.archive.is_empty() {
            package.archive.clone_from(&release_file.default_archive);
        }
        if !release_file.archives.contains_key(&package.archive) {
            return Err(schema_err(
                &display_path,
                format!("package references unknown archive {:?}", package.archive),
            ));
        }

        if packages.contains_key(&package.name) {
            return Err(schema_err(
                &display_path,
                format!("package {:?} is declared more than once", package.name),
            ));
        }
        packages.insert(package.name.clone(), package);
    }

    info!(
        packages = packages.len(),
        archives = release_file.archives.len(),
        "loaded release"
    );

    let release = Release {
        root: root.to_path_buf(),
        public_keys: release_file.public_keys,
        archives: release_file.archives,
        packages,
        default_archive: release_file.default_archive,
    };
    release.validate()?;
    Ok(release)
}
