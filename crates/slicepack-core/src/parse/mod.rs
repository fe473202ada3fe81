//! YAML decoding for both release and package files.

mod package_file;
mod release_file;
mod wire;

pub(crate) use package_file::parse_package_file;
pub(crate) use release_file::{parse_release_file, ReleaseFile};
