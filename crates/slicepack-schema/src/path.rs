//! Content-path and generate-path shape validation.

use crate::error::PathOptionError;

/// Normalize a path the way `path.Clean` would: collapse `.` segments,
/// resolve `..` against the segments seen so far, and collapse duplicate
/// slashes. Input is assumed absolute (leading `/`).
pub fn path_clean(p: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for seg in p.split('/') {
        match seg {
            "" | "." => continue,
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    format!("/{}", out.join("/"))
}

/// Validate a declared content path.
///
/// Must be absolute. A trailing `/` denotes a directory and is left as-is;
/// otherwise the path must already equal its own `path_clean` form (no
/// `.`, `..`, or duplicate slashes).
///
/// # Errors
///
/// Returns `PathOptionError::NotAbsolute` or `PathOptionError::NotClean`.
pub fn validate_content_path(path: &str) -> Result<(), PathOptionError> {
    if !path.starts_with('/') {
        return Err(PathOptionError::NotAbsolute(path.to_string()));
    }
    if path.ends_with('/') {
        return Ok(());
    }
    let cleaned = path_clean(path);
    if cleaned != path {
        return Err(PathOptionError::NotClean(path.to_string(), cleaned));
    }
    Ok(())
}

/// Validate the shape of a `generate` content path: it must end in `/**`,
/// and the prefix (everything before the trailing `**`) must contain no
/// other `*` or `?`.
///
/// Returns the directory prefix, including its trailing `/`, for later use
/// by the conflict checker's glob/generate matching pass.
///
/// # Errors
///
/// Returns `PathOptionError::MalformedGeneratePath` if the path does not
/// end in `/**`, or if the prefix contains a stray wildcard character.
pub fn validate_generate_path_shape(path: &str) -> Result<String, PathOptionError> {
    let Some(prefix) = path.strip_suffix("**") else {
        return Err(PathOptionError::MalformedGeneratePath(
            path.to_string(),
            "must end in /**",
        ));
    };
    if !prefix.ends_with('/') {
        return Err(PathOptionError::MalformedGeneratePath(
            path.to_string(),
            "must end in /**",
        ));
    }
    if prefix.contains('*') || prefix.contains('?') {
        return Err(PathOptionError::MalformedGeneratePath(
            path.to_string(),
            "prefix must not contain another wildcard",
        ));
    }
    Ok(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_paths() {
        assert_eq!(path_clean("/a/b"), "/a/b");
        assert_eq!(path_clean("/a/./b"), "/a/b");
        assert_eq!(path_clean("/a/b/../c"), "/a/c");
        assert_eq!(path_clean("/a//b"), "/a/b");
    }

    #[test]
    fn content_path_validation() {
        assert!(validate_content_path("/a/b").is_ok());
        assert!(validate_content_path("/a/b/").is_ok());
        assert!(validate_content_path("a/b").is_err());
        assert!(validate_content_path("/a/../b").is_err());
        assert!(validate_content_path("/a//b").is_err());
    }

    #[test]
    fn generate_shape() {
        assert_eq!(
            validate_generate_path_shape("/var/lib/manifest/**").unwrap(),
            "/var/lib/manifest/"
        );
        assert!(validate_generate_path_shape("/var/lib/manifest/*").is_err());
        assert!(validate_generate_path_shape("/var/lib/*/manifest/**").is_err());
    }
}
