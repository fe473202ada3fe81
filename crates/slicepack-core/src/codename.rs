//! The version-to-codename defaulting table, used only when an
//! archive omits `suites`.

const VERSION_CODENAMES: &[(&str, &str)] = &[
    ("18.04", "bionic"),
    ("20.04", "focal"),
    ("22.04", "jammy"),
    ("22.10", "kinetic"),
];

/// Look up the default suite codename for a distribution version.
///
/// Returns `None` if `version` has no known codename, in which case an
/// archive that omits `suites` is invalid.
pub fn default_suite_for_version(version: &str) -> Option<&'static str> {
    VERSION_CODENAMES
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, codename)| *codename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_versions() {
        assert_eq!(default_suite_for_version("22.04"), Some("jammy"));
        assert_eq!(default_suite_for_version("9.99"), None);
    }
}
