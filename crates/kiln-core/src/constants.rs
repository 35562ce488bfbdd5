//! Package-level constants.

/// Current version of the kiln core (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory name for build outputs, relative to a build root.
pub const DEFAULT_DIST_DIRNAME: &str = "dist";

/// Directory name under an isolated environment root where the dependency
/// closure is written.
pub const DEPENDENCIES_DIRNAME: &str = ".dependencies";

/// File name of the generated manifest inside an isolated environment.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Prefix for per-component scratch directories holding detached compiler
/// configuration.
pub const CONFIG_SCRATCH_PREFIX: &str = ".kiln-config";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn scratch_prefix_is_hidden() {
        assert!(CONFIG_SCRATCH_PREFIX.starts_with('.'));
    }
}
