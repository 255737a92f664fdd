//! Version information for srefkit
//!
//! Build metadata (git commit, build timestamp) is injected at compile
//! time by the build script.

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (short form)
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Build timestamp (RFC3339 format)
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

/// Get full version information string
///
/// # Example
///
/// ```
/// use srefkit::version::full_version;
///
/// println!("Version: {}", full_version());
/// // Output: "srefkit v0.1.0 (commit abc123, built 2026-08-25T10:30:00Z)"
/// ```
pub fn full_version() -> String {
    format!(
        "srefkit v{} (commit {}, built {})",
        VERSION, GIT_COMMIT, BUILD_TIMESTAMP
    )
}

/// Get short version string (version only)
pub fn short_version() -> String {
    format!("v{}", VERSION)
}
