//! Version handling for texbuild.
//!
//! The CLI reports the workspace version with a `-dev` suffix while the
//! crate version is still 0.x.y, to make prerelease builds recognizable in
//! bug reports. Both branches are compile-time string literals so the
//! result can feed clap's `version` attribute directly.

/// Get the version string reported by the CLI.
pub fn cli_version() -> &'static str {
    let cargo_version = env!("CARGO_PKG_VERSION");

    if cargo_version.starts_with("0.") {
        concat!(env!("CARGO_PKG_VERSION"), "-dev")
    } else {
        cargo_version
    }
}

/// Get the Cargo package version (for internal use).
pub fn cargo_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
