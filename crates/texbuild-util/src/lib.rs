//! Shared utilities for texbuild.

mod version;

pub use version::{cargo_version, cli_version};
