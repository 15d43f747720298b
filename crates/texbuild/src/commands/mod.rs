//! Command implementations for the texbuild CLI
//!
//! Each command module handles the CLI interface and delegates to
//! texbuild-core / texbuild-repair for the actual implementation.

pub mod build;
pub mod repair;
pub mod scan;
