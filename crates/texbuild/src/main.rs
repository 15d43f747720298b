//! texbuild CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "texbuild")]
#[command(version = texbuild_util::cli_version())]
#[command(about = "LaTeX manuscript build checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve missing components, then run the two-phase build test
    Build {
        /// Main document (.tex)
        input: PathBuf,

        /// Path to the LaTeX compiler (default: TEXBUILD_LATEX, then PATH)
        #[arg(long)]
        latex: Option<PathBuf>,

        /// Compile timeout in seconds, per phase
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },

    /// Repair over-escaped LaTeX produced by a format converter
    Repair {
        /// Directory tree (or single .tex file) to repair
        target: PathBuf,

        /// Compute rewrites and report differences without writing
        #[arg(long)]
        dry_run: bool,

        /// Write <name>.backup files before overwriting
        #[arg(long)]
        backup: bool,

        /// Warn about residual escape remnants left after rewriting
        #[arg(long)]
        validate: bool,

        /// Process files one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Scan the main document and print its reference lists
    Scan {
        /// Main document (.tex)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "texbuild=info,texbuild_core=info,texbuild_repair=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            latex,
            timeout,
        } => commands::build::execute(commands::build::BuildArgs {
            input,
            latex,
            timeout,
        }),
        Commands::Repair {
            target,
            dry_run,
            backup,
            validate,
            sequential,
        } => commands::repair::execute(commands::repair::RepairArgs {
            target,
            dry_run,
            backup,
            validate,
            sequential,
        }),
        Commands::Scan { input } => commands::scan::execute(commands::scan::ScanArgs { input }),
    }
}
