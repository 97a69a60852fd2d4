//! entdiff CLI - entity-level ChangeLog generation for C sources
//!
//! Reports which functions, macros, types and declarations changed between
//! revisions, grouped by the preprocessor conditionals that guard them.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use entdiff_core::EntdiffError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod git;
mod output;

use config::EntdiffConfig;
use output::{OutputConfig, OutputFormat};

/// Exit status for change records with an unknown operation code.
const EXIT_UNKNOWN_OPERATION: u8 = 3;

/// Entity-level change reports for C sources.
#[derive(Parser)]
#[command(name = "entdiff")]
#[command(author, version)]
#[command(about = "Entity-level change reports for C sources")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  entdiff log v1.0 HEAD         ChangeLog entries for v1.0..HEAD
  entdiff files old.c new.c     Entity changes between two files
  entdiff tree src/io.c         Show the scope tree of a file")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Single-line JSON output
    #[arg(long, global = true)]
    compact: bool,

    /// Emit parser trace events (shown with RUST_LOG=trace)
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// ChangeLog entries for every commit in FROM..TO
    Log {
        /// Starting revision (exclusive)
        from: String,

        /// Final revision (inclusive)
        to: String,

        /// Repository to read from
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },

    /// Entity changes between two versions of a file
    Files {
        /// Old version
        old: PathBuf,

        /// New version
        new: PathBuf,
    },

    /// Print the scope tree of a file
    Tree {
        /// File to parse
        file: PathBuf,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EntdiffError>() {
        Some(EntdiffError::UnknownOperation { .. }) => EXIT_UNKNOWN_OPERATION,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    setup_logging(cli.verbose, cli.quiet);

    let config = EntdiffConfig::load(Path::new("."));

    // CLI flag > config default > Text
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    });

    let mut output = OutputConfig::auto_detect_with_color_override(format, config.use_color());
    if cli.compact {
        output = output.compact();
    }
    colored::control::set_override(output.use_colors());

    let parse = config.parse_options(cli.trace);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return Ok(());
    };

    match command {
        Commands::Log { from, to, repo } => {
            let options = config.report_options(parse);
            commands::log::run(&repo, &from, &to, &options, &output)
        }
        Commands::Files { old, new } => commands::files::run(&old, &new, &parse, &output),
        Commands::Tree { file } => commands::tree::run(&file, &parse, &output),
    }
}
