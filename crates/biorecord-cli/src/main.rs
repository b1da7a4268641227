//! Biorecord CLI
//!
//! Inspect and convert cached knowledge-graph edge records:
//! - Print content hashes (`hash`)
//! - Re-emit records at a serialization tier (`freeze`)
//! - Reverse records and derive provenance chains (`reverse`, `provenance`)
//! - Pack and unpack record batches (`pack`, `unpack`)
//!
//! Every input path may be `-` for stdin. Output JSON goes to stdout; logs go to
//! stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;

mod commands;

use commands::Tier;

#[derive(Parser)]
#[command(name = "biorecord")]
#[command(author, version, about = "Biorecord: knowledge-graph edge record tools")]
struct Cli {
    /// Record config JSON (`EDGE_ATTRIBUTES_USED_IN_RECORD_HASH`, `provenanceUsesServiceProvider`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print `recordHash` for each record, one per line
    Hash {
        /// Record or array of records (`-` for stdin)
        input: PathBuf,
    },

    /// Re-emit records at a serialization tier
    Freeze {
        /// Record or array of records (`-` for stdin)
        input: PathBuf,
        /// Output tier
        #[arg(long, value_enum, default_value = "compact")]
        tier: Tier,
    },

    /// Emit each record traversed object -> subject (full tier)
    Reverse {
        /// Record or array of records (`-` for stdin)
        input: PathBuf,
    },

    /// Emit the provenance chain of each record
    Provenance {
        /// Record or array of records (`-` for stdin)
        input: PathBuf,
    },

    /// Pack records into `[associations, ...records]`
    Pack {
        /// Record or array of records (`-` for stdin)
        input: PathBuf,
    },

    /// Unpack a record package and emit full-tier records
    Unpack {
        /// Package JSON (`-` for stdin)
        input: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Hash { input } => {
            let records = commands::load_records(&input, &config)?;
            for hash in commands::hashes(&records) {
                println!("{hash}");
            }
        }
        Commands::Freeze { input, tier } => {
            let records = commands::load_records(&input, &config)?;
            commands::print_json(&commands::freeze(&records, tier)?, cli.pretty)?;
        }
        Commands::Reverse { input } => {
            let records = commands::load_records(&input, &config)?;
            commands::print_json(&commands::reverse(&records)?, cli.pretty)?;
        }
        Commands::Provenance { input } => {
            let records = commands::load_records(&input, &config)?;
            commands::print_json(&commands::provenance(&records)?, cli.pretty)?;
        }
        Commands::Pack { input } => {
            let records = commands::load_records(&input, &config)?;
            commands::print_json(&commands::pack(&records)?, cli.pretty)?;
        }
        Commands::Unpack { input } => {
            let value = commands::read_json(&input)?;
            commands::print_json(&commands::unpack(value, &config)?, cli.pretty)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
