//! # bproto CLI entry point
//!
//! Parses command-line arguments, opens the registry session, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bproto_cli::decode::{run_decode, DecodeArgs};
use bproto_cli::encode::{run_encode, EncodeArgs};
use bproto_cli::hash::{run_hash, HashArgs};
use bproto_cli::session::{RegistryArgs, Session};

/// Canonical binary codec toolchain.
///
/// Encodes JSON records into their canonical byte form, decodes bytes back,
/// and computes content digests, all against a registry manifest.
#[derive(Parser, Debug)]
#[command(name = "bproto", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    registry: RegistryArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a JSON record and print its bytes as hex.
    Encode(EncodeArgs),

    /// Decode hex bytes and print the record as JSON.
    Decode(DecodeArgs),

    /// Print the SHA-256 content digest of a record's encoding.
    Hash(HashArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("bproto CLI starting");

    let result = Session::open(&cli.registry).and_then(|session| match &cli.command {
        Commands::Encode(args) => run_encode(args, &session),
        Commands::Decode(args) => run_decode(args, &session),
        Commands::Hash(args) => run_hash(args, &session),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
