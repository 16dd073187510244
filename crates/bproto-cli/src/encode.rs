//! # Encode Subcommand
//!
//! Reads a JSON record, converts it under the schema of `--code`, and prints
//! the hex of its canonical encoding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::convert::json_to_record;
use crate::session::Session;

/// Arguments for the `bproto encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Contract code of the record.
    #[arg(long)]
    pub code: i32,

    /// JSON record file, or `-` for stdin.
    #[arg(value_name = "RECORD_JSON")]
    pub input: PathBuf,
}

/// Encode the input record and return its hex.
pub fn encode_hex(args: &EncodeArgs, session: &Session) -> Result<String> {
    let json = crate::read_json(&args.input)?;
    let record = json_to_record(session.registry(), args.code, &json)?;
    let encoded = session
        .codec()
        .encode(&record)
        .with_context(|| format!("failed to encode contract {}", args.code))?;
    tracing::info!(code = args.code, len = encoded.len(), "encoded record");
    Ok(hex::encode(encoded.as_bytes()))
}

pub fn run_encode(args: &EncodeArgs, session: &Session) -> Result<u8> {
    println!("{}", encode_hex(args, session)?);
    Ok(0)
}
