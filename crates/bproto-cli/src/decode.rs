//! # Decode Subcommand
//!
//! Decodes hex-encoded bytes and prints the record as JSON. Without
//! `--code` the contract is taken from the header.

use anyhow::{Context, Result};
use clap::Args;

use crate::convert::record_to_json;
use crate::session::Session;

/// Arguments for the `bproto decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Expected contract code; must match the header.
    #[arg(long)]
    pub code: Option<i32>,

    /// Encoded bytes as hex (optional `0x` prefix).
    #[arg(value_name = "HEX")]
    pub hex: String,
}

pub fn decode_json(args: &DecodeArgs, session: &Session) -> Result<serde_json::Value> {
    let text = args.hex.trim();
    let bytes = hex::decode(text.strip_prefix("0x").unwrap_or(text)).context("invalid hex input")?;
    let codec = session.codec();
    let record = match args.code {
        Some(code) => codec.decode(&bytes, code),
        None => codec.decode_any(&bytes),
    }
    .context("failed to decode input")?;
    tracing::info!(code = record.code(), len = bytes.len(), "decoded record");
    record_to_json(session.registry(), &record)
}

pub fn run_decode(args: &DecodeArgs, session: &Session) -> Result<u8> {
    let json = decode_json(args, session)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(0)
}
