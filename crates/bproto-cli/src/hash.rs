//! # Hash Subcommand
//!
//! Prints the content digest of a record: SHA-256 over its canonical
//! encoding, the same digest a transaction builder stores as its hash.
//! `--check` compares against an expected digest instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bproto_ledger::{sha256_digest, ContentDigest};

use crate::convert::json_to_record;
use crate::session::Session;

/// Arguments for the `bproto hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Contract code of the record.
    #[arg(long)]
    pub code: i32,

    /// JSON record file, or `-` for stdin.
    #[arg(value_name = "RECORD_JSON")]
    pub input: PathBuf,

    /// Expected digest (`sha256:<hex>` or bare hex); exit 1 on mismatch.
    #[arg(long)]
    pub check: Option<String>,
}

pub fn compute_digest(args: &HashArgs, session: &Session) -> Result<ContentDigest> {
    let json = crate::read_json(&args.input)?;
    let record = json_to_record(session.registry(), args.code, &json)?;
    let encoded = session
        .codec()
        .encode(&record)
        .with_context(|| format!("failed to encode contract {}", args.code))?;
    Ok(sha256_digest(&encoded))
}

/// Returns exit code: 0 on success, 1 if `--check` does not match.
pub fn run_hash(args: &HashArgs, session: &Session) -> Result<u8> {
    let digest = compute_digest(args, session)?;
    let Some(expected) = &args.check else {
        println!("{digest}");
        return Ok(0);
    };
    let expected = expected.trim();
    let expected_hex = expected.strip_prefix("sha256:").unwrap_or(expected);
    let expected = ContentDigest::from_slice(&hex::decode(expected_hex).context("invalid expected digest")?)?;
    if expected == digest {
        println!("OK: {digest}");
        Ok(0)
    } else {
        println!("FAIL: digest mismatch");
        println!("  Expected: {expected}");
        println!("  Computed: {digest}");
        Ok(1)
    }
}
