//! # bproto-cli: Command-Line Front End for the Canonical Codec
//!
//! ## Subcommands
//!
//! - `bproto encode`: JSON record to hex of its canonical encoding.
//! - `bproto decode`: hex back to a JSON record.
//! - `bproto hash`: `sha256:<hex>` of a record's canonical encoding.
//!
//! Every subcommand works against a [`Session`](session::Session) built from
//! `--registry <MANIFEST>` and/or `--ledger`:
//!
//! ```bash
//! bproto --registry types.yaml encode --code 1001 pair.json
//! bproto --registry types.yaml decode 000003e90000001101
//! bproto --ledger hash --code 512 tx.json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `bproto-codec` and `bproto-ledger`; conversion
//!   between JSON and records lives in [`convert`].

pub mod convert;
pub mod decode;
pub mod encode;
pub mod hash;
pub mod session;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a JSON document from a file, or from stdin when the path is `-`.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input: {}", path.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON input: {}", path.display()))
}
