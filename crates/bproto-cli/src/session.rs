//! # Registry Session
//!
//! Builds the registry every subcommand works against: contracts from a
//! manifest file (YAML or JSON, picked by extension) and, on request, the
//! built-in ledger contracts. The manifest's `config:` section supplies the
//! codec configuration; `--legacy-arrays` overrides its array framing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use bproto_codec::{ArrayFraming, Codec, CodecConfig, RegistryManifest, TypeRegistry};

/// Registry options shared by all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct RegistryArgs {
    /// Registry manifest (.yaml, .yml or .json).
    #[arg(long, global = true, value_name = "MANIFEST")]
    pub registry: Option<PathBuf>,

    /// Register the built-in ledger transaction contracts.
    #[arg(long, global = true)]
    pub ledger: bool,

    /// Omit the element count for repeated fields with fewer than two elements.
    #[arg(long, global = true)]
    pub legacy_arrays: bool,
}

/// A populated, frozen registry plus the codec configuration to use with it.
#[derive(Debug)]
pub struct Session {
    registry: TypeRegistry,
    config: CodecConfig,
}

impl Session {
    pub fn open(args: &RegistryArgs) -> Result<Self> {
        if args.registry.is_none() && !args.ledger {
            bail!("no types to work with: pass --registry <MANIFEST> and/or --ledger");
        }

        let registry = TypeRegistry::new();
        let mut config = CodecConfig::default();

        if args.ledger {
            bproto_ledger::register_ledger_contracts(&registry)
                .context("failed to register ledger contracts")?;
        }
        if let Some(path) = &args.registry {
            let manifest = load_manifest(path)?;
            manifest
                .apply(&registry)
                .with_context(|| format!("failed to apply manifest: {}", path.display()))?;
            config = manifest.config;
        }
        if args.legacy_arrays {
            config.array_framing = ArrayFraming::Legacy;
        }

        registry.freeze();
        tracing::debug!(
            contracts = registry.contract_codes().len(),
            framing = ?config.array_framing,
            "registry session ready"
        );
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn codec(&self) -> Codec<'_> {
        Codec::new(&self.registry).with_config(self.config.clone())
    }
}

/// Parse a manifest file; `.json` is JSON, anything else YAML.
pub fn load_manifest(path: &Path) -> Result<RegistryManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let manifest = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON manifest: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML manifest: {}", path.display()))?
    };
    Ok(manifest)
}
