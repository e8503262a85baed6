//! # Fileset Subcommands
//!
//! `digest`, `inspect`, `pullup` and `subst` over fileset documents: the
//! JSON form of a [`FilesetTree`], e.g.
//!
//! ```json
//! {"List": [{"Fileset": {"foo": {"id": "sha256:2c26…", "size": 3}}}]}
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use sluice_core::{ByteSize, ContentDigest, Digester, FileRecord, FilesetTree};

use crate::load_tree;

/// Arguments for `sluice digest`.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Path to the fileset JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Expected digest; exit with status 1 if the document's differs.
    #[arg(long, value_name = "DIGEST")]
    pub expect: Option<ContentDigest>,
}

/// Arguments for `sluice inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the fileset JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the full rendering instead of the abbreviated one.
    #[arg(long)]
    pub full: bool,
}

/// Arguments for `sluice pullup`.
#[derive(Args, Debug)]
pub struct PullupArgs {
    /// Path to the fileset JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for `sluice subst`.
#[derive(Args, Debug)]
pub struct SubstArgs {
    /// Path to the fileset JSON document.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON array of `{"from": <file>, "to": <file>}` substitutions.
    #[arg(value_name = "MAP")]
    pub map: PathBuf,

    /// Exit with status 2 if references remain after substitution.
    #[arg(long)]
    pub require_resolved: bool,
}

/// One entry of a substitution document.
#[derive(Debug, Deserialize)]
struct Substitution {
    from: FileRecord,
    to: FileRecord,
}

/// Print the digest of a fileset document.
pub fn run_digest<D: Digester>(
    args: &DigestArgs,
    digester: &D,
    out: &mut impl Write,
) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    let digest = tree.digest(digester);
    writeln!(out, "{digest}")?;

    match &args.expect {
        Some(expected) if *expected != digest => {
            tracing::warn!(%expected, actual = %digest, "digest mismatch");
            Ok(1)
        }
        _ => Ok(0),
    }
}

/// Summarize a fileset document.
pub fn run_inspect<D: Digester>(
    args: &InspectArgs,
    digester: &D,
    out: &mut impl Write,
) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    let files = tree.files();
    let references = files.iter().filter(|f| f.is_reference()).count();
    let rendering = if args.full {
        tree.to_string()
    } else {
        tree.short()
    };

    writeln!(out, "value: {rendering}")?;
    writeln!(out, "digest: {}", tree.digest(digester))?;
    let (total, distinct) = (tree.total_count(), files.len());
    writeln!(out, "files: {total} ({distinct} distinct)")?;
    writeln!(out, "size: {}", ByteSize(tree.total_size()))?;
    writeln!(out, "references: {references}")?;
    writeln!(out, "empty: {}", tree.is_empty())?;
    writeln!(out, "any_empty: {}", tree.any_empty())?;
    Ok(0)
}

/// Print the pulled-up form of a fileset document.
pub fn run_pullup(args: &PullupArgs, out: &mut impl Write) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    writeln!(out, "{}", tree.pullup().to_json_pretty()?)?;
    Ok(0)
}

/// Apply a substitution document to a fileset document.
pub fn run_subst(args: &SubstArgs, out: &mut impl Write) -> Result<u8> {
    let tree = load_tree(&args.file)?;
    let sub = load_substitutions(&args.map)?;
    let (substituted, resolved) = tree.substitute(&sub);
    writeln!(out, "{}", substituted.to_json_pretty()?)?;

    if !resolved {
        tracing::warn!(file = %args.file.display(), "references remain after substitution");
        if args.require_resolved {
            return Ok(2);
        }
    }
    Ok(0)
}

fn load_substitutions(path: &Path) -> Result<HashMap<FileRecord, FileRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    let entries: Vec<Substitution> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse substitutions: {}", path.display()))?;
    tracing::debug!(count = entries.len(), "loaded substitutions");
    Ok(entries.into_iter().map(|s| (s.from, s.to)).collect())
}
