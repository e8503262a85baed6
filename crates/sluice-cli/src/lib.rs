//! # sluice-cli — Command-Line Inspection
//!
//! Thin command-line access to the sluice value and resource algebra, for
//! debugging cache keys and capacity decisions outside the engine.
//!
//! ## Subcommands
//!
//! - `digest`: Print a fileset document's cache key
//! - `inspect`: Summarize a fileset document
//! - `pullup`: Merge a fileset tree into one mapping
//! - `subst`: Substitute resolved files for references
//! - `fit`: Test a demand against a capacity
//! - `require`: Fold demands into a requirement envelope
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `sluice-core` and `sluice-resources`; no algebra
//!   is implemented here.
//! - Handlers write to a caller-supplied writer and return the process exit
//!   code.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use sluice_core::{CoreError, FilesetTree};

pub mod config;
pub mod fileset;
pub mod resources;

/// Read a fileset tree from a JSON document on disk.
pub fn load_tree(path: &Path) -> Result<FilesetTree> {
    read_tree(path).with_context(|| format!("failed to load fileset: {}", path.display()))
}

fn read_tree(path: &Path) -> Result<FilesetTree, CoreError> {
    let file = File::open(path)?;
    FilesetTree::from_json_reader(BufReader::new(file))
}
