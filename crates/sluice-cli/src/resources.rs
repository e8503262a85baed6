//! # Resource Subcommands
//!
//! `fit` and `require` over resource vectors written as
//! `mem=<size>,cpu=<cores>,disk=<size>`.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use sluice_resources::{Requirements, ResourceVector};

/// Arguments for `sluice fit`.
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Available capacity, e.g. `mem=16GiB,cpu=8,disk=100GiB`.
    #[arg(long, value_name = "VECTOR")]
    pub capacity: ResourceVector,

    /// Demand to place, e.g. `mem=2GiB,cpu=1`.
    #[arg(long, value_name = "VECTOR")]
    pub demand: ResourceVector,
}

/// Arguments for `sluice require`.
#[derive(Args, Debug)]
pub struct RequireArgs {
    /// Demands to fold into the envelope.
    #[arg(value_name = "VECTOR", required = true, num_args = 1..)]
    pub demands: Vec<ResourceVector>,

    /// Capacity to check the envelope against.
    #[arg(long, value_name = "VECTOR")]
    pub capacity: Option<ResourceVector>,
}

/// Report whether a demand fits a capacity. Exits 1 when it does not.
pub fn run_fit(args: &FitArgs, out: &mut impl Write) -> Result<u8> {
    let available = args.capacity.available(&args.demand);
    writeln!(out, "available: {available}")?;
    writeln!(out, "remaining: {}", args.capacity - args.demand)?;
    writeln!(out, "units: {}", args.capacity.units(&args.demand))?;
    Ok(if available { 0 } else { 1 })
}

/// Fold demands and print the envelope. With `--capacity`, exits 1 when the
/// capacity does not cover it.
pub fn run_require(args: &RequireArgs, out: &mut impl Write) -> Result<u8> {
    let req = Requirements::fold(args.demands.iter().copied());
    writeln!(out, "{req}")?;

    let Some(capacity) = &args.capacity else {
        return Ok(0);
    };
    let satisfied = req.is_satisfied_by(capacity);
    writeln!(out, "satisfied: {satisfied}")?;
    if !satisfied {
        tracing::info!(%capacity, envelope = %req.min, "capacity does not cover requirements");
    }
    Ok(if satisfied { 0 } else { 1 })
}
