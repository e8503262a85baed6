//! # Resource Vectors
//!
//! A `ResourceVector` is a machine's capacity or a task's demand across a
//! fixed set of dimensions: memory (bytes), cpu (cores) and disk (bytes).
//!
//! ## Invariants
//!
//! - No dimension is ever negative or NaN. Construction clamps, and every
//!   operation clamps its raw elementwise result again.
//! - [`ResourceVector::MAX`] is "unbounded". Sums saturate at it per
//!   dimension, so `MAX + x == MAX`.
//! - Subtraction floors at zero: it models remaining capacity and is not
//!   the inverse of addition.

use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sluice_core::ByteSize;

use crate::error::ResourceError;

/// Number of resource dimensions.
pub const DIMENSION_COUNT: usize = 3;

/// A single resource dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Memory, in bytes.
    Memory,
    /// CPU, in cores.
    Cpu,
    /// Disk, in bytes.
    Disk,
}

impl Dimension {
    /// All dimensions, in vector order.
    pub const ALL: [Dimension; DIMENSION_COUNT] = [Self::Memory, Self::Cpu, Self::Disk];

    /// Short name used in renderings and parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "mem",
            Self::Cpu => "cpu",
            Self::Disk => "disk",
        }
    }

    /// The unbounded value of this dimension.
    pub fn max_value(&self) -> f64 {
        match self {
            Self::Memory | Self::Disk => u64::MAX as f64,
            Self::Cpu => u16::MAX as f64,
        }
    }

    /// True if quantities in this dimension are byte counts.
    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Memory | Self::Disk)
    }

    fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return 0.0;
        }
        v.max(0.0).min(self.max_value())
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mem" | "memory" => Ok(Self::Memory),
            "cpu" | "cpus" => Ok(Self::Cpu),
            "disk" => Ok(Self::Disk),
            _ => Err(ResourceError::UnknownDimension(s.trim().to_string())),
        }
    }
}

/// A non-negative capacity or demand vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawVector")]
pub struct ResourceVector {
    memory: f64,
    cpu: f64,
    disk: f64,
}

/// Unchecked wire form; deserialization clamps through `ResourceVector::new`.
#[derive(Deserialize)]
struct RawVector {
    #[serde(default)]
    memory: f64,
    #[serde(default)]
    cpu: f64,
    #[serde(default)]
    disk: f64,
}

impl From<RawVector> for ResourceVector {
    fn from(raw: RawVector) -> Self {
        Self::new(raw.memory, raw.cpu, raw.disk)
    }
}

impl ResourceVector {
    /// The all-zero vector.
    pub const ZERO: ResourceVector = ResourceVector {
        memory: 0.0,
        cpu: 0.0,
        disk: 0.0,
    };

    /// The unbounded vector.
    pub const MAX: ResourceVector = ResourceVector {
        memory: u64::MAX as f64,
        cpu: u16::MAX as f64,
        disk: u64::MAX as f64,
    };

    /// A vector from raw quantities, clamped into `[0, MAX]`. NaN becomes 0.
    pub fn new(memory: f64, cpu: f64, disk: f64) -> Self {
        Self {
            memory: Dimension::clamp(&Dimension::Memory, memory),
            cpu: Dimension::clamp(&Dimension::Cpu, cpu),
            disk: Dimension::clamp(&Dimension::Disk, disk),
        }
    }

    /// Memory in bytes.
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// CPU in cores.
    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    /// Disk in bytes.
    pub fn disk(&self) -> f64 {
        self.disk
    }

    /// The quantity in dimension `d`.
    pub fn get(&self, d: Dimension) -> f64 {
        match d {
            Dimension::Memory => self.memory,
            Dimension::Cpu => self.cpu,
            Dimension::Disk => self.disk,
        }
    }

    /// True if every dimension is zero.
    pub fn is_zero(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d) == 0.0)
    }

    // Raw elementwise combination; callers apply their own clamp.
    fn zip_with(&self, other: &ResourceVector, f: impl Fn(Dimension, f64, f64) -> f64) -> Self {
        Self {
            memory: f(Dimension::Memory, self.memory, other.memory),
            cpu: f(Dimension::Cpu, self.cpu, other.cpu),
            disk: f(Dimension::Disk, self.disk, other.disk),
        }
    }

    /// Elementwise sum, each dimension saturating at [`ResourceVector::MAX`].
    pub fn saturating_add(&self, other: &ResourceVector) -> Self {
        self.zip_with(other, |d, a, b| (a + b).min(d.max_value()))
    }

    /// Elementwise difference, each dimension floored at zero.
    pub fn saturating_sub(&self, other: &ResourceVector) -> Self {
        self.zip_with(other, |_, a, b| (a - b).max(0.0))
    }

    /// Elementwise minimum.
    pub fn min(&self, other: &ResourceVector) -> Self {
        self.zip_with(other, |_, a, b| a.min(b))
    }

    /// Elementwise maximum.
    pub fn max(&self, other: &ResourceVector) -> Self {
        self.zip_with(other, |_, a, b| a.max(b))
    }

    /// Whether `self` can satisfy `demand`: no dimension of `demand` exceeds
    /// the corresponding dimension of `self`.
    pub fn available(&self, demand: &ResourceVector) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d) >= demand.get(*d))
    }

    /// How many `slot`-sized units `self` amounts to.
    ///
    /// Takes the ratio `self[d] / slot[d]` over the dimensions where `slot`
    /// is positive and rounds the largest one up: a partial slot still needs
    /// a whole unit of its bottleneck dimension. Returns 0 when `slot` is
    /// zero in every dimension.
    pub fn units(&self, slot: &ResourceVector) -> u64 {
        let ratio = Dimension::ALL
            .iter()
            .filter(|d| slot.get(**d) > 0.0)
            .map(|d| self.get(*d) / slot.get(*d))
            .reduce(f64::max);
        match ratio {
            // `as` saturates, so unbounded capacity maps to u64::MAX.
            Some(r) => r.ceil() as u64,
            None => 0,
        }
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(self, rhs: ResourceVector) -> ResourceVector {
        self.saturating_add(&rhs)
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;

    fn sub(self, rhs: ResourceVector) -> ResourceVector {
        self.saturating_sub(&rhs)
    }
}

/// Renders as `{mem:4.0GiB cpu:2 disk:10.0GiB}`.
impl std::fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{mem:{} cpu:{} disk:{}}}",
            ByteSize(self.memory as u64),
            self.cpu,
            ByteSize(self.disk as u64)
        )
    }
}

impl FromStr for ResourceVector {
    type Err = ResourceError;

    /// Parses `mem=4GiB,cpu=2,disk=10G`. Omitted dimensions are zero; byte
    /// dimensions accept size suffixes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values: [Option<f64>; DIMENSION_COUNT] = [None; DIMENSION_COUNT];
        for component in s.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let (key, value) = component
                .split_once('=')
                .ok_or_else(|| ResourceError::MalformedComponent(component.to_string()))?;
            let dimension: Dimension = key.parse()?;
            let slot = &mut values[dimension as usize];
            if slot.is_some() {
                return Err(ResourceError::DuplicateDimension(dimension.to_string()));
            }
            *slot = Some(parse_quantity(dimension, value.trim())?);
        }
        let [memory, cpu, disk] = values.map(|v| v.unwrap_or(0.0));
        Ok(Self::new(memory, cpu, disk))
    }
}

fn parse_quantity(dimension: Dimension, value: &str) -> Result<f64, ResourceError> {
    if dimension.is_bytes() {
        let size: ByteSize = value.parse()?;
        return Ok(size.bytes() as f64);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ResourceError::InvalidValue {
            dimension: dimension.to_string(),
            value: value.to_string(),
        }),
    }
}
