//! # sluice-resources — Capacity and Demand Algebra
//!
//! Resource arithmetic used by the sluice scheduler to decide where work
//! can run:
//!
//! - **ResourceVector** (`vector.rs`): fixed-dimension capacity/demand
//!   vectors with saturating addition, floored subtraction, availability
//!   tests, and slot-unit normalization.
//!
//! - **Requirements** (`requirements.rs`): the worst-case envelope over a
//!   stream of demands.
//!
//! Placement search and admission policy live in the scheduler, not here.
//! Every operation in this crate is a total function on immutable values.

pub mod error;
pub mod requirements;
pub mod vector;

pub use error::ResourceError;
pub use requirements::Requirements;
pub use vector::{Dimension, ResourceVector, DIMENSION_COUNT};
