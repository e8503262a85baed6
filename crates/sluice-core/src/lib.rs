//! # sluice-core — Content-Addressed Values
//!
//! The value algebra at the bottom of the sluice pipeline engine. Every
//! pipeline step produces a [`FilesetTree`]; its [`FilesetTree::digest`] is
//! the key under which the result is cached across runs.
//!
//! ## Key Design Principles
//!
//! 1. **Immutable values.** `FileRecord` and `FilesetTree` are never
//!    mutated in place. Every transformation returns a new value, so trees
//!    can be shared and digested concurrently without locks.
//!
//! 2. **Explicit hashing capability.** All digest computation goes through a
//!    [`Digester`] passed by the caller. There is no process-wide hasher.
//!
//! 3. **Persisted byte streams.** The bytes fed into the digester by
//!    `FileRecord::digest` and `FilesetTree::write_digest` are a stored
//!    format: changing them invalidates every existing cache key.
//!
//! 4. **Unrepresentable hybrids.** A tree node is a `Sequence` or a
//!    `Mapping`, never both.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sluice-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod digester;
pub mod error;
pub mod file;
pub mod fileset;
pub mod size;

// Re-export primary types for ergonomic imports.
pub use digest::{ContentDigest, DigestAlgorithm, DIGEST_LEN};
pub use digester::{DigestWriter, Digester, Sha2Digester, Sha2Writer};
pub use error::{CoreError, DigestParseError, SizeParseError};
pub use file::FileRecord;
pub use fileset::FilesetTree;
pub use size::ByteSize;
