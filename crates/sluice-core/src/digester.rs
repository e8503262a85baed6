//! # Digester — Hashing Capability
//!
//! Content digests are computed through a `Digester` passed explicitly to
//! every digesting operation. The production backend, [`Sha2Digester`],
//! wraps the `sha2` crate; tests can substitute their own implementation to
//! observe the exact byte stream a value feeds into the hash.
//!
//! ## Stream Encoding
//!
//! The byte stream written by callers is a persisted format:
//!
//! - integers are fixed-width little-endian (`write_u64_le`),
//! - strings are written as their raw UTF-8 bytes with no length prefix,
//! - embedded digests are the 2-byte big-endian algorithm tag followed by
//!   the 32 raw digest bytes (`write_digest`).
//!
//! Writes are infallible. A backend that could fail must handle that
//! internally; the value algebra never observes hashing errors.

use sha2::{Digest, Sha256, Sha512_256};

use crate::digest::{ContentDigest, DigestAlgorithm, DIGEST_LEN};

/// A scoped, incremental digest computation.
pub trait DigestWriter {
    /// Feed raw bytes into the digest.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Finalize the stream into a digest.
    fn finish(self) -> ContentDigest;

    /// Feed the UTF-8 bytes of a string.
    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Feed an unsigned integer as 8 little-endian bytes.
    fn write_u64_le(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Feed another digest: algorithm tag (big-endian u16), then its value.
    fn write_digest(&mut self, d: &ContentDigest) {
        self.write_bytes(&d.algorithm.wire_tag().to_be_bytes());
        self.write_bytes(&d.bytes);
    }
}

/// A deterministic hashing capability.
pub trait Digester: Send + Sync {
    /// The writer type produced by [`Digester::writer`].
    type Writer: DigestWriter;

    /// The algorithm that every digest from this digester carries.
    fn algorithm(&self) -> DigestAlgorithm;

    /// Start a new digest computation.
    fn writer(&self) -> Self::Writer;

    /// Digest a byte slice.
    fn digest_bytes(&self, bytes: &[u8]) -> ContentDigest {
        let mut w = self.writer();
        w.write_bytes(bytes);
        w.finish()
    }

    /// Digest the UTF-8 bytes of a string.
    fn digest_str(&self, s: &str) -> ContentDigest {
        self.digest_bytes(s.as_bytes())
    }
}

/// SHA-2 family digester. Defaults to SHA-256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha2Digester {
    algorithm: DigestAlgorithm,
}

impl Sha2Digester {
    /// A digester for the given algorithm.
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    /// The SHA-256 digester.
    pub fn sha256() -> Self {
        Self::new(DigestAlgorithm::Sha256)
    }
}

impl Default for Sha2Digester {
    fn default() -> Self {
        Self::sha256()
    }
}

impl Digester for Sha2Digester {
    type Writer = Sha2Writer;

    fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    fn writer(&self) -> Sha2Writer {
        match self.algorithm {
            DigestAlgorithm::Sha256 => Sha2Writer::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512_256 => Sha2Writer::Sha512_256(Sha512_256::new()),
        }
    }
}

/// Writer produced by [`Sha2Digester`].
#[derive(Clone)]
pub enum Sha2Writer {
    /// SHA-256 state.
    Sha256(Sha256),
    /// SHA-512/256 state.
    Sha512_256(Sha512_256),
}

impl DigestWriter for Sha2Writer {
    fn write_bytes(&mut self, bytes: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(bytes),
            Self::Sha512_256(h) => h.update(bytes),
        }
    }

    fn finish(self) -> ContentDigest {
        let (algorithm, bytes): (_, [u8; DIGEST_LEN]) = match self {
            Self::Sha256(h) => (DigestAlgorithm::Sha256, h.finalize().into()),
            Self::Sha512_256(h) => (DigestAlgorithm::Sha512_256, h.finalize().into()),
        };
        ContentDigest::new(algorithm, bytes)
    }
}
