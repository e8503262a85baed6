//! # File Records
//!
//! A `FileRecord` describes one file produced or consumed by a pipeline
//! step. It is either
//!
//! - **resolved**: `id` is the digest of the file's contents, or
//! - a **reference**: `id` is zero and the record instead points at content
//!   that has not been materialized yet, through a `source` locator and an
//!   `etag` validator.
//!
//! ## Equality
//!
//! Two notions of equality coexist:
//!
//! - `PartialEq`/`Hash` compare every field. They identify a record as a
//!   value, e.g. as a substitution key or when collecting distinct files.
//! - [`FileRecord::equal`] decides whether two records denote the same
//!   content. Resolved records compare by `id` alone; as soon as one side is
//!   a reference, size, source and a non-empty etag must all match. A
//!   reference with an empty etag is never `equal` to anything, itself
//!   included. Cache compatibility depends on this exact rule.
//!
//! `last_modified` is bookkeeping only. It is never compared by `equal`
//! and never digested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;
use crate::digester::{DigestWriter, Digester};

/// A single content-addressed or referenced file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileRecord {
    /// Digest of the file's contents; zero for references.
    #[serde(default, skip_serializing_if = "ContentDigest::is_zero")]
    pub id: ContentDigest,

    /// Size of the file in bytes.
    pub size: u64,

    /// Locator from which the file may be retrieved.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Entity tag validating `source`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,

    /// Last modification time, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// A resolved file with known contents.
    pub fn resolved(id: ContentDigest, size: u64) -> Self {
        Self {
            id,
            size,
            ..Self::default()
        }
    }

    /// A reference to not-yet-materialized content.
    pub fn reference(source: impl Into<String>, etag: impl Into<String>, size: u64) -> Self {
        Self {
            id: ContentDigest::ZERO,
            size,
            source: source.into(),
            etag: etag.into(),
            last_modified: None,
        }
    }

    /// Attach a last-modified timestamp.
    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    /// True if this record is a reference (its content digest is zero).
    pub fn is_reference(&self) -> bool {
        self.id.is_zero()
    }

    /// The cache identity of this file.
    ///
    /// Resolved files return their content digest unchanged. For references
    /// the identity is derived from the locator metadata: the size as 8
    /// little-endian bytes, then the source, then the etag.
    pub fn digest<D: Digester>(&self, digester: &D) -> ContentDigest {
        if !self.is_reference() {
            return self.id;
        }
        let mut w = digester.writer();
        w.write_u64_le(self.size);
        w.write_str(&self.source);
        w.write_str(&self.etag);
        w.finish()
    }

    /// Whether `self` and `other` represent the same content.
    pub fn equal(&self, other: &FileRecord) -> bool {
        if self.is_reference() || other.is_reference() {
            return self.size == other.size
                && self.source == other.source
                && !self.etag.is_empty()
                && self.etag == other.etag;
        }
        self.id == other.id
    }

    /// Abbreviated rendering: the short id, or the source for references.
    pub fn short(&self) -> String {
        if self.is_reference() {
            self.source.clone()
        } else {
            self.id.short()
        }
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields = Vec::with_capacity(4);
        if !self.is_reference() {
            fields.push(format!("id: {}", self.id));
        }
        fields.push(format!("size: {}", self.size));
        if !self.source.is_empty() {
            fields.push(format!("source: {}", self.source));
        }
        if !self.etag.is_empty() {
            fields.push(format!("etag: {}", self.etag));
        }
        f.write_str(&fields.join(", "))
    }
}
