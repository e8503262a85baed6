//! # Fileset Trees
//!
//! A `FilesetTree` is the value produced by an evaluated pipeline step and
//! the unit under which outputs are cached. It is either
//!
//! - a **Sequence** of child trees, where order is significant, or
//! - a **Mapping** from path to [`FileRecord`], where order is not.
//!
//! The empty Mapping is the void value. Trees are immutable: every
//! transformation returns a new tree.
//!
//! ## Digest Stream
//!
//! [`FilesetTree::digest`] is a persisted cache key. A Sequence feeds each
//! child's material into the same stream, in order. A Mapping feeds, for
//! every path in ascending byte order, the path bytes followed by the
//! embedded digest of the file (see [`DigestWriter::write_digest`]).
//! Sorting by path makes the digest independent of how the Mapping was
//! built.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;
use crate::digester::{DigestWriter, Digester};
use crate::error::CoreError;
use crate::file::FileRecord;
use crate::size::ByteSize;

/// A recursive, immutable tree of files.
///
/// `PartialEq` is structural. Use [`FilesetTree::equal`] to compare trees by
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilesetTree {
    /// Ordered children.
    #[serde(rename = "List")]
    Sequence(Vec<FilesetTree>),
    /// Files keyed by path.
    #[serde(rename = "Fileset")]
    Mapping(BTreeMap<String, FileRecord>),
}

impl Default for FilesetTree {
    fn default() -> Self {
        Self::void()
    }
}

impl FilesetTree {
    /// The void value: a Mapping with no entries.
    pub fn void() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// A Sequence of the given children.
    pub fn sequence(children: impl IntoIterator<Item = FilesetTree>) -> Self {
        Self::Sequence(children.into_iter().collect())
    }

    /// A Mapping of the given entries. Later duplicates of a path win.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FileRecord)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, f)| (k.into(), f)).collect())
    }

    /// The children, if this is a Sequence.
    pub fn as_sequence(&self) -> Option<&[FilesetTree]> {
        match self {
            Self::Sequence(children) => Some(children),
            Self::Mapping(_) => None,
        }
    }

    /// The entries, if this is a Mapping.
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, FileRecord>> {
        match self {
            Self::Sequence(_) => None,
            Self::Mapping(entries) => Some(entries),
        }
    }

    /// Decode a tree from its JSON document form.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CoreError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Encode the tree as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Content equality: Sequences compare pairwise in order, Mappings by key
    /// set and [`FileRecord::equal`]. A Sequence never equals a Mapping.
    pub fn equal(&self, other: &FilesetTree) -> bool {
        match (self, other) {
            (Self::Sequence(a), Self::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equal(y))
            }
            (Self::Mapping(a), Self::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(path, f)| b.get(path).is_some_and(|g| f.equal(g)))
            }
            _ => false,
        }
    }

    /// True if the tree contains no files.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sequence(children) => children.iter().all(FilesetTree::is_empty),
            Self::Mapping(entries) => entries.is_empty(),
        }
    }

    /// True if this tree, or any tree nested in it, contains no files.
    pub fn any_empty(&self) -> bool {
        match self {
            Self::Sequence(children) => {
                children.is_empty() || children.iter().any(FilesetTree::any_empty)
            }
            Self::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Shallow flattening: a Sequence yields its children, anything else a
    /// single-element slice of itself.
    pub fn flatten(&self) -> &[FilesetTree] {
        match self {
            Self::Sequence(children) => children,
            Self::Mapping(_) => std::slice::from_ref(self),
        }
    }

    /// Every distinct file in the tree, in first-visit order.
    pub fn files(&self) -> Vec<FileRecord> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_files(&mut seen, &mut out);
        out
    }

    fn collect_files<'a>(&'a self, seen: &mut HashSet<&'a FileRecord>, out: &mut Vec<FileRecord>) {
        match self {
            Self::Sequence(children) => {
                for child in children {
                    child.collect_files(seen, out);
                }
            }
            Self::Mapping(entries) => {
                for file in entries.values() {
                    if seen.insert(file) {
                        out.push(file.clone());
                    }
                }
            }
        }
    }

    /// Number of Mapping entries in the whole tree, counting a file once per
    /// path it appears under.
    pub fn total_count(&self) -> usize {
        match self {
            Self::Sequence(children) => children.iter().map(FilesetTree::total_count).sum(),
            Self::Mapping(entries) => entries.len(),
        }
    }

    /// Sum of the sizes of every Mapping entry in the whole tree.
    pub fn total_size(&self) -> u64 {
        match self {
            Self::Sequence(children) => children
                .iter()
                .fold(0u64, |acc, c| acc.saturating_add(c.total_size())),
            Self::Mapping(entries) => entries
                .values()
                .fold(0u64, |acc, f| acc.saturating_add(f.size)),
        }
    }

    /// Replace files according to `sub`, returning the new tree and whether
    /// it is fully resolved.
    ///
    /// An entry counts as resolved if it was substituted or was not a
    /// reference to begin with.
    pub fn substitute(&self, sub: &HashMap<FileRecord, FileRecord>) -> (FilesetTree, bool) {
        let mut substituted = 0usize;
        let (tree, resolved) = self.substitute_inner(sub, &mut substituted);
        tracing::debug!(
            substituted,
            resolved,
            files = tree.total_count(),
            "substituted fileset references"
        );
        (tree, resolved)
    }

    fn substitute_inner(
        &self,
        sub: &HashMap<FileRecord, FileRecord>,
        substituted: &mut usize,
    ) -> (FilesetTree, bool) {
        match self {
            Self::Sequence(children) => {
                let mut resolved = true;
                let out = children
                    .iter()
                    .map(|child| {
                        let (tree, ok) = child.substitute_inner(sub, substituted);
                        resolved &= ok;
                        tree
                    })
                    .collect();
                (Self::Sequence(out), resolved)
            }
            Self::Mapping(entries) => {
                let mut resolved = true;
                let out = entries
                    .iter()
                    .map(|(path, file)| match sub.get(file) {
                        Some(replacement) => {
                            *substituted += 1;
                            (path.clone(), replacement.clone())
                        }
                        None => {
                            if file.is_reference() {
                                tracing::trace!(%path, source = %file.source, "unresolved reference");
                                resolved = false;
                            }
                            (path.clone(), file.clone())
                        }
                    })
                    .collect();
                (Self::Mapping(out), resolved)
            }
        }
    }

    /// Merge the whole tree into a single Mapping.
    ///
    /// Entries are visited Sequence child by child, depth first; a later
    /// entry overwrites an earlier one at the same path. A Mapping is
    /// returned unchanged.
    pub fn pullup(&self) -> FilesetTree {
        match self {
            Self::Mapping(_) => self.clone(),
            Self::Sequence(_) => {
                let mut merged = BTreeMap::new();
                self.pullup_into(&mut merged);
                Self::Mapping(merged)
            }
        }
    }

    fn pullup_into(&self, merged: &mut BTreeMap<String, FileRecord>) {
        match self {
            Self::Sequence(children) => {
                for child in children {
                    child.pullup_into(merged);
                }
            }
            Self::Mapping(entries) => {
                for (path, file) in entries {
                    merged.insert(path.clone(), file.clone());
                }
            }
        }
    }

    /// The content digest of the tree. Equal trees have equal digests.
    pub fn digest<D: Digester>(&self, digester: &D) -> ContentDigest {
        let mut w = digester.writer();
        self.write_digest(digester, &mut w);
        w.finish()
    }

    /// Write the tree's digest material to `w`. `digester` computes the
    /// identities of reference files along the way.
    pub fn write_digest<D: Digester, W: DigestWriter>(&self, digester: &D, w: &mut W) {
        match self {
            Self::Sequence(children) => {
                for child in children {
                    child.write_digest(digester, w);
                }
            }
            Self::Mapping(entries) => {
                // BTreeMap iterates in ascending byte order of the path.
                for (path, file) in entries {
                    w.write_str(path);
                    w.write_digest(&file.digest(digester));
                }
            }
        }
    }

    /// Abbreviated rendering for diagnostics: the first child or smallest
    /// path only, followed by an ellipsis when more exist, and the total
    /// size. For example `list<val<sample.fastq.gz=f2c59c40 50.0MiB>, ...75.0MiB>`.
    pub fn short(&self) -> String {
        let size = ByteSize(self.total_size());
        match self {
            Self::Sequence(children) => match children.first() {
                None => format!("list<{size}>"),
                Some(first) => {
                    let sep = if children.len() > 1 { ", ..." } else { " " };
                    format!("list<{}{sep}{size}>", first.short())
                }
            },
            Self::Mapping(entries) => match entries.iter().next() {
                None => "val<>".to_string(),
                Some((path, file)) => {
                    let sep = if entries.len() > 1 { ", ..." } else { " " };
                    format!("val<{path}={}{sep}{size}>", file.short())
                }
            },
        }
    }
}

/// Full rendering: every child, every path, full digests.
impl std::fmt::Display for FilesetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence(children) => {
                let vals: Vec<String> = children.iter().map(ToString::to_string).collect();
                write!(f, "list<{}>", vals.join(", "))
            }
            Self::Mapping(entries) if entries.is_empty() => f.write_str("void"),
            Self::Mapping(entries) => {
                let binds: Vec<String> = entries
                    .iter()
                    .map(|(path, file)| format!("{path}=<{file}>"))
                    .collect();
                write!(f, "obj<{}>", binds.join(", "))
            }
        }
    }
}
