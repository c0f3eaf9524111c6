//! Core data structures shared by the indexer, the loader and the source cursor

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed structured document. Only mappings are accepted at the top level.
pub type Document = serde_yaml::Mapping;

/// Discriminates what kind of filesystem node an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, devices. Never followed.
    Other,
}

/// One filesystem node produced by traversal. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Suffix including the leading dot (`".clua"`), `None` when the name has none.
    pub extension: Option<String>,
}

impl PathEntry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        let extension = suffix_of(&path);
        Self { path, kind, extension }
    }

    /// Last path component, if it is valid UTF-8.
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Number of path components; used to order entries by directory depth.
    pub fn depth(&self) -> usize {
        self.path.components().count()
    }

    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension.as_deref() == Some(ext)
    }
}

impl AsRef<Path> for PathEntry {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Suffix of the final component with its leading dot.
///
/// `"main.clua"` gives `".clua"`, `"archive.tar.gz"` gives `".gz"`, while
/// dotfiles (`".env"`) and trailing dots (`"notes."`) have no suffix.
pub fn suffix_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
}

/// Why a document that exists on disk could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("document is empty")]
    Empty,
    #[error("top-level value is a {found}, expected a mapping")]
    NotAMapping { found: &'static str },
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unreadable document: {0}")]
    Unreadable(String),
}

/// Result of loading one structured document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(Document),
    NotFound,
    Invalid(InvalidReason),
}

impl LoadOutcome {
    /// Collapse to the absent-or-present signal. A malformed document and a
    /// missing one both become `None` here; match on the outcome to tell them apart.
    pub fn found(self) -> Option<Document> {
        match self {
            LoadOutcome::Found(doc) => Some(doc),
            LoadOutcome::NotFound | LoadOutcome::Invalid(_) => None,
        }
    }

    pub fn as_found(&self) -> Option<&Document> {
        match self {
            LoadOutcome::Found(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadOutcome::NotFound)
    }

    pub fn invalid_reason(&self) -> Option<&InvalidReason> {
        match self {
            LoadOutcome::Invalid(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Ordering applied to the source trace.
///
/// Depth is the number of path components. Ties are broken by the full path,
/// ascending, so the order is total for any tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOrder {
    /// Shallow files first: `foo/a.clua` before `foo/bar/b.clua`
    #[default]
    DepthAscending,
    /// Deep files first
    DepthDescending,
}

/// Which match to take when a file name occurs several times in a tree.
/// Selection happens on the lexicographically sorted match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pick {
    First,
    #[default]
    Last,
    /// Zero-based from the front: `Nth(0)` is `First`
    Nth(usize),
    /// Zero-based from the back: `FromEnd(0)` is `Last`, `FromEnd(1)` the one before it
    FromEnd(usize),
}

impl Pick {
    pub fn select<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        match self {
            Pick::First => items.first(),
            Pick::Last => items.last(),
            Pick::Nth(index) => items.get(*index),
            Pick::FromEnd(offset) => items
                .len()
                .checked_sub(*offset)
                .and_then(|remaining| remaining.checked_sub(1))
                .and_then(|index| items.get(index)),
        }
    }
}
