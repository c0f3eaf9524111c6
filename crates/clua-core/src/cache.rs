//! Session cache for loaded compiler and project data
//!
//! A [`Session`] is written once by the loader and only read afterwards.
//! It is an ordinary value owned by the caller, so several sessions can
//! coexist in one process.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::model::{Document, PathEntry};
use crate::names::{DEFAULT_CONFIG, DIAGNOSTIC_MESSAGES, TOKEN_TABLE};

/// Insert `value` under `key` unless the key is already present.
///
/// Returns `false` and keeps the existing value on a duplicate key.
pub fn insert_once<K: Ord + Debug, V>(map: &mut BTreeMap<K, V>, key: K, value: V) -> bool {
    if map.contains_key(&key) {
        tracing::warn!("Duplicate entry {:?} ignored, keeping the first one", key);
        return false;
    }
    map.insert(key, value);
    true
}

/// Data loaded from the compiler's own data directory.
#[derive(Debug, Clone, Default)]
pub struct CompilerCache {
    tree: Vec<PathEntry>,
    database: BTreeMap<String, Document>,
    tokens: Vec<String>,
}

impl CompilerCache {
    pub fn new(tree: Vec<PathEntry>, database: BTreeMap<String, Document>, tokens: Vec<String>) -> Self {
        Self { tree, database, tokens }
    }

    /// Every whitelisted file found under the compiler data directory
    pub fn tree(&self) -> &[PathEntry] {
        &self.tree
    }

    /// Canonical filename to parsed document
    pub fn database(&self) -> &BTreeMap<String, Document> {
        &self.database
    }

    /// Token names read from the token table, sorted
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn document(&self, filename: &str) -> Option<&Document> {
        self.database.get(filename)
    }

    pub fn diagnostics(&self) -> Option<&Document> {
        self.document(DIAGNOSTIC_MESSAGES)
    }

    pub fn default_config(&self) -> Option<&Document> {
        self.document(DEFAULT_CONFIG)
    }

    pub fn token_table(&self) -> Option<&Document> {
        self.document(TOKEN_TABLE)
    }
}

/// Data loaded from the user's project directory.
#[derive(Debug, Clone, Default)]
pub struct ProjectCache {
    root: PathBuf,
    tree: Vec<PathEntry>,
    source_trace: Vec<PathEntry>,
    config_map: BTreeMap<PathBuf, Document>,
}

impl ProjectCache {
    pub fn new(
        root: PathBuf,
        tree: Vec<PathEntry>,
        source_trace: Vec<PathEntry>,
        config_map: BTreeMap<PathBuf, Document>,
    ) -> Self {
        Self { root, tree, source_trace, config_map }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tree(&self) -> &[PathEntry] {
        &self.tree
    }

    /// Source files in trace order
    pub fn source_trace(&self) -> &[PathEntry] {
        &self.source_trace
    }

    /// Directory to its configuration document. Never merged.
    pub fn config_map(&self) -> &BTreeMap<PathBuf, Document> {
        &self.config_map
    }

    /// Configuration declared directly in `dir`; parents are not consulted.
    pub fn config_for(&self, dir: &Path) -> Option<&Document> {
        self.config_map.get(dir)
    }

    /// First source file in trace order whose file name is `file_name`.
    pub fn find_source(&self, file_name: &str) -> Option<&PathEntry> {
        self.source_trace.iter().find(|entry| entry.name() == Some(file_name))
    }
}

/// One compilation session: compiler data plus project data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    compiler: CompilerCache,
    project: ProjectCache,
}

impl Session {
    pub fn new(compiler: CompilerCache, project: ProjectCache) -> Self {
        Self { compiler, project }
    }

    pub fn compiler(&self) -> &CompilerCache {
        &self.compiler
    }

    pub fn project(&self) -> &ProjectCache {
        &self.project
    }
}
