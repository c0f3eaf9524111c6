//! YAML document loading
//!
//! Every loader here reports through [`LoadOutcome`]; YAML errors are caught
//! and tagged, never propagated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clua_core::{DOCUMENT_EXTENSION, Document, InvalidReason, LoadOutcome, PathEntry, Pick};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::paths::{find_by_name, is_valid_file};

/// Load one YAML document from disk.
///
/// `include_empty` turns an empty (or comment-only) file into an empty
/// mapping instead of `Invalid(Empty)`.
pub fn load_document(path: &Path, include_empty: bool) -> LoadOutcome {
    if !is_valid_file(path, Some(DOCUMENT_EXTENSION)) {
        debug!("No YAML document at {}", path.display());
        return LoadOutcome::NotFound;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return LoadOutcome::Invalid(InvalidReason::Unreadable(e.to_string()));
        }
    };

    let outcome = parse_document(&content, include_empty);
    if let LoadOutcome::Invalid(reason) = &outcome {
        warn!("Invalid document {}: {}", path.display(), reason);
    }
    outcome
}

/// Parse YAML text with the same policy as [`load_document`].
pub fn parse_document(content: &str, include_empty: bool) -> LoadOutcome {
    if is_blank(content) {
        return empty_outcome(include_empty);
    }

    match serde_yaml::from_str::<Value>(content) {
        Ok(Value::Mapping(mapping)) => LoadOutcome::Found(mapping),
        Ok(Value::Null) => empty_outcome(include_empty),
        Ok(other) => LoadOutcome::Invalid(InvalidReason::NotAMapping { found: kind_of(&other) }),
        Err(e) => LoadOutcome::Invalid(InvalidReason::Syntax(e.to_string())),
    }
}

/// Load every file of `tree` named `filename`, keyed by file path.
///
/// Files that fail to load are logged and left out. `None` when nothing loaded.
pub fn load_many_by_name(
    tree: &[PathEntry],
    filename: &str,
    include_empty: bool,
) -> Option<BTreeMap<PathBuf, Document>> {
    let matches = find_by_name(tree, filename)?;

    let mut loaded = BTreeMap::new();
    for entry in matches {
        match load_document(&entry.path, include_empty) {
            LoadOutcome::Found(doc) => {
                loaded.insert(entry.path, doc);
            }
            LoadOutcome::NotFound => {
                debug!("Skipping {}: not a YAML file", entry.path.display());
            }
            LoadOutcome::Invalid(reason) => {
                warn!("Skipping {}: {}", entry.path.display(), reason);
            }
        }
    }

    if loaded.is_empty() { None } else { Some(loaded) }
}

/// Load a single `filename` out of `tree`.
///
/// Matches are sorted by path before `pick` is applied, so the choice is the
/// same on every platform.
pub fn load_unique_from_tree(
    tree: &[PathEntry],
    filename: &str,
    pick: Pick,
    include_empty: bool,
) -> LoadOutcome {
    let Some(mut matches) = find_by_name(tree, filename) else {
        debug!("{} not present in tree", filename);
        return LoadOutcome::NotFound;
    };

    matches.sort_by(|a, b| a.path.cmp(&b.path));
    if matches.len() > 1 {
        debug!("{} copies of {} found, selecting {:?}", matches.len(), filename, pick);
    }

    match pick.select(&matches) {
        Some(entry) => load_document(&entry.path, include_empty),
        None => {
            warn!("Selection {:?} out of range for {} ({} matches)", pick, filename, matches.len());
            LoadOutcome::NotFound
        }
    }
}

fn empty_outcome(include_empty: bool) -> LoadOutcome {
    if include_empty {
        LoadOutcome::Found(Document::new())
    } else {
        LoadOutcome::Invalid(InvalidReason::Empty)
    }
}

// Whitespace and comments only
fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
