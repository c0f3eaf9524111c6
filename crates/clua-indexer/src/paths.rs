//! Path validation, directory enumeration and tree searches
//!
//! Nothing in this module fails loudly. Invalid input yields `false`, an
//! empty enumeration, or `None`; searches never return an empty `Vec`.

use std::cmp::Ordering;
use std::path::Path;

use clua_core::{EntryKind, PathEntry, TraceOrder, suffix_of};
use ignore::WalkBuilder;
use tracing::{debug, warn};

/// True if `path` is an existing regular file and, when `extension` is given,
/// its suffix (`".yaml"`) matches exactly.
pub fn is_valid_file(path: &Path, extension: Option<&str>) -> bool {
    if !path.is_file() {
        return false;
    }
    match extension {
        Some(ext) => suffix_of(path).as_deref() == Some(ext),
        None => true,
    }
}

/// True if `path` is an existing directory.
pub fn is_valid_dir(path: &Path) -> bool {
    path.is_dir()
}

/// List the entries below `dir`.
///
/// Non-recursive mode lists immediate children only. Entries are absolute
/// (rooted at the canonical form of `dir`), depth-first, with siblings sorted
/// by file name. The directory itself is not included. Unreadable entries
/// are skipped.
pub fn enumerate(dir: &Path, recursive: bool) -> Vec<PathEntry> {
    if !is_valid_dir(dir) {
        debug!("Not a directory, nothing to enumerate: {}", dir.display());
        return Vec::new();
    }

    let root = match dir.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            warn!("Cannot resolve directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if !recursive {
        builder.max_depth(Some(1));
    }

    let mut entries = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // Depth 0 is the root itself
        if entry.depth() == 0 {
            continue;
        }

        let kind = match entry.file_type() {
            Some(ft) if ft.is_file() => EntryKind::File,
            Some(ft) if ft.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        };
        entries.push(PathEntry::new(entry.into_path(), kind));
    }

    debug!("Enumerated {} entries under {}", entries.len(), root.display());
    entries
}

fn non_empty(entries: Vec<PathEntry>) -> Option<Vec<PathEntry>> {
    if entries.is_empty() { None } else { Some(entries) }
}

/// Entries of `tree` whose last component is exactly `name` (case-sensitive).
pub fn find_by_name(tree: &[PathEntry], name: &str) -> Option<Vec<PathEntry>> {
    non_empty(
        tree.iter()
            .filter(|entry| entry.name() == Some(name))
            .cloned()
            .collect(),
    )
}

/// Entries of `tree` that are valid files with the given suffix.
///
/// Symlinks are listed as `EntryKind::Other` and stay out even when their
/// target is a regular file.
pub fn find_by_extension(tree: &[PathEntry], extension: &str) -> Option<Vec<PathEntry>> {
    non_empty(
        tree.iter()
            .filter(|entry| entry.is_file() && is_valid_file(&entry.path, Some(extension)))
            .cloned()
            .collect(),
    )
}

/// Enumerate `dir` and keep the entries whose suffix is in `extensions`.
pub fn find_by_extensions<S: AsRef<str>>(
    dir: &Path,
    extensions: &[S],
    recursive: bool,
) -> Option<Vec<PathEntry>> {
    if !is_valid_dir(dir) {
        return None;
    }

    non_empty(
        enumerate(dir, recursive)
            .into_iter()
            .filter(|entry| {
                entry.extension.as_deref().is_some_and(|ext| {
                    extensions.iter().any(|allowed| allowed.as_ref() == ext)
                })
            })
            .collect(),
    )
}

/// Enumerate `dir` and keep the entries named exactly `name`.
pub fn find_by_name_anywhere(dir: &Path, name: &str, recursive: bool) -> Option<Vec<PathEntry>> {
    if !is_valid_dir(dir) {
        return None;
    }

    non_empty(
        enumerate(dir, recursive)
            .into_iter()
            .filter(|entry| entry.name() == Some(name))
            .collect(),
    )
}

/// Source files of `tree` ordered by directory depth.
///
/// Depth counts path components; equal depths fall back to the full path so
/// the result does not depend on the order of `tree`.
pub fn organize_source_paths(
    tree: &[PathEntry],
    extension: &str,
    order: TraceOrder,
) -> Option<Vec<PathEntry>> {
    let mut sources = find_by_extension(tree, extension)?;

    sources.sort_by(|a, b| {
        let by_depth = match order {
            TraceOrder::DepthAscending => a.depth().cmp(&b.depth()),
            TraceOrder::DepthDescending => b.depth().cmp(&a.depth()),
        };
        match by_depth {
            Ordering::Equal => a.path.cmp(&b.path),
            unequal => unequal,
        }
    });

    Some(sources)
}
