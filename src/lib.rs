//! Clua front end data layer
//!
//! Re-exports the loader, the path index, the document store and the source
//! cursor, and ties the session to the cursor.

use std::path::Path;

pub use clua_core::{
    CompilerCache, Document, EntryKind, InvalidReason, LoadOutcome, PathEntry, Pick,
    ProjectCache, Session, TraceOrder, CONFIG_FILENAME, DOCUMENT_EXTENSION, SOURCE_EXTENSION,
};
pub use clua_indexer::{
    enumerate, find_by_extension, find_by_extensions, find_by_name, find_by_name_anywhere,
    is_valid_dir, is_valid_file, load_document, load_many_by_name, load_unique_from_tree,
    organize_source_paths,
};
pub use clua_loader::{EXIT_LOAD_FAILURE, LoadError, Loader, LoaderSettings, bundled_data_dir};
pub use clua_source::{CursorError, SourceCursor};

/// Open a cursor on the first traced source file named `file_name`.
///
/// Only files in the session's source trace are eligible. The cursor accepts
/// the extension the trace was built with, so custom source extensions work.
pub fn open_traced_source(session: &Session, file_name: &str) -> Result<SourceCursor, CursorError> {
    let project = session.project();
    let Some(entry) = project.find_source(file_name) else {
        tracing::debug!("{} is not in the source trace of {}", file_name, project.root().display());
        return Err(CursorError::InvalidSource {
            path: project.root().join(file_name),
            extension: extension_of(Path::new(file_name)),
        });
    };

    let mut cursor = match &entry.extension {
        Some(extension) => SourceCursor::with_extension(extension.clone()),
        None => SourceCursor::new(),
    };
    cursor.open(&entry.path)?;
    Ok(cursor)
}

fn extension_of(path: &Path) -> String {
    clua_core::suffix_of(path).unwrap_or_else(|| SOURCE_EXTENSION.to_string())
}
