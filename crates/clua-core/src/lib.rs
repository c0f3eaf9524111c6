//! Clua Core — Data model and session cache for the compiler front end

pub mod model;
pub mod names;
pub mod cache;


pub use model::{Document, EntryKind, PathEntry, LoadOutcome, InvalidReason, TraceOrder, Pick, suffix_of};
pub use cache::{Session, CompilerCache, ProjectCache, insert_once};
pub use names::{
    SOURCE_EXTENSION, DOCUMENT_EXTENSION, CONFIG_FILENAME, DIAGNOSTIC_MESSAGES,
    DEFAULT_CONFIG, TOKEN_TABLE, COMPILER_DATA_FILES,
};
