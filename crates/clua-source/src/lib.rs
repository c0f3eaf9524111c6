//! Clua Source: sequential, byte-tracked access to one source file

pub mod cursor;


pub use cursor::{SourceCursor, CursorError};
