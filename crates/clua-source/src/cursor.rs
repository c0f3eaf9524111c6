//! Line cursor over an open source file
//!
//! The cursor keeps a virtual pointer next to the real file position. Every
//! read overwrites the virtual pointer with the real position, so any
//! adjustment a consumer made in between is discarded. The byte length of
//! every line read is recorded, which lets a consumer recompute the offset
//! of an earlier line and re-scan from there without reopening the file.
//!
//! Lifecycle: `Closed -> Open -> Finished`. A finished cursor cannot be
//! reopened. The file handle is owned by the cursor and released on
//! [`SourceCursor::close`] or when the cursor is dropped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use clua_core::SOURCE_EXTENSION;
use clua_indexer::is_valid_file;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("not a {extension} source file: {}", path.display())]
    InvalidSource { path: PathBuf, extension: String },

    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cursor is already open on {}", .0.display())]
    AlreadyOpen(PathBuf),

    #[error("cursor has been closed and cannot be reused")]
    Finished,

    #[error("cursor is not open")]
    NotOpen,

    #[error("line {line} is beyond the {read} lines read so far")]
    LineOutOfRange { line: usize, read: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

enum CursorState {
    Closed,
    Open(BufReader<File>),
    Finished,
}

pub struct SourceCursor {
    state: CursorState,
    extension: String,
    path: Option<PathBuf>,
    virtual_pos: u64,
    line_lengths: Vec<usize>,
    line_count: usize,
    line: String,
}

impl Default for SourceCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCursor {
    /// A closed cursor accepting `.clua` files
    pub fn new() -> Self {
        Self::with_extension(SOURCE_EXTENSION)
    }

    /// A closed cursor accepting files with `extension` (e.g. `".clua"`)
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            state: CursorState::Closed,
            extension: extension.into(),
            path: None,
            virtual_pos: 0,
            line_lengths: Vec::new(),
            line_count: 0,
            line: String::new(),
        }
    }

    /// Open `path` for reading. On failure the cursor stays closed.
    pub fn open(&mut self, path: &Path) -> Result<(), CursorError> {
        match &self.state {
            CursorState::Open(_) => {
                let current = self.path.clone().unwrap_or_default();
                return Err(CursorError::AlreadyOpen(current));
            }
            CursorState::Finished => return Err(CursorError::Finished),
            CursorState::Closed => {}
        }

        if !is_valid_file(path, Some(&self.extension)) {
            return Err(CursorError::InvalidSource {
                path: path.to_path_buf(),
                extension: self.extension.clone(),
            });
        }

        let file = File::open(path).map_err(|source| CursorError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Opened source file {}", path.display());
        self.state = CursorState::Open(BufReader::new(file));
        self.path = Some(path.to_path_buf());
        self.virtual_pos = 0;
        self.line_lengths.clear();
        self.line_count = 0;
        self.line.clear();
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, CursorState::Open(_))
    }

    /// Path of the file this cursor was opened on
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the next line, terminator included.
    ///
    /// Returns an empty string at end of file. A blank line is `"\n"`, never
    /// empty. Every read is recorded, so a read at end of file adds a
    /// zero-length entry to the history.
    ///
    /// On an I/O error the file is moved back to the start of the line and
    /// the virtual pointer follows it; the read can be retried.
    pub fn read_line(&mut self) -> Result<String, CursorError> {
        let CursorState::Open(reader) = &mut self.state else {
            return Err(CursorError::NotOpen);
        };

        let mut buf = Vec::new();
        let (read, position) = match read_raw_line(reader, &mut buf) {
            Ok(read) => read,
            Err(e) => {
                if let Ok(position) = reader.stream_position() {
                    self.virtual_pos = position;
                }
                return Err(e.into());
            }
        };
        self.virtual_pos = position;

        self.line_lengths.push(read);
        self.line_count += 1;

        self.line = String::from_utf8_lossy(&buf).into_owned();
        Ok(self.line.clone())
    }

    /// True if `line`, as returned by [`SourceCursor::read_line`], marks end of file.
    pub fn is_eof(line: &str) -> bool {
        line.is_empty()
    }

    /// Release the file handle. The cursor cannot be opened again.
    pub fn close(&mut self) -> Result<(), CursorError> {
        if !self.is_open() {
            return Err(CursorError::NotOpen);
        }

        self.state = CursorState::Finished;
        if let Some(path) = &self.path {
            debug!("Closed source file {} after {} lines", path.display(), self.line_count);
        }
        Ok(())
    }

    pub fn position(&self) -> u64 {
        self.virtual_pos
    }

    pub fn set_position(&mut self, position: u64) {
        self.virtual_pos = position;
    }

    /// Set the virtual pointer and return the previous value.
    pub fn update_position(&mut self, position: u64) -> u64 {
        std::mem::replace(&mut self.virtual_pos, position)
    }

    /// `position - self.position()`, exact over the whole `u64` range
    pub fn position_delta(&self, position: u64) -> i128 {
        i128::from(position) - i128::from(self.virtual_pos)
    }

    /// Byte length of every line read so far, in order
    pub fn line_lengths(&self) -> &[usize] {
        &self.line_lengths
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Text returned by the last read
    pub fn current_line(&self) -> &str {
        &self.line
    }

    /// Byte offset at which line `line` (0-based) starts.
    ///
    /// Known for every line read so far and for the line right after them.
    pub fn line_offset(&self, line: usize) -> Option<u64> {
        if line > self.line_lengths.len() {
            return None;
        }
        Some(self.line_lengths[..line].iter().map(|&len| len as u64).sum())
    }

    /// Move the real and virtual positions back to the start of `line` and
    /// forget the history from that line on.
    pub fn rewind_to_line(&mut self, line: usize) -> Result<(), CursorError> {
        let read = self.line_lengths.len();
        let offset = self
            .line_offset(line)
            .ok_or(CursorError::LineOutOfRange { line, read })?;

        let CursorState::Open(reader) = &mut self.state else {
            return Err(CursorError::NotOpen);
        };
        reader.seek(SeekFrom::Start(offset))?;

        self.virtual_pos = offset;
        self.line_lengths.truncate(line);
        self.line_count = line;
        self.line.clear();
        Ok(())
    }
}

/// Read one line, terminator included, and report the position after it.
///
/// A failed read seeks back to where the line started so no byte is lost.
pub(crate) fn read_raw_line<R: BufRead + Seek>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<(usize, u64)> {
    let start = reader.stream_position()?;
    match reader.read_until(b'\n', buf) {
        Ok(read) => Ok((read, reader.stream_position()?)),
        Err(e) => {
            buf.clear();
            reader.seek(SeekFrom::Start(start))?;
            Err(e)
        }
    }
}
