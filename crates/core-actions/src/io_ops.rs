//! File persistence for editor buffers.
//!
//! The on-disk format is the buffer's lines joined by `'\n'`. Reading
//! accepts LF, CRLF and lone CR. Writing emits LF only, with a terminator
//! after every line except a trailing empty one, so a buffer that ends with
//! an empty line (the normal case) round-trips to a file ending in `'\n'`
//! and an empty file stays empty.
//!
//! Failures leave the in-memory state untouched so the caller can retry,
//! e.g. by asking for another file name.

use std::io;
use std::path::{Path, PathBuf};

use core_state::EditorState;
use core_text::Buffer;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("buffer has no file name")]
    NoFileName,
}

impl PersistError {
    /// Whether the failure was a read of a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Read `path` into lines with line endings normalized. A file ending in a
/// terminator yields a trailing empty line.
pub fn read_lines(path: &Path) -> Result<Vec<String>, PersistError> {
    let content = std::fs::read_to_string(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized.split('\n').map(str::to_owned).collect();
    debug!(target: "io", lines = lines.len(), bytes = content.len(), "read_lines");
    Ok(lines)
}

/// Write `lines` to `path`, replacing its contents.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), PersistError> {
    let mut content = String::new();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if i == last && line.is_empty() {
            break;
        }
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content.as_bytes()).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "io", lines = lines.len(), bytes = content.len(), "write_lines");
    Ok(())
}

/// Open an editor on `path`.
///
/// A missing file gives an empty buffer bound to `path`, so a later save
/// creates it. Any other read failure is logged and gives an empty unnamed
/// buffer. Loaded text is fed to the completion index and the buffer starts
/// clean.
pub fn open_editor(path: Option<&Path>) -> EditorState {
    let Some(path) = path else {
        return EditorState::new(Buffer::from_text("\n"));
    };
    match read_lines(path) {
        Ok(lines) => {
            let mut state = EditorState::new(Buffer::from_lines(&lines));
            state.set_file_name(Some(path.to_path_buf()));
            state.normalize_trailing_line();
            let words = state.index_buffer();
            state.mark_clean();
            info!(target: "io", lines = state.line_count(), words, "file_opened");
            state
        }
        Err(err) if err.is_not_found() => {
            info!(target: "io", "file_not_found_new_buffer");
            let mut state = EditorState::new(Buffer::from_text("\n"));
            state.set_file_name(Some(path.to_path_buf()));
            state
        }
        Err(err) => {
            error!(target: "io", error = %err, "file_open_error");
            EditorState::new(Buffer::from_text("\n"))
        }
    }
}

/// Save the buffer to `target`, or to its own file name when `target` is
/// `None`. On success the target becomes the buffer's file name, the text
/// is fed to the completion index and the buffer is marked clean. Returns
/// the path written.
pub fn save(state: &mut EditorState, target: Option<&Path>) -> Result<PathBuf, PersistError> {
    let path = match target {
        Some(p) => p.to_path_buf(),
        None => match state.file_name() {
            Some(existing) => existing.to_path_buf(),
            None => {
                debug!(target: "io", "save_without_file_name");
                return Err(PersistError::NoFileName);
            }
        },
    };
    if let Err(err) = write_lines(&path, &state.buffer().lines()) {
        error!(target: "io", error = %err, "file_write_error");
        return Err(err);
    }
    if state.file_name() != Some(path.as_path()) {
        state.set_file_name(Some(path.clone()));
    }
    let words = state.index_buffer();
    state.mark_clean();
    info!(target: "io", lines = state.line_count(), words, "file_saved");
    Ok(path)
}
