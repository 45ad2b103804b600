//! Append-only configuration lines.
//!
//! Shell profiles and the tmux config are treated as sets of lines: a line is
//! either present or appended, never edited or removed.

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::core::validation;
use crate::error::Result;

/// Append `line` to `path` unless the file already contains it as a whole line.
///
/// A missing file is treated as empty and created, along with any missing
/// parent directories. Existing content is left untouched; when the file does
/// not end with a newline one is inserted before the appended line.
///
/// # Returns
///
/// `true` if the line was appended, `false` if it was already present.
///
/// # Errors
///
/// Returns `ValidationError::InvalidLine` if `line` contains a line break, or
/// an IO error if the file cannot be read or written.
pub fn append_line_if_absent(path: &Path, line: &str) -> Result<bool> {
    validation::validate_line(path, line)?;

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if contains_line(&contents, line) {
        debug!(path = %path.display(), line, "line already present");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let mut chunk = String::with_capacity(line.len() + 2);
    if !contents.is_empty() && !contents.ends_with('\n') {
        chunk.push('\n');
    }
    chunk.push_str(line);
    chunk.push('\n');

    file.write_all(chunk.as_bytes())?;
    file.flush()?;

    debug!(path = %path.display(), line, "line appended");
    Ok(true)
}

/// Append each of `lines` that is missing, returning how many were added.
pub fn append_lines_if_absent<'a, I>(path: &Path, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut added = 0;
    for line in lines {
        if append_line_if_absent(path, line)? {
            added += 1;
        }
    }
    Ok(added)
}

/// Whether `contents` holds `line` as one of its lines.
pub fn contains_line(contents: &str, line: &str) -> bool {
    contents.lines().any(|existing| existing == line)
}
