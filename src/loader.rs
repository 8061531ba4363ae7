//! Reads a poll file into memory as raw lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PollError;

/// The unparsed contents of a poll file.
#[derive(Debug, Clone)]
pub struct RawPollFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

/// Opens `path`, reads every line and closes the file again.
///
/// The handle is dropped before this returns, including when a read fails
/// partway through. No parsing happens here.
///
/// # Errors
///
/// Returns [`PollError::Io`] if the file does not exist, cannot be opened, or
/// is not valid UTF-8.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<RawPollFile, PollError> {
    let path = path.as_ref();
    let io_err = |source| PollError::Io {
        path: path.to_path_buf(),
        source,
    };

    let lines = {
        let reader = BufReader::new(File::open(path).map_err(io_err)?);
        reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?
    };

    debug!(lines = lines.len(), "Poll file read");
    Ok(RawPollFile {
        path: path.to_path_buf(),
        lines,
    })
}
