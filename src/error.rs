//! Errors raised while loading, parsing and querying poll data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or querying a [`PollTable`](crate::table::PollTable).
#[derive(Error, Debug)]
pub enum PollError {
    /// The source file is missing or could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data line does not have the expected shape.
    #[error("line {line}: invalid {field}: {message}")]
    Parse {
        line: usize,
        field: &'static str,
        message: String,
    },

    /// A query that needs at least one row ran against an empty table.
    #[error("{query} requires at least one parsed row")]
    EmptyData { query: &'static str },
}

impl PollError {
    pub(crate) fn parse(line: usize, field: &'static str, message: impl Into<String>) -> Self {
        PollError::Parse {
            line,
            field,
            message: message.into(),
        }
    }
}
