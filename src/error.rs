//! Error type for descriptor extraction.
//!
//! Malformed descriptor text is never an error: unrecognized lines are
//! absorbed as continuation fragments. Only I/O failures surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An input or output file could not be opened or created.
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the input stream failed part way through.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing a record to the output stream failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl ExtractError {
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_names_path() {
        let err = ExtractError::open(
            "missing/asn_types.c",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing/asn_types.c"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;

        let err = ExtractError::Write(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "write failed: pipe closed");
    }
}
