use crate::response_status_code::ResponseStatusCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Everything that can end a single request early.
///
/// None of these are fatal to the server; the connection that hit one is answered (when the
/// response head has not gone out yet) and closed.
#[derive(Debug)]
pub enum ServeError {
    InvalidPath,
    FilePath(io::Error),
    DefaultFileMissing,
    Open(io::Error),
    StreamingNotSupported,
    Read(io::Error),
    Write(io::Error),
}

impl ServeError {
    // 500 for unmatched paths is kept for compatibility with existing clients.
    pub fn status_code(&self) -> ResponseStatusCode {
        ResponseStatusCode::InternalServerError
    }

    /// Plain-text diagnostic sent to the client.
    pub fn body(&self) -> &'static str {
        match self {
            ServeError::InvalidPath => "invalid path / file not found",
            ServeError::FilePath(_) => "File path error",
            ServeError::DefaultFileMissing => "File Not found",
            ServeError::Open(_) => "unable to read the file",
            ServeError::StreamingNotSupported => "streaming is not supported",
            ServeError::Read(_) => "error while reading file",
            ServeError::Write(_) => "error while streaming file",
        }
    }
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::FilePath(err)
            | ServeError::Open(err)
            | ServeError::Read(err)
            | ServeError::Write(err) => write!(f, "{}: {err}", self.body()),
            _ => write!(f, "{}", self.body()),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServeError::FilePath(err)
            | ServeError::Open(err)
            | ServeError::Read(err)
            | ServeError::Write(err) => Some(err),
            _ => None,
        }
    }
}
