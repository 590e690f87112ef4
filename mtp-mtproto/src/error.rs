//! Errors produced by the framing layer.

use std::{fmt, io};

/// Errors that can occur while framing or unpacking MTProto messages.
#[derive(Debug)]
pub enum Error {
    /// A TL value failed to decode or a session precondition failed.
    Tl(mtp_tl_types::Error),
    /// A `gzip_packed` payload could not be inflated.
    Inflate(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tl(e) => write!(f, "{e}"),
            Self::Inflate(e) => write!(f, "gzip inflate failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tl(e) => Some(e),
            Self::Inflate(e) => Some(e),
        }
    }
}

impl From<mtp_tl_types::Error> for Error {
    fn from(e: mtp_tl_types::Error) -> Self { Self::Tl(e) }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Self::Inflate(e) }
}

/// Specialized `Result` for the framing layer.
pub type Result<T> = std::result::Result<T, Error>;
