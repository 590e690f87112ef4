use std::fmt;

/// Why a dump stopped early.
///
/// Never returned to callers of the dump entry points: it is rendered into
/// the output as `[ERROR] (...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DumpError {
    /// The input did not decode.
    Decode(mtp_tl_types::Error),
    /// A `gzip_packed` payload did not inflate.
    Inflate(String),
    /// `gzip_packed` nested deeper than the configured limit.
    NestingTooDeep(usize),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{e}"),
            Self::Inflate(e) => write!(f, "gzip inflate failed: {e}"),
            Self::NestingTooDeep(n) => write!(f, "gzip_packed nested deeper than {n}"),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<mtp_tl_types::Error> for DumpError {
    fn from(e: mtp_tl_types::Error) -> Self { Self::Decode(e) }
}
