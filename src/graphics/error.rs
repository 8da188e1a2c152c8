use std::error;
use std::fmt;

/// Failures the batch driver can report. The stage itself is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    IndexOutOfBounds { index: u32, len: usize },
    OffsetOutOfBounds { offset: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for {} reachable vertices", index, len)
            }
            Error::OffsetOutOfBounds { offset, len } => {
                write!(f, "vertex offset {} out of bounds for {} vertices", offset, len)
            }
        }
    }
}

impl error::Error for Error {}
