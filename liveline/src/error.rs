//! Error types

use alloc::vec::Vec;

/// Enum to hold various error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The session has ended or closed and accepts no more output
    #[error("session is closed")]
    Closed,
    #[error("failed to read input: {0:?}")]
    Read(embedded_io::ErrorKind),
    #[error("failed to write output: {0:?}")]
    Write(embedded_io::ErrorKind),
    /// Tried to bind a byte sequence that already has a binding
    #[error("sequence {0:?} is already bound")]
    DuplicateSequence(Vec<u8>),
    #[error("can not bind an empty sequence")]
    EmptySequence,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match *self {
            Error::Closed => embedded_io::ErrorKind::BrokenPipe,
            Error::Read(kind) | Error::Write(kind) => kind,
            Error::DuplicateSequence(_) | Error::EmptySequence | Error::InvalidConfig(_) => {
                embedded_io::ErrorKind::InvalidInput
            }
        }
    }
}
