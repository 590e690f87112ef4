//! The error taxonomy shared by every codec operation.

use std::fmt;

use crate::ConstructorId;

/// Errors that can occur while encoding, decoding or converting TL values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Ran out of primes before the value was fully read.
    InsufficientData,
    /// A boxed value carried a constructor ID outside its legal set.
    UnexpectedConstructor {
        /// The ID found on the wire.
        id: ConstructorId,
        /// Name of the type that was being read.
        context: &'static str,
    },
    /// A default-constructed container was read before anything was assigned.
    UninitializedValue,
    /// A value was constructed from a raw ID that its type does not accept.
    BadConstructorId {
        /// The rejected ID.
        id: ConstructorId,
        /// Name of the type that rejected it.
        type_name: &'static str,
    },
    /// A boxed value was narrowed to a constructor it does not hold.
    WrongConstructorForConversion {
        /// The constructor the value actually holds.
        id: ConstructorId,
        /// The constructor the conversion required.
        required: ConstructorId,
    },
    /// A session-layer operation ran before the auth key was ready.
    KeyNotReady {
        /// The operation that was attempted.
        operation: &'static str,
    },
    /// A byte length that must be word aligned was not.
    BadLength {
        /// The offending length in bytes.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => write!(f, "insufficient data"),
            Self::UnexpectedConstructor { id, context } => {
                write!(f, "unexpected constructor {id:#010x} for {context}")
            }
            Self::UninitializedValue => write!(f, "value is not initialized"),
            Self::BadConstructorId { id, type_name } => {
                write!(f, "bad constructor id {id:#010x} for {type_name}")
            }
            Self::WrongConstructorForConversion { id, required } => {
                write!(f, "wrong constructor {id:#010x} for conversion, required {required:#010x}")
            }
            Self::KeyNotReady { operation } => write!(f, "auth key not ready for {operation}"),
            Self::BadLength { len } => write!(f, "length {len} is not a multiple of 4"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
