//! TL binary codec over 4-byte words.
//!
//! Every TL value is a sequence of [`Prime`]s (little-endian 32-bit words).
//! This crate provides the primitive codecs and the building blocks that the
//! framing layer and the text dumper sit on.
//!
//! # Overview
//!
//! | Item                | Contents                                                 |
//! |---------------------|----------------------------------------------------------|
//! | [`Serializable`]    | Writes a value as primes                                 |
//! | [`Deserializable`]  | Reads a value from a [`Cursor`]                          |
//! | [`BareType`]        | Values whose constructor is known from context           |
//! | [`Boxed`]           | A bare value prefixed with its constructor ID            |
//! | [`Shared`]          | Copy-on-write payload behind [`TlBytes`] and [`TlVector`]|
//! | [`ids`]             | Fixed constructor IDs                                    |
//!
//! # Example
//!
//! ```rust
//! use mtp_tl_types::{Boxed, Deserializable, Serializable, TlVector};
//!
//! let ids: Boxed<TlVector<i64>> = Boxed::new(vec![1, 2, 3].into());
//! let primes = ids.to_primes();
//! assert_eq!(primes.len(), ids.serialized_len());
//!
//! let back = Boxed::<TlVector<i64>>::from_primes(&primes).unwrap();
//! assert_eq!(back.into_inner().as_slice(), &[1, 2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod boxed;
pub mod deserialize;
pub mod error;
pub mod ids;
pub mod serialize;
mod shared;
mod string;
mod vector;

pub use boxed::{BareType, Boxed};
pub use deserialize::{Cursor, Deserializable};
pub use error::{Error, Result};
pub use serialize::Serializable;
pub use shared::Shared;
pub use string::TlBytes;
pub use vector::TlVector;

/// The atomic 4-byte wire word.
pub type Prime = u32;

/// 32-bit tag identifying a schema type or one of its variants.
pub type ConstructorId = u32;

/// A 128-bit integer as two 64-bit halves, low first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Int128 {
    /// Low half.
    pub low: u64,
    /// High half.
    pub high: u64,
}

/// A 256-bit integer as two 128-bit halves, low first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Int256 {
    /// Low half.
    pub low: Int128,
    /// High half.
    pub high: Int128,
}

impl From<[u8; 16]> for Int128 {
    fn from(b: [u8; 16]) -> Self {
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        low.copy_from_slice(&b[..8]);
        high.copy_from_slice(&b[8..]);
        Self { low: u64::from_le_bytes(low), high: u64::from_le_bytes(high) }
    }
}

impl From<Int128> for [u8; 16] {
    fn from(v: Int128) -> Self {
        let mut b = [0u8; 16];
        b[..8].copy_from_slice(&v.low.to_le_bytes());
        b[8..].copy_from_slice(&v.high.to_le_bytes());
        b
    }
}

impl From<[u8; 32]> for Int256 {
    fn from(b: [u8; 32]) -> Self {
        let mut low = [0u8; 16];
        let mut high = [0u8; 16];
        low.copy_from_slice(&b[..16]);
        high.copy_from_slice(&b[16..]);
        Self { low: low.into(), high: high.into() }
    }
}

impl From<Int256> for [u8; 32] {
    fn from(v: Int256) -> Self {
        let mut b = [0u8; 32];
        b[..16].copy_from_slice(&<[u8; 16]>::from(v.low));
        b[16..].copy_from_slice(&<[u8; 16]>::from(v.high));
        b
    }
}

// ─── Core traits ──────────────────────────────────────────────────────────────

/// Types with exactly one constructor ID.
pub trait Identifiable {
    /// The constructor ID as specified in the TL schema.
    const CONSTRUCTOR_ID: ConstructorId;
}

/// Marks a function type that can be sent as an RPC call.
///
/// `Return` is the type the other side will respond with.
pub trait RemoteCall: Serializable {
    /// The deserialized response type.
    type Return: Deserializable;
}

// ─── Transport boundary ──────────────────────────────────────────────────────

/// Split little-endian bytes into primes.
///
/// Fails with [`Error::InsufficientData`] when the last word is incomplete.
pub fn primes_from_bytes(bytes: &[u8]) -> Result<Vec<Prime>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InsufficientData);
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| Prime::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Join primes into little-endian bytes.
pub fn primes_to_bytes(primes: &[Prime]) -> Vec<u8> {
    primes.iter().flat_map(|p| p.to_le_bytes()).collect()
}
