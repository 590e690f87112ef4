//! Incoming message frames.

use mtp_tl_types::{ConstructorId, Error as TlError, Prime, primes_from_bytes};

use crate::message::{MessageId, layout, read_long};
use crate::Result;

/// One decrypted incoming message: header and body.
///
/// The length word is validated on construction, so [`Response::body`]
/// always covers exactly the declared body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    primes: Vec<Prime>,
}

impl Response {
    /// Wrap a decrypted frame.
    pub fn new(primes: Vec<Prime>) -> Result<Self> {
        let Some(&length) = primes.get(layout::LENGTH) else {
            return Err(TlError::InsufficientData.into());
        };
        let length = length as usize;
        if length % 4 != 0 {
            return Err(TlError::BadLength { len: length }.into());
        }
        if primes.len() - layout::BODY < length / 4 {
            return Err(TlError::InsufficientData.into());
        }
        Ok(Self { primes })
    }

    /// Wrap a decrypted frame given as little-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(primes_from_bytes(bytes)?)
    }

    /// Server salt.
    pub fn salt(&self) -> i64 { read_long(&self.primes, layout::SALT) }

    /// Session ID.
    pub fn session_id(&self) -> i64 { read_long(&self.primes, layout::SESSION_ID) }

    /// Message ID.
    pub fn msg_id(&self) -> MessageId { MessageId(read_long(&self.primes, layout::MSG_ID)) }

    /// Sequence number.
    pub fn seq_no(&self) -> i32 { self.primes[layout::SEQ_NO] as i32 }

    /// True when the sender expects an acknowledgement (odd seq_no).
    pub fn need_ack(&self) -> bool { self.seq_no() & 1 == 1 }

    /// The declared body.
    pub fn body(&self) -> &[Prime] {
        let len = self.primes[layout::LENGTH] as usize / 4;
        &self.primes[layout::BODY..layout::BODY + len]
    }

    /// Constructor ID of the body.
    pub fn constructor(&self) -> Option<ConstructorId> { self.body().first().copied() }

    /// The whole frame.
    pub fn primes(&self) -> &[Prime] { &self.primes }
}
