//! `string` / `bytes` backed by a copy-on-write payload.

use std::fmt;

use crate::deserialize::{Buffer, read_bytes};
use crate::serialize::{bytes_len, write_bytes};
use crate::{BareType, ConstructorId, Deserializable, Prime, Result, Serializable, Shared, ids};

/// A TL `string` or `bytes` value.
///
/// Cloning is cheap and aliases the bytes; [`TlBytes::make_mut`] copies them
/// only if another clone is still alive.
#[derive(Clone, PartialEq)]
pub struct TlBytes(Shared<Vec<u8>>);

impl TlBytes {
    /// An empty byte string.
    pub fn new() -> Self { Self(Shared::new(Vec::new())) }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.get().map_or(&[][..], Vec::as_slice)
    }

    /// The bytes as UTF-8, if they are valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize { self.as_bytes().len() }

    /// True if there are no bytes.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Mutable access, detaching from other clones first.
    pub fn make_mut(&mut self) -> &mut Vec<u8> {
        self.0.get_or_insert_mut(Vec::new)
    }

    /// True when another clone still aliases the same bytes.
    pub fn is_shared(&self) -> bool { self.0.is_shared() }

    /// True when both values alias the same storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool { self.0.ptr_eq(&other.0) }
}

impl Default for TlBytes {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for TlBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{s:?}"),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

impl From<Vec<u8>> for TlBytes {
    fn from(v: Vec<u8>) -> Self { Self(Shared::new(v)) }
}

impl From<&[u8]> for TlBytes {
    fn from(v: &[u8]) -> Self { Self::from(v.to_vec()) }
}

impl From<String> for TlBytes {
    fn from(s: String) -> Self { Self::from(s.into_bytes()) }
}

impl From<&str> for TlBytes {
    fn from(s: &str) -> Self { Self::from(s.as_bytes()) }
}

impl Serializable for TlBytes {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        write_bytes(self.as_bytes(), buf);
    }

    fn serialized_len(&self) -> usize { bytes_len(self.len()) }
}

impl Deserializable for TlBytes {
    fn deserialize(buf: Buffer) -> Result<Self> {
        read_bytes(buf).map(Self::from)
    }
}

impl BareType for TlBytes {
    const TYPE_NAME: &'static str = "string";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::STRING];

    fn constructor_id(&self) -> ConstructorId { ids::STRING }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Self::deserialize(buf)
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) { self.serialize(buf); }

    fn bare_len(&self) -> usize { self.serialized_len() }
}
