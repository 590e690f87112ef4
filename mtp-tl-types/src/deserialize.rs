//! The [`Deserializable`] trait, [`Cursor`] buffer, and primitive impls.

use crate::{Error, Int128, Int256, Prime, Result, ids};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// A zero-copy cursor over an in-memory prime slice.
///
/// Reading past the end is the only way a cursor can fail, and it always
/// fails with [`Error::InsufficientData`] without consuming anything.
pub struct Cursor<'a> {
    buf: &'a [Prime],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn from_slice(buf: &'a [Prime]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current prime offset.
    pub fn pos(&self) -> usize { self.pos }

    /// Remaining primes.
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// True once every prime has been consumed.
    pub fn is_empty(&self) -> bool { self.remaining() == 0 }

    /// Look at the next prime without consuming it.
    pub fn peek_prime(&self) -> Result<Prime> {
        self.buf.get(self.pos).copied().ok_or(Error::InsufficientData)
    }

    /// Read a single prime.
    pub fn read_prime(&mut self) -> Result<Prime> {
        let p = self.peek_prime()?;
        self.pos += 1;
        Ok(p)
    }

    /// Read exactly `n` primes.
    pub fn read_primes(&mut self, n: usize) -> Result<&'a [Prime]> {
        if n > self.remaining() {
            return Err(Error::InsufficientData);
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume all remaining primes.
    pub fn read_to_end(&mut self) -> &'a [Prime] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }
}

/// Shorthand used by readers: `fn deserialize(buf: Buffer) -> Result<Self>`.
pub type Buffer<'a, 'b> = &'a mut Cursor<'b>;

// ─── Deserializable ──────────────────────────────────────────────────────────

/// Deserialize a value from TL binary format.
pub trait Deserializable: Sized {
    /// Read `Self` from `buf`, advancing its position.
    fn deserialize(buf: Buffer) -> Result<Self>;

    /// Convenience: deserialize from a prime slice.
    fn from_primes(primes: &[Prime]) -> Result<Self> {
        let mut cursor = Cursor::from_slice(primes);
        Self::deserialize(&mut cursor)
    }

    /// Convenience: deserialize from little-endian bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_primes(&crate::primes_from_bytes(bytes)?)
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

impl Deserializable for bool {
    fn deserialize(buf: Buffer) -> Result<Self> {
        match buf.read_prime()? {
            ids::BOOL_TRUE => Ok(true),
            ids::BOOL_FALSE => Ok(false),
            id => Err(Error::UnexpectedConstructor { id, context: "Bool" }),
        }
    }
}

impl Deserializable for i32 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(buf.read_prime()? as i32)
    }
}

impl Deserializable for u32 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        buf.read_prime()
    }
}

impl Deserializable for u64 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let halves = buf.read_primes(2)?;
        Ok(u64::from(halves[0]) | (u64::from(halves[1]) << 32))
    }
}

impl Deserializable for i64 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(u64::deserialize(buf)? as i64)
    }
}

impl Deserializable for f64 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(f64::from_bits(u64::deserialize(buf)?))
    }
}

impl Deserializable for Int128 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        if buf.remaining() < 4 {
            return Err(Error::InsufficientData);
        }
        Ok(Self { low: u64::deserialize(buf)?, high: u64::deserialize(buf)? })
    }
}

impl Deserializable for Int256 {
    fn deserialize(buf: Buffer) -> Result<Self> {
        if buf.remaining() < 8 {
            return Err(Error::InsufficientData);
        }
        Ok(Self { low: Int128::deserialize(buf)?, high: Int128::deserialize(buf)? })
    }
}

// ─── Bytes / String ───────────────────────────────────────────────────────────

/// Read a length-prefixed byte string, skipping its alignment padding.
///
/// The whole encoded string is bounds-checked before anything is consumed.
pub fn read_bytes(buf: Buffer) -> Result<Vec<u8>> {
    let first = buf.peek_prime()?.to_le_bytes();
    let (len, header_len) = if first[0] != 0xfe {
        (first[0] as usize, 1)
    } else {
        (first[1] as usize | (first[2] as usize) << 8 | (first[3] as usize) << 16, 4)
    };

    let words = buf.read_primes((header_len + len).div_ceil(4))?;
    let mut raw: Vec<u8> = words.iter().flat_map(|p| p.to_le_bytes()).collect();
    raw.truncate(header_len + len);
    raw.drain(..header_len);
    Ok(raw)
}

impl Deserializable for Vec<u8> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        read_bytes(buf)
    }
}

/// Invalid UTF-8 is replaced rather than rejected; use `Vec<u8>` or
/// [`crate::TlBytes`] to keep the raw bytes.
impl Deserializable for String {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let bytes = read_bytes(buf)?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }
}
