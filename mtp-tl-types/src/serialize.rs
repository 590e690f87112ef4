//! The [`Serializable`] trait and its implementations for primitive TL types.
//!
//! Encoding follows the [MTProto Binary Serialization] rules, expressed in
//! 4-byte primes rather than bytes.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::{Int128, Int256, Prime, ids};

/// Serialize `self` into TL binary format.
pub trait Serializable {
    /// Appends the serialized form of `self` to `buf`.
    fn serialize(&self, buf: &mut impl Extend<Prime>);

    /// Number of primes [`Serializable::serialize`] will append.
    fn serialized_len(&self) -> usize;

    /// Convenience: allocate a fresh `Vec<Prime>` and serialize into it.
    fn to_primes(&self) -> Vec<Prime> {
        let mut v = Vec::with_capacity(self.serialized_len());
        self.serialize(&mut v);
        v
    }

    /// Convenience: serialize and flatten to little-endian bytes.
    fn to_bytes(&self) -> Vec<u8> {
        crate::primes_to_bytes(&self.to_primes())
    }
}

impl<S: Serializable + ?Sized> Serializable for &S {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        (**self).serialize(buf);
    }

    fn serialized_len(&self) -> usize {
        (**self).serialized_len()
    }
}

// ─── bool ────────────────────────────────────────────────────────────────────

/// `true`  → `boolTrue#997275b5`
/// `false` → `boolFalse#bc799737`
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        let id = if *self { ids::BOOL_TRUE } else { ids::BOOL_FALSE };
        buf.extend([id]);
    }

    fn serialized_len(&self) -> usize { 1 }
}

// ─── integers ────────────────────────────────────────────────────────────────

impl Serializable for i32 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([*self as Prime]);
    }

    fn serialized_len(&self) -> usize { 1 }
}

impl Serializable for u32 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([*self]);
    }

    fn serialized_len(&self) -> usize { 1 }
}

/// Low half first.
impl Serializable for u64 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([*self as Prime, (*self >> 32) as Prime]);
    }

    fn serialized_len(&self) -> usize { 2 }
}

impl Serializable for i64 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        (*self as u64).serialize(buf);
    }

    fn serialized_len(&self) -> usize { 2 }
}

impl Serializable for f64 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        self.to_bits().serialize(buf);
    }

    fn serialized_len(&self) -> usize { 2 }
}

impl Serializable for Int128 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        self.low.serialize(buf);
        self.high.serialize(buf);
    }

    fn serialized_len(&self) -> usize { 4 }
}

impl Serializable for Int256 {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        self.low.serialize(buf);
        self.high.serialize(buf);
    }

    fn serialized_len(&self) -> usize { 8 }
}

// ─── strings / bytes ─────────────────────────────────────────────────────────

/// Longest byte string the 3-byte length prefix can describe.
pub const MAX_BYTES_LEN: usize = (1 << 24) - 1;

/// Number of primes a byte string of `len` bytes occupies on the wire.
pub fn bytes_len(len: usize) -> usize {
    let header_len = if len < 254 { 1 } else { 4 };
    (header_len + len).div_ceil(4)
}

/// TL string encoding: a length-prefixed, 4-byte aligned byte string.
///
/// * If `len ≤ 253`: `[len as u8][data][0-padding to align to 4 bytes]`
/// * If `len ≥ 254`: `[0xfe][len as 3 LE bytes][data][0-padding]`
///
/// Lengths above [`MAX_BYTES_LEN`] cannot be represented. Debug builds
/// panic on them; release builds write only the low 24 bits of the length,
/// so the result does not read back.
pub fn write_bytes(data: &[u8], buf: &mut impl Extend<Prime>) {
    let len = data.len();
    debug_assert!(len <= MAX_BYTES_LEN, "TL string of {len} bytes exceeds the 24-bit length prefix");
    let mut raw = Vec::with_capacity(bytes_len(len) * 4);
    if len < 254 {
        raw.push(len as u8);
    } else {
        raw.extend([
            0xfe,
            (len & 0xff) as u8,
            ((len >> 8) & 0xff) as u8,
            ((len >> 16) & 0xff) as u8,
        ]);
    }
    raw.extend_from_slice(data);
    raw.resize(raw.len().div_ceil(4) * 4, 0);

    buf.extend(
        raw.chunks_exact(4)
            .map(|c| Prime::from_le_bytes([c[0], c[1], c[2], c[3]])),
    );
}

/// Written with [`write_bytes`]; at most [`MAX_BYTES_LEN`] bytes.
impl Serializable for [u8] {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        write_bytes(self, buf);
    }

    fn serialized_len(&self) -> usize { bytes_len(self.len()) }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        write_bytes(self, buf);
    }

    fn serialized_len(&self) -> usize { bytes_len(self.len()) }
}

impl Serializable for str {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        write_bytes(self.as_bytes(), buf);
    }

    fn serialized_len(&self) -> usize { bytes_len(self.len()) }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        write_bytes(self.as_bytes(), buf);
    }

    fn serialized_len(&self) -> usize { bytes_len(self.len()) }
}

// ─── Option ──────────────────────────────────────────────────────────────────

/// Optional parameters are handled by flags; when `Some`, serialize the value.
/// When `None`, nothing is written (the flags word already encodes absence).
impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        if let Some(v) = self { v.serialize(buf); }
    }

    fn serialized_len(&self) -> usize {
        self.as_ref().map_or(0, Serializable::serialized_len)
    }
}
