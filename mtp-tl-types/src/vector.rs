//! Homogeneous vectors backed by a copy-on-write payload.

use std::fmt;

use crate::deserialize::Buffer;
use crate::{BareType, ConstructorId, Deserializable, Error, Prime, Result, Serializable, Shared, ids};

/// A TL vector: a 4-byte count followed by packed elements.
///
/// The bare encoding (`vector<T>`) is the count and elements only; wrap in
/// [`crate::Boxed`] for `Vector<T>` with its `0x1cb5c415` header. Elements are
/// written with their own [`Serializable`] impl, so `TlVector<Boxed<X>>` holds
/// boxed elements and `TlVector<i64>` bare ones.
#[derive(Clone, PartialEq)]
pub struct TlVector<T>(Shared<Vec<T>>);

impl<T> TlVector<T> {
    /// An empty vector.
    pub fn new() -> Self { Self(Shared::new(Vec::new())) }

    /// The elements.
    pub fn as_slice(&self) -> &[T] {
        self.0.get().map_or(&[][..], Vec::as_slice)
    }

    /// Number of elements.
    pub fn len(&self) -> usize { self.as_slice().len() }

    /// True if there are no elements.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.as_slice().iter() }

    /// True when another clone still aliases the same elements.
    pub fn is_shared(&self) -> bool { self.0.is_shared() }

    /// True when both values alias the same storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool { self.0.ptr_eq(&other.0) }
}

impl<T: Clone> TlVector<T> {
    /// Mutable access, detaching from other clones first.
    pub fn make_mut(&mut self) -> &mut Vec<T> {
        self.0.get_or_insert_mut(Vec::new)
    }

    /// Append an element.
    pub fn push(&mut self, value: T) {
        self.make_mut().push(value);
    }

    /// Copy the elements out.
    pub fn to_vec(&self) -> Vec<T> { self.as_slice().to_vec() }
}

impl<T> Default for TlVector<T> {
    fn default() -> Self { Self::new() }
}

impl<T: fmt::Debug> fmt::Debug for TlVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> From<Vec<T>> for TlVector<T> {
    fn from(v: Vec<T>) -> Self { Self(Shared::new(v)) }
}

impl<T> FromIterator<T> for TlVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a TlVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T: Serializable> Serializable for TlVector<T> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        (self.len() as u32).serialize(buf);
        for item in self { item.serialize(buf); }
    }

    fn serialized_len(&self) -> usize {
        1 + self.iter().map(Serializable::serialized_len).sum::<usize>()
    }
}

impl<T: Deserializable> Deserializable for TlVector<T> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let len = u32::deserialize(buf)? as usize;
        // Every element occupies at least one prime.
        if len > buf.remaining() {
            return Err(Error::InsufficientData);
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::deserialize(buf)?);
        }
        Ok(Self::from(items))
    }
}

impl<T: Serializable + Deserializable> BareType for TlVector<T> {
    const TYPE_NAME: &'static str = "Vector";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::VECTOR];

    fn constructor_id(&self) -> ConstructorId { ids::VECTOR }

    fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
        Self::deserialize(buf)
    }

    fn write_bare(&self, buf: &mut impl Extend<Prime>) { self.serialize(buf); }

    fn bare_len(&self) -> usize { self.serialized_len() }
}
