//! Boxed and bare values.
//!
//! A *bare* value is written without a constructor ID because the reader
//! already knows which constructor to expect. A *boxed* value is prefixed
//! with its constructor ID so it describes itself.
//!
//! [`Boxed`] only wraps types implementing [`BareType`], and does not
//! implement [`BareType`] itself, so boxing a boxed value does not compile:
//!
//! ```compile_fail
//! use mtp_tl_types::Boxed;
//!
//! let inner: Boxed<i32> = Boxed::new(7);
//! let _twice: Boxed<Boxed<i32>> = Boxed::new(inner);
//! ```

use crate::deserialize::Buffer;
use crate::{ConstructorId, Deserializable, Error, Int128, Int256, Prime, Result, Serializable, ids};

/// A TL type that can be read and written without its constructor ID.
pub trait BareType: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Every constructor ID this type may carry.
    const CONSTRUCTORS: &'static [ConstructorId];

    /// The constructor ID of this particular value.
    fn constructor_id(&self) -> ConstructorId;

    /// Read the fields of constructor `id`.
    ///
    /// `id` has already been checked against [`BareType::CONSTRUCTORS`] when
    /// called through [`Boxed`].
    fn read_bare(id: ConstructorId, buf: Buffer) -> Result<Self>;

    /// Write the fields, without the constructor ID.
    fn write_bare(&self, buf: &mut impl Extend<Prime>);

    /// Number of primes [`BareType::write_bare`] appends.
    fn bare_len(&self) -> usize;

    /// Validate a raw constructor ID for this type.
    fn check_constructor(id: ConstructorId) -> Result<ConstructorId> {
        if Self::CONSTRUCTORS.contains(&id) {
            Ok(id)
        } else {
            Err(Error::BadConstructorId { id, type_name: Self::TYPE_NAME })
        }
    }

    /// Read a bare value whose constructor is the type's first (or only) one.
    fn read_default_bare(buf: Buffer) -> Result<Self> {
        Self::read_bare(Self::CONSTRUCTORS[0], buf)
    }
}

/// A bare value prefixed with its constructor ID on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Boxed<T: BareType>(T);

impl<T: BareType> Boxed<T> {
    /// Box a bare value.
    pub fn new(value: T) -> Self { Self(value) }

    /// The wrapped bare value.
    pub fn get(&self) -> &T { &self.0 }

    /// Mutable access to the wrapped bare value.
    pub fn get_mut(&mut self) -> &mut T { &mut self.0 }

    /// Unwrap into the bare value.
    pub fn into_inner(self) -> T { self.0 }

    /// The constructor ID that will lead the encoding.
    pub fn constructor_id(&self) -> ConstructorId { self.0.constructor_id() }
}

impl<T: BareType> From<T> for Boxed<T> {
    fn from(value: T) -> Self { Self(value) }
}

impl<T: BareType> Serializable for Boxed<T> {
    fn serialize(&self, buf: &mut impl Extend<Prime>) {
        buf.extend([self.0.constructor_id()]);
        self.0.write_bare(buf);
    }

    fn serialized_len(&self) -> usize { 1 + self.0.bare_len() }
}

impl<T: BareType> Deserializable for Boxed<T> {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = buf.read_prime()?;
        if !T::CONSTRUCTORS.contains(&id) {
            return Err(Error::UnexpectedConstructor { id, context: T::TYPE_NAME });
        }
        T::read_bare(id, buf).map(Self)
    }
}

// ─── Primitive bare types ────────────────────────────────────────────────────

macro_rules! primitive_bare {
    ($ty:ty, $name:literal, $id:expr) => {
        impl BareType for $ty {
            const TYPE_NAME: &'static str = $name;
            const CONSTRUCTORS: &'static [ConstructorId] = &[$id];

            fn constructor_id(&self) -> ConstructorId { $id }

            fn read_bare(_id: ConstructorId, buf: Buffer) -> Result<Self> {
                <$ty>::deserialize(buf)
            }

            fn write_bare(&self, buf: &mut impl Extend<Prime>) { self.serialize(buf); }

            fn bare_len(&self) -> usize { self.serialized_len() }
        }
    };
}

primitive_bare!(i32, "int", ids::INT);
primitive_bare!(i64, "long", ids::LONG);
primitive_bare!(f64, "double", ids::DOUBLE);
primitive_bare!(Int128, "int128", ids::INT128);
primitive_bare!(Int256, "int256", ids::INT256);

/// `Bool` has two field-less constructors; the value lives in the ID.
impl BareType for bool {
    const TYPE_NAME: &'static str = "Bool";
    const CONSTRUCTORS: &'static [ConstructorId] = &[ids::BOOL_TRUE, ids::BOOL_FALSE];

    fn constructor_id(&self) -> ConstructorId {
        if *self { ids::BOOL_TRUE } else { ids::BOOL_FALSE }
    }

    fn read_bare(id: ConstructorId, _buf: Buffer) -> Result<Self> {
        Ok(Self::check_constructor(id)? == ids::BOOL_TRUE)
    }

    fn write_bare(&self, _buf: &mut impl Extend<Prime>) {}

    fn bare_len(&self) -> usize { 0 }
}
