//! Copy-on-write payload storage.

use std::fmt;
use std::rc::Rc;

use crate::{Error, Result};

/// A reference-counted payload that is cloned on the first mutation while
/// shared.
///
/// Cloning a `Shared` aliases the payload. Every mutating accessor calls
/// [`Shared::detach`] first, which copies the payload only when another
/// handle still points at it; read-only access never copies.
///
/// A `Shared::default()` holds nothing until assigned, and reads from it fail
/// with [`Error::UninitializedValue`].
///
/// The share count is not atomic, so a `Shared` cannot cross threads.
pub struct Shared<T> {
    inner: Option<Rc<T>>,
}

impl<T> Shared<T> {
    /// Wrap `value` with a share count of one.
    pub fn new(value: T) -> Self {
        Self { inner: Some(Rc::new(value)) }
    }

    /// True once a payload has been assigned.
    pub fn is_initialized(&self) -> bool { self.inner.is_some() }

    /// Read-only view of the payload.
    pub fn get(&self) -> Result<&T> {
        self.inner.as_deref().ok_or(Error::UninitializedValue)
    }

    /// Replace the payload, releasing this handle's reference to the old one.
    pub fn assign(&mut self, value: T) {
        self.inner = Some(Rc::new(value));
    }

    /// Number of handles currently aliasing the payload (zero if unassigned).
    pub fn share_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    /// True when another handle aliases the same payload.
    pub fn is_shared(&self) -> bool { self.share_count() > 1 }

    /// True when both handles point at the same payload.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Clone> Shared<T> {
    /// Give this handle a private copy of the payload if it is shared.
    pub fn detach(&mut self) {
        if let Some(rc) = &mut self.inner {
            if Rc::strong_count(rc) > 1 {
                let copy = T::clone(&**rc);
                *rc = Rc::new(copy);
            }
        }
    }

    /// Mutable view of the payload, detaching first.
    pub fn make_mut(&mut self) -> Result<&mut T> {
        self.detach();
        // Unique after `detach`, so `make_mut` never clones here.
        self.inner.as_mut().map(Rc::make_mut).ok_or(Error::UninitializedValue)
    }

    /// Like [`Shared::make_mut`], assigning `init()` first if unassigned.
    pub fn get_or_insert_mut(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.detach();
        Rc::make_mut(self.inner.get_or_insert_with(|| Rc::new(init())))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self { Self { inner: None } }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(v) => f.debug_tuple("Shared").field(v).finish(),
            None => f.write_str("Shared(<uninitialized>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_aliases_until_mutation() {
        let y = Shared::new(vec![1, 2, 3]);
        let mut x = y.clone();
        assert!(x.ptr_eq(&y));
        assert_eq!(y.share_count(), 2);

        x.make_mut().unwrap().push(4);

        assert!(!x.ptr_eq(&y));
        assert_eq!(y.get().unwrap(), &vec![1, 2, 3]);
        assert_eq!(x.get().unwrap(), &vec![1, 2, 3, 4]);
        assert_eq!(x.share_count(), 1);
        assert_eq!(y.share_count(), 1);
    }

    #[test]
    fn unique_mutation_does_not_copy() {
        let mut x = Shared::new(String::from("abc"));
        let before: *const String = x.get().unwrap();
        x.make_mut().unwrap().push('d');
        assert_eq!(x.get().unwrap() as *const String, before);
    }

    #[test]
    fn reads_never_detach() {
        let y = Shared::new(5u8);
        let x = y.clone();
        assert_eq!(*x.get().unwrap(), 5);
        assert!(x.ptr_eq(&y));
    }

    #[test]
    fn drop_releases_reference() {
        let y = Shared::new(0u32);
        {
            let _x = y.clone();
            assert_eq!(y.share_count(), 2);
        }
        assert_eq!(y.share_count(), 1);
    }

    #[test]
    fn uninitialized_access_fails() {
        let mut x: Shared<Vec<u8>> = Shared::default();
        assert_eq!(x.get(), Err(Error::UninitializedValue));
        assert_eq!(x.make_mut().err(), Some(Error::UninitializedValue));
        x.assign(vec![9]);
        assert_eq!(x.get().unwrap(), &vec![9]);
    }
}
