//! Array-backed growable sequence.
//!
//! `GrowableSeq` doubles its backing capacity whenever a push finds it full
//! (growing by one slot when it is still empty) and removes by value with a
//! linear scan followed by a left shift. Insertion order is always kept.
//!
//! The stores use it two ways: to accumulate query results before handing
//! them out as a `Vec`, and as a small de-duplicated membership list
//! (`push_unique`). The latter is linear per insert, which is fine for the
//! per-person film lists it backs but would not scale to large sets.

use crate::error::{Result, StructureError};
use std::any::{Any, type_name};
use std::ops::Deref;

/// A list with explicit doubling growth and shift-on-remove
#[derive(Debug, Clone)]
pub struct GrowableSeq<T> {
    items: Vec<T>,
    /// Logical capacity; grows 0, 1, 2, 4, 8, ...
    capacity: usize,
}

impl<T> GrowableSeq<T> {
    /// Creates an empty sequence with no backing storage
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    /// Creates an empty sequence with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an item, doubling the backing capacity first if it is full
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            let grow_by = self.capacity.max(1);
            self.items.reserve_exact(grow_by);
            self.capacity += grow_by;
        }
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current backing capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Hands the items over as a `Vec`, in insertion order
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: PartialEq> GrowableSeq<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    /// Appends `item` unless an equal item is already stored.
    ///
    /// Returns `true` if the item was added.
    pub fn push_unique(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.push(item);
        true
    }

    /// Removes the first item equal to `item`, shifting the rest left.
    ///
    /// Returns `false` if no equal item was found.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Any> GrowableSeq<T> {
    /// Copies the items out as a `Vec<U>`, checking each element's dynamic type.
    ///
    /// Boxed `dyn Any` elements are checked by their contents. A mismatch is a
    /// bug in the caller, reported as `StructureError::TypeMismatch` with the
    /// index of the first offending element.
    pub fn try_materialize<U: Any + Clone>(&self) -> Result<Vec<U>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let element: &dyn Any = item;
                let (element, found) = match element.downcast_ref::<Box<dyn Any>>() {
                    Some(boxed) => (&**boxed, "Box<dyn Any>"),
                    None => (element, type_name::<T>()),
                };
                element
                    .downcast_ref::<U>()
                    .cloned()
                    .ok_or(StructureError::TypeMismatch {
                        index,
                        expected: type_name::<U>(),
                        found,
                    })
            })
            .collect()
    }
}

impl<T> Default for GrowableSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowableSeq<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> FromIterator<T> for GrowableSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl<T> Extend<T> for GrowableSeq<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> IntoIterator for GrowableSeq<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowableSeq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
