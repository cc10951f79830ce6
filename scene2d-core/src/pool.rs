// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! A generational arena.
//!
//! Pool allows to create as many objects as you want in a contiguous memory block. Objects are
//! addressed by [`Handle`]s, which store the index of a record and the generation of the record
//! at the moment the object was spawned. Once the object is freed the record's generation is bumped,
//! so stale handles can be detected and never alias a newer object at the same index.

use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Index, IndexMut},
};

const INVALID_GENERATION: u32 = 0;

/// Handle is a non-owning reference to an object in a pool.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    type_marker: PhantomData<T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::NONE
    }
}

impl<T> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Idx: {}; Gen: {}]", self.index, self.generation)
    }
}

impl<T> Handle<T> {
    /// A handle that never points to an object.
    pub const NONE: Handle<T> = Handle {
        index: 0,
        generation: INVALID_GENERATION,
        type_marker: PhantomData,
    };

    /// Creates a handle from raw parts.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            type_marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.generation == INVALID_GENERATION
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a single integer, suitable for opaque user data slots of
    /// external libraries.
    #[inline]
    pub fn encode_to_u128(self) -> u128 {
        (self.index as u128) | ((self.generation as u128) << 32)
    }

    /// Restores a handle packed by [`Self::encode_to_u128`].
    #[inline]
    pub fn decode_from_u128(num: u128) -> Self {
        Self::new(num as u32, (num >> 32) as u32)
    }
}

struct PoolRecord<T> {
    // Zero generation is reserved for none handles.
    generation: u32,
    payload: Option<T>,
}

/// See module docs.
pub struct Pool<T> {
    records: Vec<PoolRecord<T>>,
    free_stack: Vec<u32>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Pool<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool {{ capacity: {}, alive: {} }}",
            self.records.len(),
            self.alive_count()
        )
    }
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    #[inline]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            free_stack: Vec::new(),
        }
    }

    /// Moves the object into the pool and returns a handle to it. Vacant records are reused,
    /// with a bumped generation.
    #[must_use]
    pub fn spawn(&mut self, payload: T) -> Handle<T> {
        if let Some(index) = self.free_stack.pop() {
            let record = &mut self.records[index as usize];
            record.generation += 1;
            record.payload = Some(payload);
            Handle::new(index, record.generation)
        } else {
            let index = self.records.len() as u32;
            self.records.push(PoolRecord {
                generation: 1,
                payload: Some(payload),
            });
            Handle::new(index, 1)
        }
    }

    /// Takes the object out of the pool and makes its record vacant. Returns `None` if the
    /// handle is stale or out of bounds.
    pub fn free(&mut self, handle: Handle<T>) -> Option<T> {
        let record = self.records.get_mut(handle.index as usize)?;
        if record.generation != handle.generation {
            return None;
        }
        let payload = record.payload.take()?;
        self.free_stack.push(handle.index);
        Some(payload)
    }

    #[inline]
    pub fn try_borrow(&self, handle: Handle<T>) -> Option<&T> {
        self.records
            .get(handle.index as usize)
            .filter(|r| r.generation == handle.generation)
            .and_then(|r| r.payload.as_ref())
    }

    #[inline]
    pub fn try_borrow_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.records
            .get_mut(handle.index as usize)
            .filter(|r| r.generation == handle.generation)
            .and_then(|r| r.payload.as_mut())
    }

    #[inline]
    pub fn is_valid_handle(&self, handle: Handle<T>) -> bool {
        self.try_borrow(handle).is_some()
    }

    /// Amount of objects currently stored in the pool.
    pub fn alive_count(&self) -> usize {
        self.records.iter().filter(|r| r.payload.is_some()).count()
    }

    /// Iterates over the objects in linear (storage) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter().filter_map(|r| r.payload.as_ref())
    }

    /// Iterates over `(handle, object)` pairs in linear (storage) order.
    pub fn pair_iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.records.iter().enumerate().filter_map(|(i, r)| {
            r.payload
                .as_ref()
                .map(|p| (Handle::new(i as u32, r.generation), p))
        })
    }
}

impl<T> Index<Handle<T>> for Pool<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: Handle<T>) -> &Self::Output {
        match self.try_borrow(index) {
            Some(payload) => payload,
            None => panic!("Attempt to borrow an object using invalid handle {index:?}!"),
        }
    }
}

impl<T> IndexMut<Handle<T>> for Pool<T> {
    #[track_caller]
    fn index_mut(&mut self, index: Handle<T>) -> &mut Self::Output {
        match self.try_borrow_mut(index) {
            Some(payload) => payload,
            None => panic!("Attempt to borrow an object using invalid handle {index:?}!"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Handle, Pool};

    #[test]
    fn stale_handle_does_not_alias_new_object() {
        let mut pool = Pool::new();
        let a = pool.spawn(1);
        assert_eq!(pool.free(a), Some(1));
        let b = pool.spawn(2);

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(pool.try_borrow(a).is_none());
        assert_eq!(pool[b], 2);
        assert_eq!(pool.free(a), None);
    }

    #[test]
    fn handle_survives_u128_packing() {
        let mut pool = Pool::new();
        let _ = pool.spawn("a");
        let b = pool.spawn("b");
        let packed = b.encode_to_u128();
        assert_eq!(Handle::<&str>::decode_from_u128(packed), b);
        assert!(Handle::<&str>::decode_from_u128(0).is_none());
    }

    #[test]
    fn pair_iter_skips_vacant_records() {
        let mut pool = Pool::new();
        let a = pool.spawn(10);
        let b = pool.spawn(20);
        let c = pool.spawn(30);
        pool.free(b);

        let pairs = pool.pair_iter().map(|(h, v)| (h, *v)).collect::<Vec<_>>();
        assert_eq!(pairs, vec![(a, 10), (c, 30)]);
        assert_eq!(pool.alive_count(), 2);
    }
}
