//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena;
use crate::arena::{
    iter::{Iter, IterMut, Keys},
    ArenaKey,
};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::{fmt, slice};

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// A primary mapping of `K -> V` that only ever grows.
///
/// This is a typed wrapper around `Vec<V>`: keys are handed out by [`Self::insert`]
/// in increasing order and stay valid for the lifetime of the map. Indexing with
/// a key from a different map of the same key type is a bug that may or may not
/// be caught, so keep keys next to the map that issued them.
///
/// ```
/// # use garnet::dense_arena_key;
/// # use garnet::arena::ArenaMap;
/// dense_arena_key! {
///     struct Block;
/// }
///
/// let mut blocks = ArenaMap::new();
/// let bb: Block = blocks.insert("entry");
///
/// assert_eq!(blocks[bb], "entry");
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct ArenaMap<K: ArenaKey, V> {
    slots: Vec<V>,
    _unused: PhantomData<fn() -> K>,
}

impl<K: ArenaKey, V> ArenaMap<K, V> {
    /// Creates a new, empty arena.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::default(),
            _unused: PhantomData,
        }
    }

    /// Creates an empty arena with room for `capacity` values.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            _unused: PhantomData,
        }
    }

    /// Checks if a given key has been returned from [`Self::insert`] at some point.
    ///
    /// ```
    /// # use garnet::arena_key;
    /// # use garnet::arena::*;
    /// # arena_key! { struct Key; }
    /// let mut map = ArenaMap::default();
    /// let k1: Key = map.insert(true);
    /// let k2 = map.next_key();
    /// assert!(map.contains(k1));
    /// assert!(!map.contains(k2));
    /// ```
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        key.key_index() < self.slots.len()
    }

    /// Gets the value associated with a key, or `None` if the key was never issued.
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.key_index())
    }

    /// Gets the value associated with a key, or `None` if the key was never issued.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots.get_mut(key.key_index())
    }

    /// Gets mutable references to two distinct values at once.
    ///
    /// This is what lets an edge be added to both of its endpoints in one step.
    /// Panics if `a == b` or if either key is invalid.
    ///
    /// ```
    /// # use garnet::arena_key;
    /// # use garnet::arena::*;
    /// # arena_key! { struct Key; }
    /// let mut map = ArenaMap::default();
    /// let k1: Key = map.insert(1);
    /// let k2 = map.insert(2);
    /// let (a, b) = map.get_pair_mut(k1, k2);
    /// std::mem::swap(a, b);
    /// assert_eq!(map[k1], 2);
    /// ```
    pub fn get_pair_mut(&mut self, a: K, b: K) -> (&mut V, &mut V) {
        let (i, j) = (a.key_index(), b.key_index());

        assert_ne!(i, j, "tried to mutably borrow the same `ArenaMap` slot twice");

        if i < j {
            let (head, tail) = self.slots.split_at_mut(j);

            (&mut head[i], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(i);

            (&mut tail[0], &mut head[j])
        }
    }

    /// Adds a value into the arena and returns the key that refers to it.
    #[inline]
    pub fn insert(&mut self, value: V) -> K {
        self.slots.push(value);

        K::key_new(self.slots.len() - 1)
    }

    /// Gets the key that the next [`Self::insert`] call will return. The key
    /// is not valid until that call happens.
    ///
    /// ```
    /// # use garnet::arena_key;
    /// # use garnet::arena::*;
    /// # arena_key! { struct Key; }
    /// let mut map = ArenaMap::default();
    /// let k1: Key = map.next_key();
    /// let k2 = map.insert(0);
    /// assert_eq!(k1, k2);
    /// ```
    #[inline]
    pub fn next_key(&self) -> K {
        K::key_new(self.slots.len())
    }

    /// Gets the number of values in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if the arena is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the valid keys in increasing order.
    pub fn keys(&self) -> Keys<K> {
        Keys::with_len(self.slots.len())
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> slice::Iter<'_, V> {
        self.slots.iter()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + DoubleEndedIterator + ExactSizeIterator {
        Iter::with_inner(self.slots.iter())
    }

    /// Iterates over `(key, value)` pairs in key order, mutably.
    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (K, &mut V)> + DoubleEndedIterator + ExactSizeIterator {
        IterMut::with_inner(self.slots.iter_mut())
    }
}

impl<K: ArenaKey, V> FromIterator<V> for ArenaMap<K, V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self {
            slots: Vec::from_iter(iter),
            _unused: PhantomData,
        }
    }
}

impl<K: ArenaKey, V> Default for ArenaMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for ArenaMap<K, V>
where
    K: ArenaKey,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.values().eq(other.values())
    }
}

impl<K, V> Eq for ArenaMap<K, V>
where
    K: ArenaKey,
    V: Eq,
{
}

impl<K, V> Debug for ArenaMap<K, V>
where
    K: ArenaKey,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        arena::debug_write_map(f, "ArenaMap", self.iter())
    }
}

impl<K: ArenaKey, V> Index<K> for ArenaMap<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        self.slots
            .get(key.key_index())
            .expect("tried to access invalid key on `ArenaMap`")
    }
}

impl<K: ArenaKey, V> IndexMut<K> for ArenaMap<K, V> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.slots
            .get_mut(key.key_index())
            .expect("tried to access invalid key on `ArenaMap`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_arena_key;

    dense_arena_key! { struct E; }

    #[test]
    #[should_panic(expected = "tried to access invalid key on `ArenaMap`")]
    fn out_of_bounds() {
        // hide the stack trace, assuming this test panics as it's supposed to.
        std::panic::set_hook(Box::new(|_| {}));

        let mut m1 = ArenaMap::<E, i32>::new();
        let m2 = ArenaMap::<E, i32>::new();

        let k = m1.insert(6);

        let _ = m2[k];
    }

    #[test]
    fn insert_and_keys() {
        let mut m = ArenaMap::new();
        let k0: E = m.insert(12);
        let k1 = m.insert(33);

        assert_eq!(m[k0], 12);
        assert_eq!(m[k1], 33);

        let v: Vec<E> = m.keys().collect();
        assert_eq!(v, [k0, k1]);
    }

    #[test]
    fn get_pair_mut_both_orders() {
        let mut m = ArenaMap::new();
        let k0: E = m.insert(vec![0]);
        let k1 = m.insert(vec![1]);

        {
            let (a, b) = m.get_pair_mut(k0, k1);
            a.push(10);
            b.push(11);
        }

        {
            let (b, a) = m.get_pair_mut(k1, k0);
            a.push(20);
            b.push(21);
        }

        assert_eq!(m[k0], [0, 10, 20]);
        assert_eq!(m[k1], [1, 11, 21]);
    }

    #[test]
    #[should_panic(expected = "tried to mutably borrow the same `ArenaMap` slot twice")]
    fn get_pair_mut_same_key() {
        // hide the stack trace, assuming this test panics as it's supposed to.
        std::panic::set_hook(Box::new(|_| {}));

        let mut m = ArenaMap::new();
        let k0: E = m.insert(0);

        let _ = m.get_pair_mut(k0, k0);
    }

    #[test]
    fn iter_rev() {
        let mut m: ArenaMap<E, usize> = ArenaMap::new();

        m.insert(12);
        m.insert(33);

        let pairs: Vec<(usize, usize)> = m.iter().rev().map(|(k, v)| (k.key_index(), *v)).collect();

        assert_eq!(pairs, [(1, 33), (0, 12)]);
    }

    #[test]
    fn debug() {
        let mut m = ArenaMap::<E, i32>::new();

        let _ = m.insert(15);
        let _ = m.insert(20);

        assert_eq!(format!("{m:?}"), "ArenaMap {E(0): 15, E(1): 20}");
    }
}
