//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::{ArenaKey, ArenaMap};
use smallbitvec::{sbvec, SmallBitVec};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A dense set of keys from some primary [`ArenaMap`], one bit per key.
///
/// This is the visited-set of the block walkers: block keys are small and
/// contiguous, so a bitset beats hashing them.
///
/// ```
/// # use garnet::arena_key;
/// # use garnet::arena::*;
/// arena_key! { struct Key; }
/// let mut map = ArenaMap::default();
/// let k1: Key = map.insert(15);
/// let k2 = map.insert(20);
/// let mut seen = SecondarySet::with_primary(&map);
///
/// assert!(!seen.insert(k2));
/// assert!(seen.contains(k2));
/// assert!(!seen.contains(k1));
/// ```
#[derive(Clone)]
pub struct SecondarySet<K: ArenaKey> {
    bits: SmallBitVec,
    cardinality: usize,
    _unused: PhantomData<fn() -> K>,
}

impl<K: ArenaKey> SecondarySet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            bits: SmallBitVec::default(),
            cardinality: 0,
            _unused: PhantomData,
        }
    }

    /// Creates an empty set sized for the keys of `primary`.
    pub fn with_primary<T>(primary: &ArenaMap<K, T>) -> Self {
        Self {
            bits: sbvec![false; primary.len()],
            cardinality: 0,
            _unused: PhantomData,
        }
    }

    /// Returns the number of keys in the set.
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Returns if the set is completely empty.
    pub fn is_empty(&self) -> bool {
        self.cardinality == 0
    }

    /// Returns whether or not a key is present in the set.
    pub fn contains(&self, key: K) -> bool {
        // keys past the end were never inserted
        self.bits.get(key.key_index()).unwrap_or(false)
    }

    /// Inserts a key into the set, returns whether the key was in the set
    /// prior to insertion.
    pub fn insert(&mut self, key: K) -> bool {
        let idx = key.key_index();

        if idx >= self.bits.len() {
            self.bits.resize(idx + 1, false);
        }

        let old = self.bits[idx];

        self.cardinality += !old as usize;
        self.bits.set(idx, true);

        old
    }

    /// Removes a key from the set, returns whether the key was present.
    pub fn remove(&mut self, key: K) -> bool {
        let idx = key.key_index();

        if idx >= self.bits.len() {
            return false;
        }

        let old = self.bits[idx];

        self.cardinality -= old as usize;
        self.bits.set(idx, false);

        old
    }

    /// Iterates over the keys in the set in increasing order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, present)| *present)
            .map(|(i, _)| K::key_new(i))
    }
}

impl<K: ArenaKey> Default for SecondarySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey> Debug for SecondarySet<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SecondarySet ")?;

        f.debug_list().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_arena_key;

    dense_arena_key! { struct E; }

    #[test]
    fn insert_past_end_grows() {
        let mut set = SecondarySet::<E>::new();

        assert!(!set.insert(E::key_new(9)));
        assert!(set.insert(E::key_new(9)));
        assert!(!set.contains(E::key_new(8)));
        assert!(!set.contains(E::key_new(100)));
        assert_eq!(set.cardinality(), 1);
    }

    #[test]
    fn remove_and_keys() {
        let mut set = SecondarySet::<E>::new();

        set.insert(E::key_new(0));
        set.insert(E::key_new(3));
        set.insert(E::key_new(5));

        assert!(set.remove(E::key_new(3)));
        assert!(!set.remove(E::key_new(3)));
        assert!(!set.remove(E::key_new(42)));

        let keys: Vec<E> = set.keys().collect();

        assert_eq!(keys, [E::key_new(0), E::key_new(5)]);
        assert_eq!(format!("{set:?}"), "SecondarySet [E(0), E(5)]");
    }
}
