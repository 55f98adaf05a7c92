//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt::{Debug, Formatter, Result};

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// A type with a reserved "null" value that can stand in for `None`.
///
/// Every key made with [`dense_arena_key`](crate::dense_arena_key) implements this.
pub trait Packable: Copy {
    /// Gets the reserved value.
    fn reserved() -> Self;

    /// Checks if `self` is the reserved value.
    fn is_reserved(&self) -> bool;
}

/// An [`Option`]-like type that takes up exactly as much space as the key
/// it wraps. Used for the optional links stored inside of blocks and statements.
///
/// ```
/// # use garnet::dense_arena_key;
/// # use garnet::arena::ArenaKey;
/// # use garnet::utility::*;
/// dense_arena_key! { struct Block; }
///
/// let none = PackedOption::<Block>::none();
/// let some = PackedOption::some(Block::key_new(3));
///
/// assert_eq!(none.expand(), None);
/// assert_eq!(some.expand(), Some(Block::key_new(3)));
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct PackedOption<T: Packable>(T);

impl<T: Packable> PackedOption<T> {
    /// Creates a `None` instance.
    #[inline]
    pub fn none() -> Self {
        Self(T::reserved())
    }

    /// Creates a `Some` instance. Panics if `value` is the reserved value.
    #[inline]
    pub fn some(value: T) -> Self {
        assert!(!value.is_reserved(), "cannot pack the reserved value");

        Self(value)
    }

    /// Returns `true` if this is a `None` value.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_reserved()
    }

    /// Returns `true` if this is a `Some` value.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Expands into a normal `Option`.
    #[inline]
    pub fn expand(self) -> Option<T> {
        if self.is_none() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Replaces the value, returning the old one.
    #[inline]
    pub fn replace(&mut self, value: T) -> Option<T> {
        std::mem::replace(self, Self::some(value)).expand()
    }

    /// Takes the value out, leaving a `None` in its place.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        std::mem::replace(self, Self::none()).expand()
    }
}

impl<T: Packable> Default for PackedOption<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T: Packable> From<Option<T>> for PackedOption<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            None => Self::none(),
            Some(t) => Self::some(t),
        }
    }
}

impl<T: Packable> From<PackedOption<T>> for Option<T> {
    fn from(packed: PackedOption<T>) -> Self {
        packed.expand()
    }
}

impl<T> Debug for PackedOption<T>
where
    T: Packable + Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.expand().fmt(f)
    }
}
