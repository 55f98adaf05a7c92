//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use ahash::AHashMap;
use std::ops::Index;
use std::sync::Arc;

#[cfg(feature = "enable-serde")]
use serde::{de::SeqAccess, de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
#[cfg(feature = "enable-serde")]
use std::fmt::{Formatter, Result as FmtResult};

/// A reference to a string inside of a [`StringPool`].
///
/// Symbol names and opaque source snippets are stored as these instead of
/// [`String`]s, so AST nodes stay small and `Copy`.
///
/// ```
/// # use garnet::utility::*;
/// let mut pool = StringPool::new();
/// let s = pool.insert("nbr");
///
/// assert_eq!(&pool[s], "nbr");
/// ```
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Str(u32);

/// Owns a set of de-duplicated strings and maps [`Str`]s back to them.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    // strings live in `strings`, `refs` maps them back to their index so
    // inserting the same name twice yields the same `Str`
    strings: Vec<Arc<str>>,
    refs: AHashMap<Arc<str>, Str>,
}

impl StringPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "enable-serde")]
    fn with_strings(strings: &[String]) -> Self {
        let mut instance = Self::new();

        // insertion order is index order, which keeps every serialized `Str` valid
        for string in strings {
            instance.insert(string);
        }

        instance
    }

    /// Inserts a string if it isn't already present, and returns the [`Str`] for it.
    pub fn insert(&mut self, string: &str) -> Str {
        if let Some(s) = self.refs.get(string) {
            return *s;
        }

        let shared: Arc<str> = Arc::from(string);
        let index = Str(self.strings.len() as u32);

        self.strings.push(Arc::clone(&shared));
        self.refs.insert(shared, index);

        index
    }

    /// Resolves a [`Str`], returning `None` if it came from a different pool.
    pub fn get(&self, index: Str) -> Option<&str> {
        self.strings.get(index.0 as usize).map(|s| s.as_ref())
    }

    /// Gets the number of unique strings in the pool.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Checks if the pool has no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Index<Str> for StringPool {
    type Output = str;

    fn index(&self, index: Str) -> &Self::Output {
        self.strings[index.0 as usize].as_ref()
    }
}

#[cfg(feature = "enable-serde")]
impl Serialize for StringPool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // order matters, every `Str` is an index into this sequence
        serializer.collect_seq(self.strings.iter().map(|s| s.as_ref()))
    }
}

#[cfg(feature = "enable-serde")]
struct StringPoolVisitor;

#[cfg(feature = "enable-serde")]
impl<'de> Visitor<'de> for StringPoolVisitor {
    type Value = StringPool;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "a sequence of `str` values")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values: Vec<String> = Vec::with_capacity(seq.size_hint().unwrap_or(128));

        while let Some(value) = seq.next_element()? {
            values.push(value);
        }

        Ok(StringPool::with_strings(&values))
    }
}

#[cfg(feature = "enable-serde")]
impl<'de> Deserialize<'de> for StringPool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(StringPoolVisitor)
    }
}
