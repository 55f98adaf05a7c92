//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! A small typed arena module.
//!
//! The arenas here never delete, which is exactly what the backend needs: a
//! basic block or a statement that has been allocated lives until code generation
//! is over, and every reference to it is just a key into the arena. Splicing
//! blocks into a graph is then a matter of editing key lists, and nothing
//! can ever dangle.
//!
//! ```
//! # use garnet::dense_arena_key;
//! # use garnet::arena::*;
//! dense_arena_key! {
//!     pub struct Node;
//! }
//!
//! struct NodeData {
//!     successors: Vec<Node>,
//! }
//!
//! let mut arena = ArenaMap::new();
//!
//! let exit: Node = arena.insert(NodeData { successors: vec![] });
//! let entry = arena.insert(NodeData { successors: vec![exit] });
//!
//! assert_eq!(arena[entry].successors, [exit]);
//! ```

mod iter;
mod key;
mod map;
mod secondary_set;

pub use iter::*;
pub use key::ArenaKey;
pub use map::ArenaMap;
pub use secondary_set::SecondarySet;

use std::fmt;
use std::fmt::{Debug, Formatter};

pub(in crate::arena) fn debug_write_map<'a, K, V>(
    f: &mut Formatter<'_>,
    name: &'static str,
    it: impl Iterator<Item = (K, &'a V)>,
) -> fmt::Result
where
    K: ArenaKey,
    V: Debug + 'a,
{
    write!(f, "{name} ")?;

    f.debug_map().entries(it).finish()
}
