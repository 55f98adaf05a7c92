//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::dense_arena_key;
use crate::utility::Str;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

dense_arena_key! {
    /// References a symbol (a variable, a graph or a property) in a
    /// procedure's symbol table.
    pub struct Symbol;
}

/// What a given symbol names.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum SymbolKind {
    /// A graph, `G`
    Graph,
    /// A node iterator or node variable
    Node,
    /// An edge iterator or edge variable
    Edge,
    /// A per-node property, `N_P<Int>`
    NodeProperty,
    /// A per-edge property, `E_P<Int>`
    EdgeProperty,
    /// Any scalar value
    Scalar,
}

/// The data behind a [`Symbol`].
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct SymbolData {
    name: Str,
    kind: SymbolKind,
}

impl SymbolData {
    pub(crate) fn new(name: Str, kind: SymbolKind) -> Self {
        Self { name, kind }
    }

    /// The name of the symbol, resolved through the program's string pool.
    #[inline]
    pub fn name(&self) -> Str {
        self.name
    }

    /// What the symbol names.
    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }
}
