//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The statement tree of a procedure, as far as the backend needs to see it.
//!
//! Statements live in an arena owned by [`Ast`] and refer to each other
//! through [`Stmt`] keys. The only statements with real structure are the ones
//! the backend's block structuring cares about: sequencing blocks, neighbor
//! loops, assignments and the control-flow statements that nest them.

mod stmt;
mod symbols;

pub use stmt::*;
pub use symbols::*;

use crate::arena::ArenaMap;
use crate::utility::{PackedOption, Str};
use smallvec::SmallVec;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

/// Owns every statement and symbol of a single procedure.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Ast {
    stmts: ArenaMap<Stmt, StmtData>,
    symbols: ArenaMap<Symbol, SymbolData>,
    body: PackedOption<Stmt>,
}

impl Ast {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a statement. It is not reachable from the body until some
    /// other statement (or [`Self::set_body`]) refers to it.
    pub fn create_stmt(&mut self, data: StmtData) -> Stmt {
        self.stmts.insert(data)
    }

    /// Allocates a new symbol.
    pub fn create_symbol(&mut self, name: Str, kind: SymbolKind) -> Symbol {
        self.symbols.insert(SymbolData::new(name, kind))
    }

    /// Resolves a statement.
    #[inline]
    pub fn stmt(&self, stmt: Stmt) -> &StmtData {
        &self.stmts[stmt]
    }

    /// Resolves a statement.
    #[inline]
    pub fn stmt_mut(&mut self, stmt: Stmt) -> &mut StmtData {
        &mut self.stmts[stmt]
    }

    /// Resolves a symbol.
    #[inline]
    pub fn symbol(&self, sym: Symbol) -> &SymbolData {
        &self.symbols[sym]
    }

    /// Resolves `stmt` if it is a `Foreach`.
    pub fn foreach(&self, stmt: Stmt) -> Option<&ForeachStmt> {
        match self.stmt(stmt) {
            StmtData::Foreach(fe) => Some(fe),
            _ => None,
        }
    }

    /// Resolves `stmt` if it is a `Foreach`.
    pub fn foreach_mut(&mut self, stmt: Stmt) -> Option<&mut ForeachStmt> {
        match self.stmt_mut(stmt) {
            StmtData::Foreach(fe) => Some(fe),
            _ => None,
        }
    }

    /// Resolves `stmt` if it is an assignment.
    pub fn assign(&self, stmt: Stmt) -> Option<&AssignStmt> {
        match self.stmt(stmt) {
            StmtData::Assign(assign) => Some(assign),
            _ => None,
        }
    }

    /// Resolves `stmt` if it is an assignment.
    pub fn assign_mut(&mut self, stmt: Stmt) -> Option<&mut AssignStmt> {
        match self.stmt_mut(stmt) {
            StmtData::Assign(assign) => Some(assign),
            _ => None,
        }
    }

    /// The statements directly nested inside `stmt`.
    pub fn children(&self, stmt: Stmt) -> SmallVec<[Stmt; 4]> {
        self.stmt(stmt).children()
    }

    /// The top-level statement of the procedure, if one was set.
    #[inline]
    pub fn body(&self) -> Option<Stmt> {
        self.body.expand()
    }

    /// Sets the top-level statement of the procedure.
    pub fn set_body(&mut self, stmt: Stmt) {
        self.body = PackedOption::some(stmt);
    }

    /// Every statement ever allocated, in allocation order.
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        self.stmts.keys()
    }

    /// Gets the number of statements allocated.
    pub fn num_stmts(&self) -> usize {
        self.stmts.len()
    }
}
