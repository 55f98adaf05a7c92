//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::Symbol;
use crate::dense_arena_key;
use crate::utility::{PackedOption, Str};
use bitflags::bitflags;
use smallvec::{smallvec, SmallVec};

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

dense_arena_key! {
    /// References a single statement of a procedure's AST.
    ///
    /// Must be resolved with the [`Ast`](crate::ast::Ast) it came from.
    pub struct Stmt;
}

/// What a neighbor-iteration loop ranges over.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum IterKind {
    /// Every node of the graph, `G.Nodes`.
    AllNodes,
    /// Every edge of the graph, `G.Edges`.
    AllEdges,
    /// Outgoing neighbors of a node, `n.Nbrs`.
    OutNbrs,
    /// Incoming neighbors of a node, `n.InNbrs`.
    InNbrs,
    /// BFS parents of a node, `n.UpNbrs`.
    UpNbrs,
    /// BFS children of a node, `n.DownNbrs`.
    DownNbrs,
}

impl IterKind {
    /// Checks if the loop ranges over the whole graph instead of over a
    /// neighborhood. These loops are the per-vertex parallel loops.
    #[inline]
    pub fn is_all_graph(self) -> bool {
        matches!(self, IterKind::AllNodes | IterKind::AllEdges)
    }
}

bitflags! {
    /// The kinds of communication found nested inside an outer loop.
    #[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
    #[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
    pub struct CommFlags: u8 {
        /// An inner neighbor-iteration loop is nested inside the outer loop.
        const NESTED = 1;
        /// A random-write assignment is nested inside the outer loop.
        const RANDOM_WRITE = 2;
    }
}

/// The communication role of a neighbor-iteration loop.
///
/// A loop is classified at most once. The two classified roles are mutually
/// exclusive, which is why this is an enum and not a pair of flags.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum LoopRole {
    /// Not looked at by the communication analysis (yet).
    #[default]
    Unclassified,
    /// A loop over the whole graph, along with the communication nested inside of it.
    Outer(CommFlags),
    /// A loop over a neighborhood nested inside an outer loop, i.e. a communication site.
    Inner,
}

/// A `Foreach` over all vertices or over a neighborhood.
///
/// ```other
/// Foreach (n : G.Nodes) {        // outer
///     Foreach (w : n.Nbrs) {     // inner
///         w.foo += n.bar;
///     }
/// }
/// ```
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct ForeachStmt {
    iterator: Symbol,
    source: Symbol,
    iter: IterKind,
    body: Stmt,
    role: LoopRole,
}

impl ForeachStmt {
    pub(crate) fn new(iterator: Symbol, source: Symbol, iter: IterKind, body: Stmt) -> Self {
        Self {
            iterator,
            source,
            iter,
            body,
            role: LoopRole::Unclassified,
        }
    }

    /// The loop variable.
    #[inline]
    pub fn iterator(&self) -> Symbol {
        self.iterator
    }

    /// The graph or node being iterated over.
    #[inline]
    pub fn source(&self) -> Symbol {
        self.source
    }

    /// What the loop ranges over.
    #[inline]
    pub fn iter_kind(&self) -> IterKind {
        self.iter
    }

    /// The loop body.
    #[inline]
    pub fn body(&self) -> Stmt {
        self.body
    }

    /// The communication role assigned by the communication analysis.
    #[inline]
    pub fn role(&self) -> LoopRole {
        self.role
    }

    /// Checks if the loop was tagged as an outer loop.
    #[inline]
    pub fn is_outer_loop(&self) -> bool {
        matches!(self.role, LoopRole::Outer(_))
    }

    /// Checks if the loop was tagged as an inner (communicating) loop.
    #[inline]
    pub fn is_inner_loop(&self) -> bool {
        self.role == LoopRole::Inner
    }

    /// Checks if an inner loop was found nested inside of this outer loop.
    #[inline]
    pub fn has_communication(&self) -> bool {
        self.comm_flags().contains(CommFlags::NESTED)
    }

    /// Checks if a random-write assignment was found nested inside of this outer loop.
    #[inline]
    pub fn has_random_communication(&self) -> bool {
        self.comm_flags().contains(CommFlags::RANDOM_WRITE)
    }

    /// The communication nested inside this loop. Empty for anything but an outer loop.
    #[inline]
    pub fn comm_flags(&self) -> CommFlags {
        match self.role {
            LoopRole::Outer(flags) => flags,
            _ => CommFlags::empty(),
        }
    }

    /// Tags the loop as an outer loop. Tagging an outer loop twice keeps its flags.
    ///
    /// Fails with the current role if the loop was already tagged as an inner loop.
    pub fn mark_outer_loop(&mut self) -> Result<(), LoopRole> {
        match self.role {
            LoopRole::Unclassified => {
                self.role = LoopRole::Outer(CommFlags::empty());

                Ok(())
            }
            LoopRole::Outer(_) => Ok(()),
            LoopRole::Inner => Err(self.role),
        }
    }

    /// Tags the loop as an inner loop.
    ///
    /// Fails with the current role if the loop was already tagged as an outer loop.
    pub fn mark_inner_loop(&mut self) -> Result<(), LoopRole> {
        match self.role {
            LoopRole::Unclassified | LoopRole::Inner => {
                self.role = LoopRole::Inner;

                Ok(())
            }
            LoopRole::Outer(_) => Err(self.role),
        }
    }

    /// Records communication nested inside of this outer loop.
    ///
    /// Fails with the current role if the loop is not an outer loop.
    pub fn mark_communication(&mut self, flags: CommFlags) -> Result<(), LoopRole> {
        match &mut self.role {
            LoopRole::Outer(existing) => {
                existing.insert(flags);

                Ok(())
            }
            _ => Err(self.role),
        }
    }
}

/// A property access through a node or edge, `driver.property`.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct FieldAccess {
    driver: Symbol,
    property: Symbol,
}

impl FieldAccess {
    /// Creates a field access.
    pub fn new(driver: Symbol, property: Symbol) -> Self {
        Self { driver, property }
    }

    /// The node or edge being accessed, `n` in `n.dist`. For a random write
    /// this is the remote vertex being written to.
    #[inline]
    pub fn driver(&self) -> Symbol {
        self.driver
    }

    /// The property being accessed, `dist` in `n.dist`.
    #[inline]
    pub fn property(&self) -> Symbol {
        self.property
    }
}

/// The left-hand side of an assignment.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum AssignTarget {
    /// A local or global scalar.
    Scalar(Symbol),
    /// A node or edge property.
    Field(FieldAccess),
}

/// An assignment statement, `lhs = rhs`.
///
/// The right-hand side is kept opaque, nothing in the backend's block
/// structuring looks at it.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct AssignStmt {
    target: AssignTarget,
    rhs: Str,
    random_write: PackedOption<Stmt>,
}

impl AssignStmt {
    pub(crate) fn new(target: AssignTarget, rhs: Str) -> Self {
        Self {
            target,
            rhs,
            random_write: PackedOption::none(),
        }
    }

    /// The left-hand side.
    #[inline]
    pub fn target(&self) -> AssignTarget {
        self.target
    }

    /// The left-hand side if it is a field access.
    #[inline]
    pub fn lhs_field(&self) -> Option<FieldAccess> {
        match self.target {
            AssignTarget::Field(field) => Some(field),
            AssignTarget::Scalar(_) => None,
        }
    }

    /// The (opaque) right-hand side.
    #[inline]
    pub fn rhs(&self) -> Str {
        self.rhs
    }

    /// If an earlier analysis decided this assignment writes into another
    /// vertex's state, this is the sequencing block that has to host the send.
    #[inline]
    pub fn random_write_sent_block(&self) -> Option<Stmt> {
        self.random_write.expand()
    }

    /// Marks the assignment as a random write whose send is hosted by `sent_block`.
    pub fn set_random_write_sent_block(&mut self, sent_block: Stmt) {
        self.random_write = PackedOption::some(sent_block);
    }
}

/// A `{ ... }` sequence of statements.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct SentBlock {
    stmts: SmallVec<[Stmt; 4]>,
}

impl SentBlock {
    pub(crate) fn new(stmts: &[Stmt]) -> Self {
        Self {
            stmts: SmallVec::from_slice(stmts),
        }
    }

    /// The statements in program order.
    #[inline]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }
}

/// An `If` statement, with an opaque condition.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct IfStmt {
    cond: Str,
    then: Stmt,
    otherwise: PackedOption<Stmt>,
}

impl IfStmt {
    pub(crate) fn new(cond: Str, then: Stmt, otherwise: Option<Stmt>) -> Self {
        Self {
            cond,
            then,
            otherwise: otherwise.into(),
        }
    }

    /// The condition.
    #[inline]
    pub fn cond(&self) -> Str {
        self.cond
    }

    /// The statement run when the condition holds.
    #[inline]
    pub fn then(&self) -> Stmt {
        self.then
    }

    /// The `Else` statement, if there is one.
    #[inline]
    pub fn otherwise(&self) -> Option<Stmt> {
        self.otherwise.expand()
    }
}

/// A `While` loop, with an opaque condition.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct WhileStmt {
    cond: Str,
    body: Stmt,
}

impl WhileStmt {
    pub(crate) fn new(cond: Str, body: Stmt) -> Self {
        Self { cond, body }
    }

    /// The condition.
    #[inline]
    pub fn cond(&self) -> Str {
        self.cond
    }

    /// The loop body.
    #[inline]
    pub fn body(&self) -> Stmt {
        self.body
    }
}

/// The data for a single statement.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum StmtData {
    /// `{ ... }`
    Block(SentBlock),
    /// `Foreach (it : source.Iter) body`
    Foreach(ForeachStmt),
    /// `lhs = rhs`
    Assign(AssignStmt),
    /// `If (cond) then Else otherwise`
    If(IfStmt),
    /// `While (cond) body`
    While(WhileStmt),
    /// Any other statement (calls, returns, reductions the backend has already
    /// lowered, ...). Only carries its source text.
    Opaque(Str),
}

impl StmtData {
    /// The statements directly nested inside of this one, in program order.
    pub fn children(&self) -> SmallVec<[Stmt; 4]> {
        match self {
            StmtData::Block(block) => SmallVec::from_slice(block.stmts()),
            StmtData::Foreach(fe) => smallvec![fe.body()],
            StmtData::If(i) => match i.otherwise() {
                Some(otherwise) => smallvec![i.then(), otherwise],
                None => smallvec![i.then()],
            },
            StmtData::While(w) => smallvec![w.body()],
            StmtData::Assign(_) | StmtData::Opaque(_) => SmallVec::new(),
        }
    }

    /// Short name of the statement kind, used when printing.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StmtData::Block(_) => "block",
            StmtData::Foreach(_) => "foreach",
            StmtData::Assign(_) => "assign",
            StmtData::If(_) => "if",
            StmtData::While(_) => "while",
            StmtData::Opaque(_) => "opaque",
        }
    }
}
