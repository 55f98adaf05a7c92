//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::SecondarySet;
use crate::ast::{Ast, CommFlags, ForeachStmt, Stmt, StmtData};
use crate::cfg::{
    walk_blocks_once, BackendInfo, Block, BlockStmtVisitor, CommUnit, WalkOptions, WalkScope,
};
use crate::transforms::CommError;
use log::trace;
use std::iter::Copied;
use std::slice;

/// The vertex blocks that received communication, in the order they were
/// first found. Each block appears once.
#[derive(Clone, Debug, Default)]
pub struct TargetBlocks {
    order: Vec<Block>,
    seen: SecondarySet<Block>,
}

impl TargetBlocks {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block, returning `false` if it was already present.
    pub fn insert(&mut self, block: Block) -> bool {
        if self.seen.insert(block) {
            return false;
        }

        self.order.push(block);

        true
    }

    /// Checks if a block is present.
    pub fn contains(&self, block: Block) -> bool {
        self.seen.contains(block)
    }

    /// Gets the number of blocks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Checks if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over the blocks in insertion order.
    pub fn iter(&self) -> Copied<slice::Iter<'_, Block>> {
        self.order.iter().copied()
    }
}

impl<'a> IntoIterator for &'a TargetBlocks {
    type Item = Block;
    type IntoIter = Copied<slice::Iter<'a, Block>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Finds the communication sites in the vertex blocks of a procedure.
///
/// An all-vertex `Foreach` is an outer loop, and a neighborhood `Foreach` or
/// a random-write assignment nested inside of one is a communication site.
/// For each site, this tags the loops involved, registers the communication
/// unit, queues a receiver on the enclosing block and records the block as
/// needing a split.
#[derive(Debug, Default)]
pub struct CommunicationDetector {
    targets: TargetBlocks,
}

impl CommunicationDetector {
    /// Creates a detector that has seen nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The blocks found so far.
    pub fn targets(&self) -> &TargetBlocks {
        &self.targets
    }

    /// Takes the blocks found.
    pub fn into_targets(self) -> TargetBlocks {
        self.targets
    }

    fn outer_loop(
        &self,
        ast: &mut Ast,
        info: &BackendInfo,
        stmt: Stmt,
        scope: WalkScope,
    ) -> Result<WalkScope, CommError> {
        let fe = ast
            .foreach_mut(stmt)
            .expect("outer loop should be a `Foreach`");

        fe.mark_outer_loop()
            .map_err(|existing| CommError::ConflictingLoopRole { stmt, existing })?;

        trace!(
            "outer loop {stmt:?} in {}",
            info.block(scope.block).id()
        );

        Ok(scope.with_outer_loop(stmt))
    }

    fn inner_loop(
        &mut self,
        ast: &mut Ast,
        info: &mut BackendInfo,
        stmt: Stmt,
        scope: WalkScope,
    ) -> Result<(), CommError> {
        let block_id = info.block(scope.block).id();
        let outer = scope.outer_loop.ok_or(CommError::InnerLoopWithoutOuter {
            block: block_id,
            stmt,
        })?;

        // checked up front so a conflict leaves the tree and the blocks untouched
        ensure_can_mark(ast, outer, |fe| fe.is_outer_loop())?;
        ensure_can_mark(ast, stmt, |fe| !fe.is_outer_loop())?;

        ast.foreach_mut(stmt)
            .expect("inner loop should be a `Foreach`")
            .mark_inner_loop()
            .map_err(|existing| CommError::ConflictingLoopRole { stmt, existing })?;

        let unit = CommUnit::Nested { foreach: stmt };

        info.registry_mut().add_communication_unit_nested(stmt);
        queue_receiver(info, scope.block, unit);
        self.targets.insert(scope.block);

        mark_communication(ast, outer, CommFlags::NESTED)?;

        trace!("inner loop {stmt:?} inside {outer:?} in {block_id}");

        Ok(())
    }

    fn random_write(
        &mut self,
        ast: &mut Ast,
        info: &mut BackendInfo,
        stmt: Stmt,
        sent_block: Stmt,
        scope: WalkScope,
    ) -> Result<(), CommError> {
        let block_id = info.block(scope.block).id();
        let outer = scope.outer_loop.ok_or(CommError::RandomWriteWithoutOuter {
            block: block_id,
            stmt,
        })?;

        let field = ast
            .assign(stmt)
            .and_then(|assign| assign.lhs_field())
            .ok_or(CommError::RandomWriteWithoutField { stmt })?;

        ensure_can_mark(ast, outer, |fe| fe.is_outer_loop())?;

        // the message goes to the vertex being written to, i.e. `n` in `n.dist = ...`
        let symbol = field.driver();
        let registry = info.registry_mut();

        registry.add_communication_unit_random_write(sent_block, symbol);
        registry.add_random_write_sent(sent_block, symbol, stmt);
        queue_receiver(info, scope.block, CommUnit::RandomWrite { sent_block, symbol });
        self.targets.insert(scope.block);

        mark_communication(ast, outer, CommFlags::RANDOM_WRITE)?;

        trace!("random write {stmt:?} through {sent_block:?} inside {outer:?} in {block_id}");

        Ok(())
    }
}

enum Site {
    OuterLoop,
    InnerLoop,
    RandomWrite(Stmt),
    Nothing,
}

impl BlockStmtVisitor for CommunicationDetector {
    type Error = CommError;

    fn accepts_block(&mut self, info: &BackendInfo, block: Block) -> bool {
        info.block(block).is_vertex()
    }

    fn visit_stmt(
        &mut self,
        ast: &mut Ast,
        info: &mut BackendInfo,
        stmt: Stmt,
        scope: WalkScope,
    ) -> Result<WalkScope, CommError> {
        if scope.under_receiver {
            return Err(CommError::ReceiverTraversal {
                block: info.block(scope.block).id(),
                stmt,
            });
        }

        let site = match ast.stmt(stmt) {
            StmtData::Foreach(fe) if fe.iter_kind().is_all_graph() => Site::OuterLoop,
            StmtData::Foreach(_) => Site::InnerLoop,
            StmtData::Assign(assign) => match assign.random_write_sent_block() {
                Some(sent_block) => Site::RandomWrite(sent_block),
                None => Site::Nothing,
            },
            _ => Site::Nothing,
        };

        match site {
            Site::OuterLoop => return self.outer_loop(ast, info, stmt, scope),
            Site::InnerLoop => self.inner_loop(ast, info, stmt, scope)?,
            Site::RandomWrite(sent_block) => self.random_write(ast, info, stmt, sent_block, scope)?,
            Site::Nothing => {}
        }

        Ok(scope)
    }
}

/// Walks every vertex block reachable from the entry block and detects its
/// communication, see [`CommunicationDetector`].
///
/// Returns the vertex blocks that need to be split, in the order they were found.
/// The first broken invariant aborts detection.
pub fn find_communication(ast: &mut Ast, info: &mut BackendInfo) -> Result<TargetBlocks, CommError> {
    let mut detector = CommunicationDetector::new();

    walk_blocks_once(ast, info, &mut detector, WalkOptions::sents_only())?;

    Ok(detector.into_targets())
}

fn ensure_can_mark(
    ast: &Ast,
    stmt: Stmt,
    allowed: impl FnOnce(&ForeachStmt) -> bool,
) -> Result<(), CommError> {
    let fe = ast.foreach(stmt).expect("loop should be a `Foreach`");

    if allowed(fe) {
        Ok(())
    } else {
        Err(CommError::ConflictingLoopRole {
            stmt,
            existing: fe.role(),
        })
    }
}

fn mark_communication(ast: &mut Ast, outer: Stmt, flags: CommFlags) -> Result<(), CommError> {
    ast.foreach_mut(outer)
        .expect("outer loop should be a `Foreach`")
        .mark_communication(flags)
        .map_err(|existing| CommError::ConflictingLoopRole {
            stmt: outer,
            existing,
        })
}

fn queue_receiver(info: &mut BackendInfo, block: Block, unit: CommUnit) {
    let bb = info.block_mut(block);

    // the same site reached twice still only needs to be received once
    if !bb.receivers().contains(&unit) {
        bb.add_receiver(unit);
    }
}
