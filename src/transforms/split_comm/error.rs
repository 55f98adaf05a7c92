//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::{LoopRole, Stmt};
use crate::cfg::{BlockId, CfgError};
use thiserror::Error;

/// Broken invariants found while detecting or splitting communication.
///
/// Every one of these means an earlier stage of the compiler produced
/// something the backend cannot handle, none are user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommError {
    /// A statement was reached while walking the body of a receiver.
    #[error("statement {stmt:?} in {block} was reached through a receiver during detection")]
    ReceiverTraversal {
        /// The block being walked.
        block: BlockId,
        /// The statement that was reached.
        stmt: Stmt,
    },
    /// A neighborhood loop with no enclosing all-vertex loop.
    #[error("inner loop {stmt:?} in {block} is not nested inside an outer loop")]
    InnerLoopWithoutOuter {
        /// The block being walked.
        block: BlockId,
        /// The inner loop.
        stmt: Stmt,
    },
    /// A random-write assignment with no enclosing all-vertex loop.
    #[error("random write {stmt:?} in {block} is not nested inside an outer loop")]
    RandomWriteWithoutOuter {
        /// The block being walked.
        block: BlockId,
        /// The assignment.
        stmt: Stmt,
    },
    /// A random-write assignment that doesn't write through a property access.
    #[error("random write {stmt:?} does not assign to a property")]
    RandomWriteWithoutField {
        /// The assignment.
        stmt: Stmt,
    },
    /// A loop would have to be both an inner and an outer loop.
    #[error("loop {stmt:?} is already classified as {existing:?}")]
    ConflictingLoopRole {
        /// The loop.
        stmt: Stmt,
        /// The role the loop already has.
        existing: LoopRole,
    },
    /// Asked to split a block that isn't a vertex block.
    #[error("{block} is not a vertex block")]
    NotVertexBlock {
        /// The block.
        block: BlockId,
    },
    /// Asked to split a vertex block that receives nothing.
    #[error("{block} has no receivers")]
    NoReceivers {
        /// The block.
        block: BlockId,
    },
    /// The block to split must have exactly one predecessor.
    #[error("{block} must have exactly one entry, found {found}")]
    EntryCount {
        /// The block.
        block: BlockId,
        /// How many entries it has.
        found: usize,
    },
    /// The block to split must have exactly one successor.
    #[error("{block} must have exactly one exit, found {found}")]
    ExitCount {
        /// The block.
        block: BlockId,
        /// How many exits it has.
        found: usize,
    },
    /// The predecessor of the block to split is itself a vertex block.
    #[error("predecessor {pred} of {block} is a vertex block")]
    VertexPredecessor {
        /// The block.
        block: BlockId,
        /// Its predecessor.
        pred: BlockId,
    },
    /// The successor of the block to split is itself a vertex block.
    #[error("successor {succ} of {block} is a vertex block")]
    VertexSuccessor {
        /// The block.
        block: BlockId,
        /// Its successor.
        succ: BlockId,
    },
    /// The successor of the block to split must have exactly one predecessor.
    #[error("successor {succ} of {block} must have exactly one entry, found {found}")]
    SuccessorEntryCount {
        /// The block.
        block: BlockId,
        /// Its successor.
        succ: BlockId,
        /// How many entries the successor has.
        found: usize,
    },
    /// An edge query failed.
    #[error(transparent)]
    Cfg(#[from] CfgError),
}
