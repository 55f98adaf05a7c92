//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::{Stmt, Symbol};
use crate::cfg::CommUnit;
use crate::dense_arena_key;
use smallvec::SmallVec;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

dense_arena_key! {
    /// The reference type for a [`BasicBlock`] inside of a procedure's
    /// [`BackendInfo`](crate::cfg::BackendInfo).
    ///
    /// This is only meaningful inside the procedure that created it. For an
    /// identifier that is unique across the program, see [`BlockId`].
    pub struct Block;
}

/// The program-wide id of a basic block.
///
/// These are what the generated code uses to name its states, so no two
/// blocks in the same program may share one, regardless of which procedure
/// they live in.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct BlockId(u32);

impl BlockId {
    /// Gets the raw id.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// Hands out [`BlockId`]s. Cloning it yields a handle to the same counter.
#[derive(Clone, Debug, Default)]
pub struct BlockIdIssuer {
    next: Arc<AtomicU32>,
}

impl BlockIdIssuer {
    /// Creates an issuer that starts at `bb0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh id.
    pub fn issue(&self) -> BlockId {
        BlockId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Gets the number of ids issued so far.
    pub fn issued(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

/// What kind of code a basic block holds.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum BlockKind {
    /// Sequential (master) code.
    Seq,
    /// The body of a parallel per-vertex loop.
    BeginVertex,
    /// The condition of an `If`.
    IfCond,
    /// The condition of a `While`.
    WhileCond,
}

impl BlockKind {
    /// Name used when printing blocks.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Seq => "seq",
            BlockKind::BeginVertex => "begin-vertex",
            BlockKind::IfCond => "if-cond",
            BlockKind::WhileCond => "while-cond",
        }
    }
}

/// A basic block of the backend's flow graph.
///
/// Entries and exits are ordered, duplicates are allowed. The edge lists of two
/// blocks are kept consistent with each other by
/// [`BackendInfo::add_exit`](crate::cfg::BackendInfo::add_exit), not by the block itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct BasicBlock {
    id: BlockId,
    kind: BlockKind,
    after_vertex: bool,
    entries: SmallVec<[Block; 2]>,
    exits: SmallVec<[Block; 2]>,
    sents: Vec<Stmt>,
    receivers: Vec<CommUnit>,
}

impl BasicBlock {
    pub(in crate::cfg) fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            after_vertex: false,
            entries: SmallVec::new(),
            exits: SmallVec::new(),
            sents: Vec::new(),
            receivers: Vec::new(),
        }
    }

    /// The program-wide id of the block.
    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The kind of the block.
    #[inline]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Checks if the block is the body of a parallel per-vertex loop.
    #[inline]
    pub fn is_vertex(&self) -> bool {
        self.kind == BlockKind::BeginVertex
    }

    /// Checks if the block is sequential code that directly follows a vertex block.
    #[inline]
    pub fn is_after_vertex(&self) -> bool {
        self.after_vertex
    }

    /// Marks the block as directly following a vertex block.
    pub fn set_after_vertex(&mut self, value: bool) {
        self.after_vertex = value;
    }

    /// Predecessors, in the order they were added.
    #[inline]
    pub fn entries(&self) -> &[Block] {
        &self.entries
    }

    /// Successors, in the order they were added.
    #[inline]
    pub fn exits(&self) -> &[Block] {
        &self.exits
    }

    /// Gets the number of predecessors.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Gets the number of successors.
    #[inline]
    pub fn num_exits(&self) -> usize {
        self.exits.len()
    }

    /// The top-level statements of the block, in program order.
    #[inline]
    pub fn sents(&self) -> &[Stmt] {
        &self.sents
    }

    /// Appends a top-level statement.
    pub fn add_sent(&mut self, stmt: Stmt) {
        self.sents.push(stmt);
    }

    /// The communication this block receives, in the order it was queued.
    #[inline]
    pub fn receivers(&self) -> &[CommUnit] {
        &self.receivers
    }

    /// Checks if the block has anything queued to receive.
    #[inline]
    pub fn has_receiver(&self) -> bool {
        !self.receivers.is_empty()
    }

    /// Queues a receiver.
    pub fn add_receiver(&mut self, unit: CommUnit) {
        self.receivers.push(unit);
    }

    /// Queues an inner loop as a receiver.
    pub fn add_nested_receiver(&mut self, foreach: Stmt) {
        self.add_receiver(CommUnit::Nested { foreach });
    }

    /// Queues a random-write receiver for the writes hosted by `sent_block`
    /// that target `symbol`.
    pub fn add_random_write_receiver(&mut self, sent_block: Stmt, symbol: Symbol) {
        self.add_receiver(CommUnit::RandomWrite { sent_block, symbol });
    }

    /// The random-write receivers, as `(sent_block, symbol)` pairs in queue order.
    pub fn random_write_receivers(&self) -> impl Iterator<Item = (Stmt, Symbol)> + '_ {
        self.receivers.iter().filter_map(|unit| match *unit {
            CommUnit::RandomWrite { sent_block, symbol } => Some((sent_block, symbol)),
            CommUnit::Nested { .. } => None,
        })
    }

    /// Removes every queued receiver.
    pub fn clear_receivers(&mut self) {
        self.receivers.clear();
    }

    pub(in crate::cfg) fn push_entry(&mut self, pred: Block) {
        self.entries.push(pred);
    }

    pub(in crate::cfg) fn push_exit(&mut self, succ: Block) {
        self.exits.push(succ);
    }

    pub(in crate::cfg) fn clear_entries(&mut self) {
        self.entries.clear();
    }

    pub(in crate::cfg) fn clear_exits(&mut self) {
        self.exits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use std::thread;

    #[test]
    fn issued_ids_are_shared_between_clones() {
        let issuer = BlockIdIssuer::new();
        let other = issuer.clone();

        assert_eq!(issuer.issue(), BlockId(0));
        assert_eq!(other.issue(), BlockId(1));
        assert_eq!(issuer.issue(), BlockId(2));
        assert_eq!(other.issued(), 3);
    }

    #[test]
    fn issued_ids_are_unique_across_threads() {
        let issuer = BlockIdIssuer::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let issuer = issuer.clone();

                thread::spawn(move || (0..100).map(|_| issuer.issue()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids: Vec<BlockId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn receivers_keep_queue_order() {
        let mut bb = BasicBlock::new(BlockId(4), BlockKind::BeginVertex);
        let (fe, sb) = (Stmt::key_new(1), Stmt::key_new(2));
        let sym = Symbol::key_new(0);

        assert!(bb.is_vertex());
        assert!(!bb.has_receiver());

        bb.add_random_write_receiver(sb, sym);
        bb.add_nested_receiver(fe);

        assert_eq!(
            bb.receivers(),
            [
                CommUnit::RandomWrite {
                    sent_block: sb,
                    symbol: sym
                },
                CommUnit::Nested { foreach: fe }
            ]
        );
        assert_eq!(bb.random_write_receivers().collect::<Vec<_>>(), [(sb, sym)]);

        bb.clear_receivers();

        assert!(!bb.has_receiver());
    }

    #[test]
    fn display_id() {
        assert_eq!(BlockId(12).to_string(), "bb12");
        assert_eq!(BlockKind::BeginVertex.name(), "begin-vertex");
    }
}
