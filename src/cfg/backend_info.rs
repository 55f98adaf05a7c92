//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaMap;
use crate::cfg::{BasicBlock, Block, BlockIdIssuer, BlockKind, CfgError, CommRegistry};
use crate::utility::PackedOption;
use std::iter::Copied;
use std::slice;

/// The per-procedure state of the backend: the basic blocks, their order,
/// and the communication units registered for them.
///
/// Blocks are allocated with [`Self::create_block`] and only become part of
/// the procedure once [`Self::append_block`] registers them in the block list.
/// The entry block and everything reachable from it is what the walkers see,
/// the block list is what code generation emits.
#[derive(Clone, Debug)]
pub struct BackendInfo {
    ids: BlockIdIssuer,
    blocks: ArenaMap<Block, BasicBlock>,
    layout: Vec<Block>,
    entry: PackedOption<Block>,
    registry: CommRegistry,
}

impl BackendInfo {
    /// Creates an empty backend state that gets its block ids from `ids`.
    pub fn new(ids: BlockIdIssuer) -> Self {
        Self {
            ids,
            blocks: ArenaMap::default(),
            layout: Vec::default(),
            entry: PackedOption::none(),
            registry: CommRegistry::default(),
        }
    }

    /// Allocates a block with a fresh program-wide id, no edges, no statements
    /// and no receivers. The block is not part of the block list yet.
    pub fn create_block(&mut self, kind: BlockKind) -> Block {
        let id = self.ids.issue();

        self.blocks.insert(BasicBlock::new(id, kind))
    }

    /// Registers a block at the end of the procedure's block list.
    pub fn append_block(&mut self, block: Block) {
        debug_assert!(!self.is_block_registered(block), "block registered twice");

        self.layout.push(block);
    }

    /// Checks if a block has been registered in the block list.
    pub fn is_block_registered(&self, block: Block) -> bool {
        self.layout.contains(&block)
    }

    /// Iterates over the block list in order.
    pub fn blocks(&self) -> Copied<slice::Iter<'_, Block>> {
        self.layout.iter().copied()
    }

    /// Gets the number of blocks in the block list.
    pub fn num_blocks(&self) -> usize {
        self.layout.len()
    }

    /// Gets the number of blocks ever allocated, registered or not.
    pub fn num_allocated_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Resolves a block.
    #[inline]
    pub fn block(&self, block: Block) -> &BasicBlock {
        &self.blocks[block]
    }

    /// Resolves a block.
    #[inline]
    pub fn block_mut(&mut self, block: Block) -> &mut BasicBlock {
        &mut self.blocks[block]
    }

    /// The block the procedure starts executing at.
    #[inline]
    pub fn entry_block(&self) -> Option<Block> {
        self.entry.expand()
    }

    /// Sets the entry block.
    pub fn set_entry_block(&mut self, block: Block) {
        self.entry = PackedOption::some(block);
    }

    /// Adds the edge `from -> to`, updating both sides.
    pub fn add_exit(&mut self, from: Block, to: Block) {
        if from == to {
            let bb = &mut self.blocks[from];

            bb.push_exit(from);
            bb.push_entry(from);
        } else {
            let (pred, succ) = self.blocks.get_pair_mut(from, to);

            pred.push_exit(to);
            succ.push_entry(from);
        }
    }

    /// Adds the edge `from -> to`, updating both sides. Same as [`Self::add_exit`]
    /// with the arguments flipped.
    pub fn add_entry(&mut self, to: Block, from: Block) {
        self.add_exit(from, to);
    }

    /// Clears the exit list of `block`. The predecessors' entry lists of the
    /// old successors are left alone.
    pub fn remove_all_exits(&mut self, block: Block) {
        self.blocks[block].clear_exits();
    }

    /// Clears the entry list of `block`. The exit lists of the old
    /// predecessors are left alone.
    pub fn remove_all_entries(&mut self, block: Block) {
        self.blocks[block].clear_entries();
    }

    /// Gets the `index`-th predecessor of `block`.
    pub fn nth_entry(&self, block: Block, index: usize) -> Result<Block, CfgError> {
        let bb = &self.blocks[block];

        bb.entries()
            .get(index)
            .copied()
            .ok_or(CfgError::EntryOutOfRange {
                block: bb.id(),
                index,
                len: bb.num_entries(),
            })
    }

    /// Gets the `index`-th successor of `block`.
    pub fn nth_exit(&self, block: Block, index: usize) -> Result<Block, CfgError> {
        let bb = &self.blocks[block];

        bb.exits()
            .get(index)
            .copied()
            .ok_or(CfgError::ExitOutOfRange {
                block: bb.id(),
                index,
                len: bb.num_exits(),
            })
    }

    /// The communication units of the procedure.
    #[inline]
    pub fn registry(&self) -> &CommRegistry {
        &self.registry
    }

    /// The communication units of the procedure.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut CommRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(info: &mut BackendInfo, kinds: &[BlockKind]) -> Vec<Block> {
        let blocks: Vec<Block> = kinds
            .iter()
            .map(|kind| {
                let bb = info.create_block(*kind);

                info.append_block(bb);

                bb
            })
            .collect();

        for pair in blocks.windows(2) {
            info.add_exit(pair[0], pair[1]);
        }

        blocks
    }

    #[test]
    fn edges_are_symmetric() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let b = chain(&mut info, &[BlockKind::Seq, BlockKind::BeginVertex, BlockKind::Seq]);

        info.add_entry(b[0], b[2]);

        assert_eq!(info.block(b[0]).exits(), [b[1]]);
        assert_eq!(info.block(b[0]).entries(), [b[2]]);
        assert_eq!(info.block(b[1]).entries(), [b[0]]);
        assert_eq!(info.block(b[2]).exits(), [b[0]]);
        assert_eq!(info.nth_exit(b[1], 0), Ok(b[2]));
        assert_eq!(info.nth_entry(b[1], 0), Ok(b[0]));
    }

    #[test]
    fn self_loop() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let bb = info.create_block(BlockKind::WhileCond);

        info.add_exit(bb, bb);

        assert_eq!(info.block(bb).exits(), [bb]);
        assert_eq!(info.block(bb).entries(), [bb]);
    }

    #[test]
    fn out_of_range_edges() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let b = chain(&mut info, &[BlockKind::Seq, BlockKind::Seq]);

        assert_eq!(
            info.nth_entry(b[0], 0),
            Err(CfgError::EntryOutOfRange {
                block: info.block(b[0]).id(),
                index: 0,
                len: 0
            })
        );
        assert_eq!(
            info.nth_exit(b[0], 1),
            Err(CfgError::ExitOutOfRange {
                block: info.block(b[0]).id(),
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn edge_removal_is_one_sided() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let b = chain(&mut info, &[BlockKind::Seq, BlockKind::Seq]);

        info.remove_all_exits(b[0]);

        assert!(info.block(b[0]).exits().is_empty());
        assert_eq!(info.block(b[1]).entries(), [b[0]]);

        info.remove_all_entries(b[1]);

        assert!(info.block(b[1]).entries().is_empty());
    }

    #[test]
    fn creation_does_not_register() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let a = info.create_block(BlockKind::Seq);
        let b = info.create_block(BlockKind::Seq);

        info.append_block(b);

        assert!(!info.is_block_registered(a));
        assert!(info.is_block_registered(b));
        assert_eq!(info.blocks().collect::<Vec<_>>(), [b]);
        assert_eq!(info.num_blocks(), 1);
        assert_eq!(info.num_allocated_blocks(), 2);
        assert_ne!(info.block(a).id(), info.block(b).id());
    }

    #[test]
    fn ids_are_shared_between_procedures() {
        let ids = BlockIdIssuer::new();
        let mut first = BackendInfo::new(ids.clone());
        let mut second = BackendInfo::new(ids);

        let a = first.create_block(BlockKind::Seq);
        let b = second.create_block(BlockKind::Seq);
        let c = first.create_block(BlockKind::Seq);

        let mut seen = vec![
            first.block(a).id(),
            second.block(b).id(),
            first.block(c).id(),
        ];

        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), 3);
    }
}
