//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::cfg::{BackendInfo, Block, BlockKind, CommUnit};
use crate::transforms::CommError;
use log::debug;
use smallvec::SmallVec;

/// The three blocks a vertex block turns into when it is split.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct SplitBlocks {
    /// The original block. It keeps its statements and sends the messages.
    pub send: Block,
    /// The new sequential block between the two vertex blocks.
    pub seq: Block,
    /// The new vertex block that receives the messages.
    pub receive: Block,
}

/// Splits a vertex block with queued receivers into a send block, a sequential
/// block and a receive block:
///
/// ```other
///   P -> B -> N      becomes      P -> B -> S -> R -> N
/// ```
///
/// `S` is a fresh sequential block marked as following a vertex block, `R` a
/// fresh vertex block that takes over every receiver of `B`. Both are appended
/// to the block list (`S` first), and both get fresh program-wide ids. `B` keeps
/// its statements and its id, but its receiver list ends up empty.
///
/// `B` must be a vertex block with at least one receiver, exactly one entry `P`
/// and exactly one exit `N`. Neither `P` nor `N` may be vertex blocks and `N`
/// must have `B` as its only entry. If any of that does not hold, nothing
/// is changed and the broken requirement is returned.
pub fn split_vertex_block(info: &mut BackendInfo, block: Block) -> Result<SplitBlocks, CommError> {
    let bb = info.block(block);
    let id = bb.id();

    if !bb.is_vertex() {
        return Err(CommError::NotVertexBlock { block: id });
    }

    if !bb.has_receiver() {
        return Err(CommError::NoReceivers { block: id });
    }

    if bb.num_entries() != 1 {
        return Err(CommError::EntryCount {
            block: id,
            found: bb.num_entries(),
        });
    }

    if bb.num_exits() != 1 {
        return Err(CommError::ExitCount {
            block: id,
            found: bb.num_exits(),
        });
    }

    let prev = info.nth_entry(block, 0)?;
    let next = info.nth_exit(block, 0)?;

    if info.block(prev).is_vertex() {
        return Err(CommError::VertexPredecessor {
            block: id,
            pred: info.block(prev).id(),
        });
    }

    if info.block(next).is_vertex() {
        return Err(CommError::VertexSuccessor {
            block: id,
            succ: info.block(next).id(),
        });
    }

    if info.block(next).num_entries() != 1 {
        return Err(CommError::SuccessorEntryCount {
            block: id,
            succ: info.block(next).id(),
            found: info.block(next).num_entries(),
        });
    }

    // nothing below this point can fail
    let seq = info.create_block(BlockKind::Seq);
    let receive = info.create_block(BlockKind::BeginVertex);

    info.block_mut(seq).set_after_vertex(true);

    let receivers: SmallVec<[CommUnit; 4]> = SmallVec::from_slice(info.block(block).receivers());

    for unit in receivers.iter() {
        info.block_mut(receive).add_receiver(*unit);
    }

    info.block_mut(block).clear_receivers();

    // B -> N is removed from both ends, N had no other entry and B no other exit
    info.remove_all_exits(block);
    info.remove_all_entries(next);

    info.add_exit(block, seq);
    info.add_exit(seq, receive);
    info.add_exit(receive, next);

    info.append_block(seq);
    info.append_block(receive);

    debug!(
        "split {id} into {id} -> {} -> {}, moving {} receiver(s)",
        info.block(seq).id(),
        info.block(receive).id(),
        receivers.len()
    );

    Ok(SplitBlocks {
        send: block,
        seq,
        receive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use crate::ast::{Stmt, Symbol};
    use crate::cfg::BlockIdIssuer;

    struct Graph {
        info: BackendInfo,
        prev: Block,
        vertex: Block,
        next: Block,
    }

    // prev -> vertex -> next
    fn graph(prev: BlockKind, next: BlockKind) -> Graph {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let p = info.create_block(prev);
        let v = info.create_block(BlockKind::BeginVertex);
        let n = info.create_block(next);

        for bb in [p, v, n] {
            info.append_block(bb);
        }

        info.set_entry_block(p);
        info.add_exit(p, v);
        info.add_exit(v, n);
        info.block_mut(v).add_sent(Stmt::key_new(0));
        info.block_mut(v).add_nested_receiver(Stmt::key_new(1));
        info.block_mut(v)
            .add_random_write_receiver(Stmt::key_new(2), Symbol::key_new(0));

        Graph {
            info,
            prev: p,
            vertex: v,
            next: n,
        }
    }

    #[test]
    fn split_shape() {
        let Graph {
            mut info,
            prev,
            vertex,
            next,
        } = graph(BlockKind::Seq, BlockKind::Seq);

        let receivers = info.block(vertex).receivers().to_vec();
        let old_id = info.block(vertex).id();
        let SplitBlocks { send, seq, receive } = split_vertex_block(&mut info, vertex).unwrap();

        assert_eq!(send, vertex);
        assert_eq!(info.block(prev).exits(), [vertex]);
        assert_eq!(info.block(vertex).entries(), [prev]);
        assert_eq!(info.block(vertex).exits(), [seq]);
        assert_eq!(info.block(seq).entries(), [vertex]);
        assert_eq!(info.block(seq).exits(), [receive]);
        assert_eq!(info.block(receive).entries(), [seq]);
        assert_eq!(info.block(receive).exits(), [next]);
        assert_eq!(info.block(next).entries(), [receive]);

        assert_eq!(info.block(seq).kind(), BlockKind::Seq);
        assert!(info.block(seq).is_after_vertex());
        assert!(info.block(receive).is_vertex());
        assert!(!info.block(receive).is_after_vertex());

        assert_eq!(info.block(receive).receivers(), receivers.as_slice());
        assert!(!info.block(vertex).has_receiver());
        assert!(!info.block(seq).has_receiver());
        assert_eq!(info.block(vertex).sents(), [Stmt::key_new(0)]);
        assert!(info.block(seq).sents().is_empty());
        assert!(info.block(receive).sents().is_empty());

        assert_eq!(info.block(vertex).id(), old_id);
        assert_eq!(info.blocks().collect::<Vec<_>>(), [prev, vertex, next, seq, receive]);
    }

    #[test]
    fn split_with_loop_back_to_predecessor() {
        // cond -> vertex -> cond, the shape of a vertex block inside of a `While`
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let cond = info.create_block(BlockKind::WhileCond);
        let vertex = info.create_block(BlockKind::BeginVertex);

        info.append_block(cond);
        info.append_block(vertex);
        info.add_exit(cond, vertex);
        info.add_exit(vertex, cond);
        info.block_mut(vertex).add_nested_receiver(Stmt::key_new(0));

        let split = split_vertex_block(&mut info, vertex).unwrap();

        assert_eq!(info.block(cond).exits(), [vertex]);
        assert_eq!(info.block(cond).entries(), [split.receive]);
        assert_eq!(info.block(split.receive).exits(), [cond]);
    }

    fn assert_unchanged(info: &BackendInfo, before: &BackendInfo) {
        assert_eq!(info.num_blocks(), before.num_blocks());
        assert_eq!(info.num_allocated_blocks(), before.num_allocated_blocks());

        for bb in before.blocks() {
            assert_eq!(info.block(bb), before.block(bb));
        }
    }

    fn assert_rejected(mut g: Graph, expected: impl FnOnce(&Graph) -> CommError) {
        let before = g.info.clone();
        let err = split_vertex_block(&mut g.info, g.vertex).unwrap_err();

        assert_eq!(err, expected(&g));
        assert_unchanged(&g.info, &before);
    }

    #[test]
    fn rejects_non_vertex_block() {
        let g = graph(BlockKind::Seq, BlockKind::Seq);
        let before = g.info.clone();
        let mut info = g.info;

        assert_eq!(
            split_vertex_block(&mut info, g.prev),
            Err(CommError::NotVertexBlock {
                block: info.block(g.prev).id()
            })
        );
        assert_unchanged(&info, &before);
    }

    #[test]
    fn rejects_block_without_receivers() {
        let mut g = graph(BlockKind::Seq, BlockKind::Seq);

        g.info.block_mut(g.vertex).clear_receivers();

        assert_rejected(g, |g| CommError::NoReceivers {
            block: g.info.block(g.vertex).id(),
        });
    }

    #[test]
    fn rejects_extra_entry() {
        let mut g = graph(BlockKind::Seq, BlockKind::Seq);
        let other = g.info.create_block(BlockKind::Seq);

        g.info.append_block(other);
        g.info.add_exit(other, g.vertex);

        assert_rejected(g, |g| CommError::EntryCount {
            block: g.info.block(g.vertex).id(),
            found: 2,
        });
    }

    #[test]
    fn rejects_extra_exit() {
        let mut g = graph(BlockKind::Seq, BlockKind::Seq);
        let other = g.info.create_block(BlockKind::Seq);

        g.info.append_block(other);
        g.info.add_exit(g.vertex, other);

        assert_rejected(g, |g| CommError::ExitCount {
            block: g.info.block(g.vertex).id(),
            found: 2,
        });
    }

    #[test]
    fn rejects_vertex_predecessor() {
        let g = graph(BlockKind::BeginVertex, BlockKind::Seq);

        assert_rejected(g, |g| CommError::VertexPredecessor {
            block: g.info.block(g.vertex).id(),
            pred: g.info.block(g.prev).id(),
        });
    }

    #[test]
    fn rejects_vertex_successor() {
        let g = graph(BlockKind::Seq, BlockKind::BeginVertex);

        assert_rejected(g, |g| CommError::VertexSuccessor {
            block: g.info.block(g.vertex).id(),
            succ: g.info.block(g.next).id(),
        });
    }

    #[test]
    fn rejects_successor_with_extra_entry() {
        let mut g = graph(BlockKind::Seq, BlockKind::Seq);
        let other = g.info.create_block(BlockKind::Seq);

        g.info.append_block(other);
        g.info.add_exit(other, g.next);

        assert_rejected(g, |g| CommError::SuccessorEntryCount {
            block: g.info.block(g.vertex).id(),
            succ: g.info.block(g.next).id(),
            found: 2,
        });
    }

    #[test]
    fn rejects_isolated_block() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let vertex = info.create_block(BlockKind::BeginVertex);

        info.append_block(vertex);
        info.block_mut(vertex).add_nested_receiver(Stmt::key_new(0));

        assert_eq!(
            split_vertex_block(&mut info, vertex),
            Err(CommError::EntryCount {
                block: info.block(vertex).id(),
                found: 0
            })
        );
    }
}
