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
use crate::ast::{Ast, Stmt};
use crate::cfg::{BackendInfo, Block, CommUnit};
use smallvec::SmallVec;

/// Computes the blocks reachable from the entry block, in DFS preorder.
/// Successors are followed in exit order and every block is yielded once,
/// loops in the graph are fine.
///
/// If there is no entry block, nothing is reachable.
pub fn reachable_blocks(info: &BackendInfo) -> Vec<Block> {
    let mut order = Vec::new();
    let mut seen = SecondarySet::new();
    let mut stack: SmallVec<[Block; 16]> = SmallVec::new();

    if let Some(entry) = info.entry_block() {
        stack.push(entry);
    }

    while let Some(block) = stack.pop() {
        if seen.insert(block) {
            continue;
        }

        order.push(block);

        // reversed so the first exit is popped (and visited) first
        stack.extend(info.block(block).exits().iter().rev().copied());
    }

    order
}

/// Which statement lists of each block a walk looks at.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct WalkOptions {
    /// Walk the statements of each block.
    pub sents: bool,
    /// Walk the bodies of the inner loops that each block receives.
    pub receivers: bool,
}

impl WalkOptions {
    /// Only the statements of each block.
    pub fn sents_only() -> Self {
        Self {
            sents: true,
            receivers: false,
        }
    }

    /// Only the receiver bodies of each block.
    pub fn receivers_only() -> Self {
        Self {
            sents: false,
            receivers: true,
        }
    }

    /// Both statements and receiver bodies.
    pub fn all() -> Self {
        Self {
            sents: true,
            receivers: true,
        }
    }
}

/// The context a statement is visited in.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct WalkScope {
    /// The block whose statement list (or receiver list) is being walked.
    pub block: Block,
    /// The innermost enclosing outer loop, if the visitor has announced one.
    pub outer_loop: Option<Stmt>,
    /// Set when walking the body of a receiver instead of a block's statements.
    pub under_receiver: bool,
}

impl WalkScope {
    /// The scope at the top of `block`'s statement list.
    pub fn new(block: Block) -> Self {
        Self {
            block,
            outer_loop: None,
            under_receiver: false,
        }
    }

    /// The same scope with a different innermost outer loop.
    pub fn with_outer_loop(self, outer_loop: Stmt) -> Self {
        Self {
            outer_loop: Some(outer_loop),
            ..self
        }
    }
}

/// A visitor for [`walk_blocks_once`].
pub trait BlockStmtVisitor {
    /// What the visitor aborts the walk with.
    type Error;

    /// Whether the statements of `block` should be walked at all.
    fn accepts_block(&mut self, info: &BackendInfo, block: Block) -> bool {
        let _ = (info, block);

        true
    }

    /// Visits a single statement. The returned scope is the one the statement's
    /// children are visited in, `scope` is returned as-is when nothing changes.
    fn visit_stmt(
        &mut self,
        ast: &mut Ast,
        info: &mut BackendInfo,
        stmt: Stmt,
        scope: WalkScope,
    ) -> Result<WalkScope, Self::Error>;
}

/// Visits every statement of every reachable block exactly once per listing,
/// parents before children and in program order. Blocks are walked in the
/// order [`reachable_blocks`] gives, before anything is visited.
///
/// With [`WalkOptions::receivers`], the bodies of the inner loops a block is
/// queued to receive are walked after its statements, with
/// [`WalkScope::under_receiver`] set. The receiver list is read after the
/// block's statements have been visited.
///
/// The first error from the visitor ends the walk and is returned.
pub fn walk_blocks_once<V: BlockStmtVisitor>(
    ast: &mut Ast,
    info: &mut BackendInfo,
    visitor: &mut V,
    options: WalkOptions,
) -> Result<(), V::Error> {
    for block in reachable_blocks(info) {
        if !visitor.accepts_block(info, block) {
            continue;
        }

        let scope = WalkScope::new(block);

        if options.sents {
            let sents: SmallVec<[Stmt; 8]> = SmallVec::from_slice(info.block(block).sents());

            for stmt in sents {
                walk_stmt(ast, info, visitor, stmt, scope)?;
            }
        }

        if options.receivers {
            let scope = WalkScope {
                under_receiver: true,
                ..scope
            };

            let bodies: SmallVec<[Stmt; 4]> = info
                .block(block)
                .receivers()
                .iter()
                .filter_map(|unit| match unit {
                    CommUnit::Nested { foreach } => ast.foreach(*foreach).map(|fe| fe.body()),
                    CommUnit::RandomWrite { .. } => None,
                })
                .collect();

            for body in bodies {
                walk_stmt(ast, info, visitor, body, scope)?;
            }
        }
    }

    Ok(())
}

fn walk_stmt<V: BlockStmtVisitor>(
    ast: &mut Ast,
    info: &mut BackendInfo,
    visitor: &mut V,
    stmt: Stmt,
    scope: WalkScope,
) -> Result<(), V::Error> {
    let inner = visitor.visit_stmt(ast, info, stmt, scope)?;

    for child in ast.children(stmt) {
        walk_stmt(ast, info, visitor, child, inner)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IterKind, StmtData, SymbolKind};
    use crate::cfg::{BlockIdIssuer, BlockKind};
    use crate::ir::{Proc, Program};

    struct Recorder {
        vertex_only: bool,
        seen: Vec<(Stmt, WalkScope)>,
    }

    impl BlockStmtVisitor for Recorder {
        type Error = Stmt;

        fn accepts_block(&mut self, info: &BackendInfo, block: Block) -> bool {
            !self.vertex_only || info.block(block).is_vertex()
        }

        fn visit_stmt(
            &mut self,
            ast: &mut Ast,
            _: &mut BackendInfo,
            stmt: Stmt,
            scope: WalkScope,
        ) -> Result<WalkScope, Stmt> {
            self.seen.push((stmt, scope));

            match ast.foreach(stmt) {
                Some(fe) if fe.iter_kind().is_all_graph() => Ok(scope.with_outer_loop(stmt)),
                _ => Ok(scope),
            }
        }
    }

    fn recorder(vertex_only: bool) -> Recorder {
        Recorder {
            vertex_only,
            seen: Vec::new(),
        }
    }

    #[test]
    fn reachable_is_preorder_and_skips_unreachable() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let entry = info.create_block(BlockKind::Seq);
        let cond = info.create_block(BlockKind::WhileCond);
        let body = info.create_block(BlockKind::BeginVertex);
        let exit = info.create_block(BlockKind::Seq);
        let dead = info.create_block(BlockKind::Seq);

        for bb in [entry, cond, body, exit, dead] {
            info.append_block(bb);
        }

        info.set_entry_block(entry);
        info.add_exit(entry, cond);
        info.add_exit(cond, body);
        info.add_exit(cond, exit);
        info.add_exit(body, cond);
        info.add_exit(dead, exit);

        assert_eq!(reachable_blocks(&info), [entry, cond, body, exit]);
    }

    #[test]
    fn nothing_reachable_without_entry() {
        let mut info = BackendInfo::new(BlockIdIssuer::new());
        let bb = info.create_block(BlockKind::Seq);

        info.append_block(bb);

        assert!(reachable_blocks(&info).is_empty());
    }

    // entry: seq -> vertex { Foreach(n: G.Nodes) { Foreach(t: n.Nbrs) { op } } } -> seq
    fn nested_loops() -> (Program, Proc, [Stmt; 3], Block) {
        let mut program = Program::new("walk");
        let mut b = program.define_procedure("p");

        let g = b.symbol("G", SymbolKind::Graph);
        let n = b.symbol("n", SymbolKind::Node);
        let t = b.symbol("t", SymbolKind::Node);

        let op = b.opaque("t.x += n.y");
        let inner_body = b.sent_block(&[op]);
        let inner = b.foreach(t, n, IterKind::OutNbrs, inner_body);
        let outer_body = b.sent_block(&[inner]);
        let outer = b.foreach(n, g, IterKind::AllNodes, outer_body);

        let entry = b.create_block(BlockKind::Seq);
        let vertex = b.create_block(BlockKind::BeginVertex);
        let exit = b.create_block(BlockKind::Seq);

        b.add_sent(vertex, outer);
        b.link(entry, vertex);
        b.link(vertex, exit);
        b.set_entry(entry);

        let proc = b.define();

        (program, proc, [outer, inner, op], vertex)
    }

    #[test]
    fn walk_sents_in_program_order() {
        let (mut program, proc, [outer, inner, op], vertex) = nested_loops();
        let mut rec = recorder(true);
        let (ast, info) = program.procedure_mut(proc).parts_mut();

        walk_blocks_once(ast, info, &mut rec, WalkOptions::sents_only()).unwrap();

        let stmts: Vec<Stmt> = rec.seen.iter().map(|(s, _)| *s).collect();

        // the two loop bodies are sequencing blocks, hence the gaps
        assert_eq!(stmts.len(), 5);
        assert_eq!(stmts[0], outer);
        assert_eq!(stmts[2], inner);
        assert_eq!(stmts[4], op);

        assert!(rec.seen.iter().all(|(_, scope)| scope.block == vertex));
        assert!(rec.seen.iter().all(|(_, scope)| !scope.under_receiver));
        assert_eq!(rec.seen[0].1.outer_loop, None);
        assert_eq!(rec.seen[2].1.outer_loop, Some(outer));
        assert_eq!(rec.seen[4].1.outer_loop, Some(outer));
    }

    #[test]
    fn walk_receivers_marks_scope() {
        let (mut program, proc, [_, inner, op], vertex) = nested_loops();
        let mut rec = recorder(false);
        let (ast, info) = program.procedure_mut(proc).parts_mut();

        info.block_mut(vertex).add_nested_receiver(inner);

        walk_blocks_once(ast, info, &mut rec, WalkOptions::receivers_only()).unwrap();

        // only the inner loop's body and the statement inside of it
        assert_eq!(rec.seen.len(), 2);
        assert_eq!(rec.seen[1].0, op);
        assert!(rec.seen.iter().all(|(_, scope)| scope.under_receiver));
    }

    #[test]
    fn walk_all_visits_both_listings() {
        let (mut program, proc, [_, inner, _], vertex) = nested_loops();
        let mut rec = recorder(false);
        let (ast, info) = program.procedure_mut(proc).parts_mut();

        info.block_mut(vertex).add_nested_receiver(inner);

        walk_blocks_once(ast, info, &mut rec, WalkOptions::all()).unwrap();

        assert_eq!(rec.seen.len(), 7);
        assert_eq!(rec.seen.iter().filter(|(_, s)| s.under_receiver).count(), 2);
    }

    #[test]
    fn walk_skips_rejected_blocks() {
        let (mut program, proc, _, _) = nested_loops();
        let (ast, info) = program.procedure_mut(proc).parts_mut();

        for bb in info.blocks().collect::<Vec<_>>() {
            if !info.block(bb).is_vertex() {
                let extra = ast.create_stmt(StmtData::Opaque(crate::utility::StringPool::new().insert("x")));

                info.block_mut(bb).add_sent(extra);
            }
        }

        let mut rec = recorder(true);

        walk_blocks_once(ast, info, &mut rec, WalkOptions::sents_only()).unwrap();

        assert_eq!(rec.seen.len(), 5);
    }

    #[test]
    fn visitor_error_stops_walk() {
        struct FailOn(Stmt, usize);

        impl BlockStmtVisitor for FailOn {
            type Error = Stmt;

            fn visit_stmt(
                &mut self,
                _: &mut Ast,
                _: &mut BackendInfo,
                stmt: Stmt,
                scope: WalkScope,
            ) -> Result<WalkScope, Stmt> {
                self.1 += 1;

                if stmt == self.0 {
                    Err(stmt)
                } else {
                    Ok(scope)
                }
            }
        }

        let (mut program, proc, [_, inner, _], _) = nested_loops();
        let (ast, info) = program.procedure_mut(proc).parts_mut();
        let mut visitor = FailOn(inner, 0);

        assert_eq!(
            walk_blocks_once(ast, info, &mut visitor, WalkOptions::sents_only()),
            Err(inner)
        );
        assert_eq!(visitor.1, 3);
    }
}
