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
use crate::cfg::{self, BackendInfo, Block, BlockKind};
use crate::ir::Procedure;
use crate::pass::{PassEffect, ProcedureTransformPass};
use crate::utility::SaHashSet;
use log::error;

/// A block graph validity verification pass.
///
/// This scans each procedure, and will do nothing if it is valid. If it isn't,
/// the procedure and the errors are printed and the pass panics.
pub struct VerifyPass;

impl ProcedureTransformPass for VerifyPass {
    fn run(&mut self, proc: &mut Procedure) -> PassEffect {
        verify_procedure_panic(proc);

        PassEffect::Unchanged
    }
}

/// Verifies the block graph of a procedure.
///
/// This checks that every edge is recorded on both of its ends, that the
/// entry block and every block an edge touches is in the block list, that the
/// block list and the block ids have no duplicates, that only vertex blocks
/// receive, and that everything received is a registered communication unit.
///
/// If anything is wrong, every problem found is returned.
pub fn verify_procedure(proc: &Procedure) -> Result<(), Vec<String>> {
    let mut verifier = Verifier {
        info: proc.backend_info(),
        errors: Vec::default(),
    };

    verifier.walk();

    if verifier.errors.is_empty() {
        Ok(())
    } else {
        Err(verifier.errors)
    }
}

/// This is [`verify_procedure`], except that it writes out the procedure and
/// any errors and then panics on failure.
pub fn verify_procedure_panic(proc: &Procedure) {
    if let Err(e) = verify_procedure(proc) {
        eprintln!("{}", cfg::stringify_procedure(proc));

        for error in e.iter() {
            error!("{}: {error}", proc.name());
            eprintln!("error: {error}");
        }

        panic!("procedure `{}` failed verification", proc.name());
    }
}

macro_rules! verify_assert {
    ($self:expr, $cond:expr, $($explanation:tt)+) => {
        if !($cond) {
            $self.errors.push(format!($($explanation)+));
        }
    };
}

struct Verifier<'p> {
    info: &'p BackendInfo,
    errors: Vec<String>,
}

impl<'p> Verifier<'p> {
    fn walk(&mut self) {
        let info = self.info;
        let mut registered = SecondarySet::new();
        let mut ids = SaHashSet::default();

        for block in info.blocks() {
            let id = info.block(block).id();

            verify_assert!(self, !registered.insert(block), "{id} is in the block list twice");
            verify_assert!(self, ids.insert(id), "block id {id} is used by more than one block");
        }

        if let Some(entry) = info.entry_block() {
            verify_assert!(
                self,
                registered.contains(entry),
                "entry block {} is not in the block list",
                info.block(entry).id()
            );
        }

        for block in info.blocks() {
            self.edges(block, &registered);
            self.receivers(block);
        }
    }

    fn edges(&mut self, block: Block, registered: &SecondarySet<Block>) {
        let info = self.info;
        let bb = info.block(block);
        let id = bb.id();

        for succ in bb.exits().iter().copied() {
            let succ_id = info.block(succ).id();
            let forward = count(bb.exits(), succ);
            let backward = count(info.block(succ).entries(), block);

            verify_assert!(
                self,
                registered.contains(succ),
                "{id} has an exit to {succ_id}, which is not in the block list"
            );
            verify_assert!(
                self,
                forward == backward,
                "{id} has {forward} exit(s) to {succ_id}, but {succ_id} has {backward} entry(s) from {id}"
            );
        }

        for pred in bb.entries().iter().copied() {
            let pred_id = info.block(pred).id();
            let forward = count(info.block(pred).exits(), block);
            let backward = count(bb.entries(), pred);

            verify_assert!(
                self,
                registered.contains(pred),
                "{id} has an entry from {pred_id}, which is not in the block list"
            );
            verify_assert!(
                self,
                forward == backward,
                "{id} has {backward} entry(s) from {pred_id}, but {pred_id} has {forward} exit(s) to {id}"
            );
        }

        verify_assert!(
            self,
            !bb.is_after_vertex() || bb.kind() == BlockKind::Seq,
            "{id} is marked as following a vertex block, but is not sequential"
        );
    }

    fn receivers(&mut self, block: Block) {
        let info = self.info;
        let bb = info.block(block);
        let id = bb.id();

        verify_assert!(
            self,
            !bb.has_receiver() || bb.is_vertex(),
            "{id} has receivers, but is not a vertex block"
        );

        for (i, unit) in bb.receivers().iter().enumerate() {
            verify_assert!(
                self,
                info.registry().comm_id(*unit).is_some(),
                "{id} receives {unit:?}, which is not a registered communication unit"
            );
            verify_assert!(
                self,
                !bb.receivers()[..i].contains(unit),
                "{id} receives {unit:?} more than once"
            );
        }
    }
}

fn count(blocks: &[Block], block: Block) -> usize {
    blocks.iter().filter(|bb| **bb == block).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use crate::ast::Stmt;
    use crate::cfg::CommUnit;
    use crate::ir::{Proc, Program};

    // entry -> vertex -> exit
    fn program() -> (Program, Proc, [Block; 3]) {
        let mut program = Program::new("verify");
        let mut b = program.define_procedure("p");

        let entry = b.create_block(BlockKind::Seq);
        let vertex = b.create_block(BlockKind::BeginVertex);
        let exit = b.create_block(BlockKind::Seq);

        b.link(entry, vertex);
        b.link(vertex, exit);
        b.set_entry(entry);

        let proc = b.define();

        (program, proc, [entry, vertex, exit])
    }

    fn errors(program: &Program, proc: Proc) -> Vec<String> {
        verify_procedure(program.procedure(proc)).unwrap_err()
    }

    #[test]
    fn valid_procedure() {
        let (program, proc, _) = program();

        assert_eq!(verify_procedure(program.procedure(proc)), Ok(()));
    }

    #[test]
    fn one_sided_edge() {
        let (mut program, proc, [_, vertex, exit]) = program();
        let info = program.procedure_mut(proc).backend_info_mut();

        info.remove_all_entries(exit);

        let errors = errors(&program, proc);
        let (v, e) = {
            let info = program.procedure(proc).backend_info();

            (info.block(vertex).id(), info.block(exit).id())
        };

        assert_eq!(
            errors,
            [format!(
                "{v} has 1 exit(s) to {e}, but {e} has 0 entry(s) from {v}"
            )]
        );
    }

    #[test]
    fn unregistered_blocks() {
        let (mut program, proc, [entry, _, _]) = program();
        let info = program.procedure_mut(proc).backend_info_mut();
        let stray = info.create_block(BlockKind::Seq);

        info.add_exit(entry, stray);
        info.set_entry_block(stray);

        let errors = errors(&program, proc);

        assert_eq!(errors.len(), 2);
        assert!(errors[0].ends_with("is not in the block list"));
        assert!(errors[1].contains("which is not in the block list"));
    }

    #[test]
    fn receivers_on_wrong_blocks() {
        let (mut program, proc, [entry, vertex, _]) = program();
        let info = program.procedure_mut(proc).backend_info_mut();
        let fe = Stmt::key_new(0);

        info.registry_mut().add_communication_unit_nested(fe);
        info.block_mut(entry).add_nested_receiver(fe);
        info.block_mut(vertex).add_nested_receiver(fe);
        info.block_mut(vertex).add_nested_receiver(fe);
        info.block_mut(vertex).add_nested_receiver(Stmt::key_new(1));

        let errors = errors(&program, proc);

        assert_eq!(errors.len(), 3);
        assert!(errors[0].ends_with("has receivers, but is not a vertex block"));
        assert!(errors[1].ends_with("more than once"));
        assert!(errors[2].ends_with("which is not a registered communication unit"));
        assert!(errors[2].contains(&format!("{:?}", CommUnit::Nested {
            foreach: Stmt::key_new(1)
        })));
    }

    #[test]
    fn after_vertex_on_vertex_block() {
        let (mut program, proc, [_, vertex, _]) = program();

        program
            .procedure_mut(proc)
            .backend_info_mut()
            .block_mut(vertex)
            .set_after_vertex(true);

        assert_eq!(errors(&program, proc).len(), 1);
    }

    #[test]
    #[should_panic(expected = "procedure `p` failed verification")]
    fn verify_pass_panics() {
        let (mut program, proc, [_, vertex, _]) = program();
        let p = program.procedure_mut(proc);

        p.backend_info_mut().remove_all_exits(vertex);

        VerifyPass.run(p);
    }
}
