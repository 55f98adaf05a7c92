//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

#![deny(
    unreachable_pub,
    missing_docs,
    missing_abi,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]

//! # Garnet
//!
//! The backend of a vertex-centric graph compiler. Procedures come in as a
//! statement tree plus a graph of basic blocks, and the passes in here
//! reshape that block graph so that every superstep that sends messages is
//! followed by one that receives them.

pub mod arena;
pub mod ast;
pub mod cfg;
pub mod ir;
pub mod pass;
pub mod transforms;
pub mod utility;

use crate::pass::{
    PassEffect, PassOptions, ProcedureToProgramPassAdapter, ProgramPassManager,
    ProgramTransformPass,
};
use crate::transforms::{ProcedureWriterPass, SplitCommunicationPass, VerifyPass};

/// A helper function that handles "run these passes by name" in a way that
/// multiple tools can use.
///
/// This is not intended to be used for pre-determined pass pipelines, but is
/// useful for drivers that take a pass list from the user.
///
/// - `options.verify` inserts a verify pass before the pipeline and after every pass
/// - `options.print_after` prints every procedure to `stderr` after every pass
/// - `passes` is the list of pass names, any of `split-comm`, `verify`,
///   `print-stdout` and `print-stderr`
///
/// Panics on an unknown pass name.
pub fn run_passes(program: &mut ir::Program, options: &PassOptions, passes: &[&str]) -> PassEffect {
    let mut mpm = ProgramPassManager::new();

    if options.verify {
        mpm.add_pass(ProcedureToProgramPassAdapter::adapt(VerifyPass));
    }

    for pass in passes.iter().copied() {
        match pass {
            "split-comm" => mpm.add_pass(ProcedureToProgramPassAdapter::adapt(SplitCommunicationPass)),
            "verify" => mpm.add_pass(ProcedureToProgramPassAdapter::adapt(VerifyPass)),
            "print-stdout" => mpm.add_pass(ProcedureToProgramPassAdapter::adapt(
                ProcedureWriterPass::stdout(),
            )),
            "print-stderr" => mpm.add_pass(ProcedureToProgramPassAdapter::adapt(
                ProcedureWriterPass::stderr(),
            )),
            _ => panic!("unknown pass `{pass}`"),
        }

        if options.print_after {
            mpm.add_pass(ProcedureToProgramPassAdapter::adapt(
                ProcedureWriterPass::stderr(),
            ));
        }

        if options.verify {
            mpm.add_pass(ProcedureToProgramPassAdapter::adapt(VerifyPass));
        }
    }

    log::debug!(
        "running {} pass(es) over program `{}`",
        mpm.len(),
        program.name()
    );

    mpm.run(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IterKind, SymbolKind};
    use crate::cfg::BlockKind;
    use crate::ir::Program;

    fn program() -> Program {
        let mut program = Program::new("driver");
        let mut b = program.define_procedure("p");
        let g = b.symbol("G", SymbolKind::Graph);
        let n = b.symbol("n", SymbolKind::Node);
        let t = b.symbol("t", SymbolKind::Node);
        let op = b.opaque("t.x += 1");
        let inner = b.foreach(t, n, IterKind::InNbrs, op);
        let outer = b.foreach(n, g, IterKind::AllNodes, inner);

        let entry = b.create_block(BlockKind::Seq);
        let vertex = b.create_block(BlockKind::BeginVertex);
        let exit = b.create_block(BlockKind::Seq);

        b.add_sent(vertex, outer);
        b.link(entry, vertex);
        b.link(vertex, exit);
        b.set_entry(entry);
        b.define();

        program
    }

    fn options(verify: bool) -> PassOptions {
        PassOptions {
            verify,
            print_after: false,
        }
    }

    #[test]
    fn split_comm_by_name() {
        let mut program = program();
        let p = program.find_procedure_by_name("p").unwrap();

        assert_eq!(
            run_passes(&mut program, &options(true), &["split-comm"]),
            PassEffect::Modified
        );
        assert_eq!(program.procedure(p).backend_info().num_blocks(), 5);

        assert_eq!(
            run_passes(&mut program, &options(false), &["verify"]),
            PassEffect::Unchanged
        );
        assert_eq!(program.procedure(p).backend_info().num_blocks(), 5);
    }

    #[test]
    fn empty_pipeline_changes_nothing() {
        let mut program = program();

        assert_eq!(
            run_passes(&mut program, &options(false), &[]),
            PassEffect::Unchanged
        );
    }

    #[test]
    #[should_panic(expected = "unknown pass `mem2reg`")]
    fn unknown_pass_panics() {
        run_passes(&mut program(), &options(false), &["mem2reg"]);
    }
}
