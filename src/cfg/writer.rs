//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaKey;
use crate::ast::Stmt;
use crate::cfg::{BackendInfo, Block, CommUnit};
use crate::ir::{Procedure, Program};
use crate::utility::StringPool;
use std::fmt::Write;

/// Turns the block graph of a procedure into text, one line per block in
/// block-list order, with the statements and receivers of each block below it.
///
/// ```other
/// procedure sssp (entry bb0) {
///   bb0 seq -> bb1
///   bb1 begin-vertex <- bb0 -> bb2
///     sent s4 foreach
///     recv nested s2 comm#0
///   bb2 seq <- bb1
/// }
/// ```
pub fn stringify_procedure(proc: &Procedure) -> String {
    let strings = proc.ctx().strings();
    let mut writer = WriterImpl {
        proc,
        strings: &strings,
        out: String::default(),
    };

    writer.procedure();

    writer.out
}

/// Stringifies every procedure of a program, separated by blank lines.
pub fn stringify_program(program: &Program) -> String {
    program
        .procedures()
        .map(|p| stringify_procedure(program.procedure(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

struct WriterImpl<'p> {
    proc: &'p Procedure,
    strings: &'p StringPool,
    out: String,
}

impl<'p> WriterImpl<'p> {
    fn info(&self) -> &'p BackendInfo {
        self.proc.backend_info()
    }

    fn name(&self, block: Block) -> String {
        self.info().block(block).id().to_string()
    }

    fn names(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|bb| self.name(*bb))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn stmt(&self, stmt: Stmt) -> String {
        format!("s{}", stmt.key_index())
    }

    fn procedure(&mut self) {
        let entry = match self.info().entry_block() {
            Some(bb) => self.name(bb),
            None => "none".to_owned(),
        };

        // writing into a `String` cannot fail
        let _ = writeln!(self.out, "procedure {} (entry {entry}) {{", self.proc.name());

        for block in self.info().blocks() {
            self.block(block);
        }

        self.out += "}\n";
    }

    fn block(&mut self, block: Block) {
        let info = self.info();
        let bb = info.block(block);

        let _ = write!(self.out, "  {} {}", self.name(block), bb.kind().name());

        if bb.is_after_vertex() {
            self.out += " after-vertex";
        }

        if !bb.entries().is_empty() {
            let _ = write!(self.out, " <- {}", self.names(bb.entries()));
        }

        if !bb.exits().is_empty() {
            let _ = write!(self.out, " -> {}", self.names(bb.exits()));
        }

        self.out += "\n";

        for stmt in bb.sents() {
            let kind = self.proc.ast().stmt(*stmt).kind_name();

            let _ = writeln!(self.out, "    sent {} {kind}", self.stmt(*stmt));
        }

        for unit in bb.receivers() {
            self.receiver(*unit);
        }
    }

    fn receiver(&mut self, unit: CommUnit) {
        let comm = match self.info().registry().comm_id(unit) {
            Some(id) => format!("comm#{}", id.key_index()),
            None => "unregistered".to_owned(),
        };

        let _ = match unit {
            CommUnit::Nested { foreach } => {
                writeln!(self.out, "    recv nested {} {comm}", self.stmt(foreach))
            }
            CommUnit::RandomWrite { sent_block, symbol } => {
                let name = &self.strings[self.proc.ast().symbol(symbol).name()];

                writeln!(
                    self.out,
                    "    recv random-write {} to {name} {comm}",
                    self.stmt(sent_block)
                )
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IterKind, SymbolKind};
    use crate::cfg::BlockKind;

    #[test]
    fn writes_blocks_in_layout_order() {
        let mut program = Program::new("writer");
        let mut b = program.define_procedure("p");

        let g = b.symbol("G", SymbolKind::Graph);
        let n = b.symbol("n", SymbolKind::Node);
        let t = b.symbol("t", SymbolKind::Node);
        let op = b.opaque("t.x += 1");
        let inner = b.foreach(t, n, IterKind::OutNbrs, op);
        let outer = b.foreach(n, g, IterKind::AllNodes, inner);

        let entry = b.create_block(BlockKind::Seq);
        let vertex = b.create_block(BlockKind::BeginVertex);
        let exit = b.create_block(BlockKind::Seq);

        b.add_sent(vertex, outer);
        b.link(entry, vertex);
        b.link(vertex, exit);
        b.set_entry(entry);

        let proc = b.define();
        let p = program.procedure_mut(proc);

        p.backend_info_mut()
            .registry_mut()
            .add_communication_unit_nested(inner);
        p.backend_info_mut().block_mut(vertex).add_nested_receiver(inner);
        p.backend_info_mut().block_mut(exit).set_after_vertex(true);

        let expected = format!(
            "procedure p (entry bb0) {{\n  bb0 seq -> bb1\n  bb1 begin-vertex <- bb0 -> bb2\n    sent s{} foreach\n    recv nested s{} comm#0\n  bb2 seq after-vertex <- bb1\n}}\n",
            outer.key_index(),
            inner.key_index(),
        );

        assert_eq!(stringify_procedure(p), expected);
    }

    #[test]
    fn empty_procedure() {
        let mut program = Program::new("writer");
        let proc = program.define_procedure("empty").define();

        assert_eq!(
            stringify_procedure(program.procedure(proc)),
            "procedure empty (entry none) {\n}\n"
        );
    }
}
