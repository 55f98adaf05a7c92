//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::*;
use crate::cfg::{BackendInfo, Block, BlockKind};
use crate::ir::{Proc, Program, ProgramContext};

/// Helper type for building a procedure: its statement tree, its blocks, and
/// which statements live in which block.
///
/// Statements are built bottom-up, children before the statement that
/// contains them.
#[derive(Debug)]
pub struct ProcBuilder<'p> {
    program: &'p mut Program,
    proc: Proc,
    ast: Ast,
    backend: BackendInfo,
}

impl<'p> ProcBuilder<'p> {
    pub(in crate::ir) fn new(program: &'p mut Program, proc: Proc) -> Self {
        let backend = BackendInfo::new(program.context().block_ids());

        Self {
            program,
            proc,
            ast: Ast::default(),
            backend,
        }
    }

    /// Finishes defining the procedure and moves the body into the program.
    /// Until this is called, the procedure in the program stays empty.
    pub fn define(self) -> Proc {
        self.program
            .procedure_mut(self.proc)
            .replace_body(self.ast, self.backend);

        self.proc
    }

    /// Creates a symbol.
    pub fn symbol(&mut self, name: &str, kind: SymbolKind) -> Symbol {
        let name = self.program.insert_string(name);

        self.ast.create_symbol(name, kind)
    }

    /// Creates a `{ ... }` sequencing block.
    pub fn sent_block(&mut self, stmts: &[Stmt]) -> Stmt {
        self.ast.create_stmt(StmtData::Block(SentBlock::new(stmts)))
    }

    /// Creates `Foreach (iterator : source.iter) body`.
    pub fn foreach(&mut self, iterator: Symbol, source: Symbol, iter: IterKind, body: Stmt) -> Stmt {
        self.ast
            .create_stmt(StmtData::Foreach(ForeachStmt::new(iterator, source, iter, body)))
    }

    /// Creates `driver.property = rhs`.
    pub fn assign_field(&mut self, driver: Symbol, property: Symbol, rhs: &str) -> Stmt {
        let target = AssignTarget::Field(FieldAccess::new(driver, property));

        self.assign(target, rhs)
    }

    /// Creates `sym = rhs`.
    pub fn assign_scalar(&mut self, sym: Symbol, rhs: &str) -> Stmt {
        self.assign(AssignTarget::Scalar(sym), rhs)
    }

    /// Marks an assignment as a random write whose send is hosted by `sent_block`.
    ///
    /// Panics if `assign` is not an assignment.
    pub fn mark_random_write(&mut self, assign: Stmt, sent_block: Stmt) {
        self.ast
            .assign_mut(assign)
            .expect("only assignments can be random writes")
            .set_random_write_sent_block(sent_block);
    }

    /// Creates `If (cond) then Else otherwise`.
    pub fn if_stmt(&mut self, cond: &str, then: Stmt, otherwise: Option<Stmt>) -> Stmt {
        let cond = self.program.insert_string(cond);

        self.ast
            .create_stmt(StmtData::If(IfStmt::new(cond, then, otherwise)))
    }

    /// Creates `While (cond) body`.
    pub fn while_stmt(&mut self, cond: &str, body: Stmt) -> Stmt {
        let cond = self.program.insert_string(cond);

        self.ast.create_stmt(StmtData::While(WhileStmt::new(cond, body)))
    }

    /// Creates a statement the backend doesn't look into.
    pub fn opaque(&mut self, text: &str) -> Stmt {
        let text = self.program.insert_string(text);

        self.ast.create_stmt(StmtData::Opaque(text))
    }

    /// Sets the top-level statement of the procedure.
    pub fn set_body(&mut self, stmt: Stmt) {
        self.ast.set_body(stmt);
    }

    /// Creates a block and appends it to the end of the block list.
    pub fn create_block(&mut self, kind: BlockKind) -> Block {
        let block = self.backend.create_block(kind);

        self.backend.append_block(block);

        block
    }

    /// Appends a top-level statement to `block`.
    pub fn add_sent(&mut self, block: Block, stmt: Stmt) {
        self.backend.block_mut(block).add_sent(stmt);
    }

    /// Adds the edge `from -> to`.
    pub fn link(&mut self, from: Block, to: Block) {
        self.backend.add_exit(from, to);
    }

    /// Marks `block` as the entry block.
    pub fn set_entry(&mut self, block: Block) {
        self.backend.set_entry_block(block);
    }

    /// The statement tree built so far.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The blocks built so far.
    pub fn backend_info(&self) -> &BackendInfo {
        &self.backend
    }

    /// Gets the context of the program the procedure is being built in.
    pub fn ctx(&self) -> &ProgramContext {
        self.program.context()
    }

    /// Gets a [`Proc`] referring to the procedure being built.
    pub fn current_proc(&self) -> Proc {
        self.proc
    }

    fn assign(&mut self, target: AssignTarget, rhs: &str) -> Stmt {
        let rhs = self.program.insert_string(rhs);

        self.ast
            .create_stmt(StmtData::Assign(AssignStmt::new(target, rhs)))
    }
}
