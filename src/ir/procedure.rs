//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ast::Ast;
use crate::cfg::BackendInfo;
use crate::dense_arena_key;
use crate::ir::ProgramContext;

dense_arena_key! {
    /// The reference type for a [`Procedure`]. These are looked up
    /// at the [`Program`](crate::ir::Program) level.
    pub struct Proc;
}

/// A single procedure: its statement tree, and the backend's view of it.
#[derive(Debug, Clone)]
pub struct Procedure {
    name: String,
    proc: Proc,
    context: ProgramContext,
    ast: Ast,
    backend: BackendInfo,
}

impl Procedure {
    /// Creates an empty procedure. Its blocks get their ids from `ctx`.
    pub fn new(name: String, proc: Proc, ctx: ProgramContext) -> Self {
        let backend = BackendInfo::new(ctx.block_ids());

        Self {
            name,
            proc,
            context: ctx,
            ast: Ast::default(),
            backend,
        }
    }

    /// Gets the name of the procedure.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a [`Proc`] that refers to `self`.
    #[inline]
    pub fn proc(&self) -> Proc {
        self.proc
    }

    /// Gets the context of the program containing this procedure.
    #[inline]
    pub fn ctx(&self) -> &ProgramContext {
        &self.context
    }

    /// The statement tree.
    #[inline]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The statement tree.
    #[inline]
    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// The blocks and communication units.
    #[inline]
    pub fn backend_info(&self) -> &BackendInfo {
        &self.backend
    }

    /// The blocks and communication units.
    #[inline]
    pub fn backend_info_mut(&mut self) -> &mut BackendInfo {
        &mut self.backend
    }

    /// Borrows the statement tree and the backend state at the same time,
    /// for analyses that annotate one while walking the other.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut Ast, &mut BackendInfo) {
        (&mut self.ast, &mut self.backend)
    }

    pub(in crate::ir) fn replace_body(&mut self, ast: Ast, backend: BackendInfo) {
        self.ast = ast;
        self.backend = backend;
    }
}
