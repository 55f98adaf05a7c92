//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::{ArenaMap, Keys};
use crate::cfg::BlockIdIssuer;
use crate::ir::{Proc, ProcBuilder, Procedure};
use crate::utility::{SaHashMap, Str, StringPool};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Models shared ownership of the state that is shared between all procedures
/// in a program.
///
/// This is the string pool that symbol names and opaque statements are stored in,
/// and the counter that hands out block ids. Both need to be program-wide, and
/// different procedures may be transformed at the same time, so this is an
/// [`Arc`] to an [`RwLock`]ed [`StringPool`] and a [`BlockIdIssuer`].
#[derive(Debug, Clone)]
pub struct ProgramContext {
    strings: Arc<RwLock<StringPool>>,
    block_ids: BlockIdIssuer,
}

impl ProgramContext {
    fn new(pool: StringPool) -> Self {
        Self {
            strings: Arc::new(RwLock::new(pool)),
            block_ids: BlockIdIssuer::new(),
        }
    }

    /// Returns a guard that allows the string pool to be read.
    pub fn strings(&self) -> RwLockReadGuard<'_, StringPool> {
        self.strings.read().expect("lock was poisoned")
    }

    /// Returns a guard that allows the string pool to be written to.
    ///
    /// Hold this for as short as possible, any thread trying to read a name
    /// stalls until it's dropped.
    pub fn strings_mut(&self) -> RwLockWriteGuard<'_, StringPool> {
        self.strings.write().expect("lock was poisoned")
    }

    /// Gets a handle to the program-wide block id counter.
    pub fn block_ids(&self) -> BlockIdIssuer {
        self.block_ids.clone()
    }
}

/// A whole program: a set of procedures that share one [`ProgramContext`].
#[derive(Debug, Clone)]
pub struct Program {
    name_ref: Str,
    context: ProgramContext,
    procedures: ArenaMap<Proc, Procedure>,
    names: SaHashMap<String, Proc>,
}

impl Program {
    /// Creates an empty program with a given name.
    pub fn new(name: &str) -> Self {
        let mut pool = StringPool::default();
        let name_ref = pool.insert(name);

        Self {
            name_ref,
            context: ProgramContext::new(pool),
            procedures: ArenaMap::default(),
            names: SaHashMap::default(),
        }
    }

    /// Gets the name of the program.
    pub fn name(&self) -> String {
        self.context.strings()[self.name_ref].to_owned()
    }

    /// Resolves a [`Proc`].
    pub fn procedure(&self, proc: Proc) -> &Procedure {
        &self.procedures[proc]
    }

    /// Resolves a [`Proc`].
    pub fn procedure_mut(&mut self, proc: Proc) -> &mut Procedure {
        &mut self.procedures[proc]
    }

    /// Finds a procedure with a given name.
    pub fn find_procedure_by_name(&self, name: &str) -> Option<Proc> {
        self.names.get(name).copied()
    }

    /// Declares an empty procedure and returns a builder for its body. The
    /// procedure is only filled in once [`ProcBuilder::define`] is called.
    pub fn define_procedure(&mut self, name: &str) -> ProcBuilder<'_> {
        debug_assert!(self.find_procedure_by_name(name).is_none());

        let name = name.to_owned();
        let new = Procedure::new(name.clone(), self.procedures.next_key(), self.context.clone());
        let proc = self.procedures.insert(new);

        self.names.insert(name, proc);

        ProcBuilder::new(self, proc)
    }

    /// Iterates over every procedure in the program, in definition order.
    ///
    /// This does not borrow the program, so procedures can be mutated while iterating.
    pub fn procedures(&self) -> Keys<Proc> {
        self.procedures.keys()
    }

    /// Gets the [`ProgramContext`] owned by this program. This can be cloned as necessary.
    pub fn context(&self) -> &ProgramContext {
        &self.context
    }

    /// Inserts a string into the program's pool.
    pub fn insert_string(&self, string: &str) -> Str {
        self.context.strings_mut().insert(string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::BlockKind;

    #[test]
    fn procedures_by_name() {
        let mut program = Program::new("prog");
        let a = program.define_procedure("a").define();
        let b = program.define_procedure("b").define();

        assert_eq!(program.name(), "prog");
        assert_eq!(program.find_procedure_by_name("a"), Some(a));
        assert_eq!(program.find_procedure_by_name("b"), Some(b));
        assert_eq!(program.find_procedure_by_name("c"), None);
        assert_eq!(program.procedure(b).name(), "b");
        assert_eq!(program.procedures().collect::<Vec<_>>(), [a, b]);
    }

    #[test]
    fn block_ids_are_program_wide() {
        let mut program = Program::new("prog");

        let mut first = program.define_procedure("first");
        let x = first.create_block(BlockKind::Seq);
        let a = first.define();

        let mut second = program.define_procedure("second");
        let y = second.create_block(BlockKind::Seq);
        let b = second.define();

        let x = program.procedure(a).backend_info().block(x).id();
        let y = program.procedure(b).backend_info().block(y).id();

        assert_ne!(x, y);
    }

    #[test]
    fn strings_are_shared() {
        let program = Program::new("prog");
        let s = program.insert_string("dist");

        assert_eq!(program.insert_string("dist"), s);
        assert_eq!(&program.context().strings()[s], "dist");
    }
}
