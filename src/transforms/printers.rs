//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::cfg;
use crate::ir::{Procedure, Program};
use crate::pass::{PassEffect, ProcedureTransformPass, ProgramTransformPass};
use std::io;

/// This is a pass that writes out a textual representation of the block
/// graph of each procedure it runs over to a given stream.
pub struct ProcedureWriterPass {
    out: Box<dyn io::Write>,
}

impl ProcedureWriterPass {
    /// Shorthand for a writer that prints to [`std::io::stdout`].
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Shorthand for a writer that prints to [`std::io::stderr`].
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Creates an instance of the pass with a given writer.
    ///
    /// This writer will be where each procedure is printed out when the
    /// pass is run.
    pub fn with_writer<T: io::Write + 'static>(writer: T) -> Self {
        Self {
            out: Box::new(writer),
        }
    }
}

impl ProcedureTransformPass for ProcedureWriterPass {
    fn run(&mut self, proc: &mut Procedure) -> PassEffect {
        self.out
            .write_all(cfg::stringify_procedure(proc).as_bytes())
            .expect("unable to write procedure to writer");

        PassEffect::Unchanged
    }
}

/// Writes out every procedure in a program, in definition order.
pub struct ProgramWriterPass {
    out: Box<dyn io::Write>,
}

impl ProgramWriterPass {
    /// Shorthand for a writer that prints to [`std::io::stdout`].
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Shorthand for a writer that prints to [`std::io::stderr`].
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Creates an instance of the pass with a given writer.
    pub fn with_writer<T: io::Write + 'static>(writer: T) -> Self {
        Self {
            out: Box::new(writer),
        }
    }
}

impl ProgramTransformPass for ProgramWriterPass {
    fn run(&mut self, program: &mut Program) -> PassEffect {
        self.out
            .write_all(cfg::stringify_program(program).as_bytes())
            .expect("unable to write program to writer");

        PassEffect::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::BlockKind;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);

            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn program() -> Program {
        let mut program = Program::new("printers");

        for name in ["first", "second"] {
            let mut b = program.define_procedure(name);
            let bb = b.create_block(BlockKind::Seq);

            b.set_entry(bb);
            b.define();
        }

        program
    }

    #[test]
    fn procedure_writer_matches_stringify() {
        let mut program = program();
        let buf = SharedBuffer::default();
        let mut pass = ProcedureWriterPass::with_writer(buf.clone());
        let first = program.find_procedure_by_name("first").unwrap();
        let proc = program.procedure_mut(first);

        assert_eq!(pass.run(proc), PassEffect::Unchanged);
        assert_eq!(buf.contents(), cfg::stringify_procedure(proc));
    }

    #[test]
    fn program_writer_writes_every_procedure() {
        let mut program = program();
        let buf = SharedBuffer::default();
        let mut pass = ProgramWriterPass::with_writer(buf.clone());

        assert_eq!(pass.run(&mut program), PassEffect::Unchanged);

        let out = buf.contents();

        assert_eq!(out, cfg::stringify_program(&program));
        assert!(out.find("procedure first").unwrap() < out.find("procedure second").unwrap());
    }
}
