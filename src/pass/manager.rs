//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::{Procedure, Program};
use crate::pass::*;

/// Manages running a set of passes over a whole program.
///
/// An important note is that this is actually a program pass itself, it's a pass
/// that simply runs other passes.
#[derive(Default)]
pub struct ProgramPassManager {
    passes: Vec<Box<dyn ProgramTransformPass>>,
}

impl ProgramPassManager {
    /// Creates a new, empty, program pass manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pass to the end of the pipeline.
    pub fn add_pass<T: ProgramTransformPass + 'static>(&mut self, pass: T) {
        self.passes.push(Box::new(pass));
    }

    /// Gets the number of passes in the pipeline.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Checks if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl ProgramTransformPass for ProgramPassManager {
    fn run(&mut self, program: &mut Program) -> PassEffect {
        self.passes
            .iter_mut()
            .fold(PassEffect::Unchanged, |effect, pass| effect.merge(pass.run(program)))
    }
}

/// Manages running a set of passes over individual procedures.
#[derive(Default)]
pub struct ProcedurePassManager {
    passes: Vec<Box<dyn ProcedureTransformPass>>,
}

impl ProcedurePassManager {
    /// Creates a new, empty, procedure pass manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pass to the end of the pipeline.
    pub fn add_pass<T: ProcedureTransformPass + 'static>(&mut self, pass: T) {
        self.passes.push(Box::new(pass));
    }
}

impl ProcedureTransformPass for ProcedurePassManager {
    fn run(&mut self, proc: &mut Procedure) -> PassEffect {
        self.passes
            .iter_mut()
            .fold(PassEffect::Unchanged, |effect, pass| effect.merge(pass.run(proc)))
    }
}

/// Adapts a procedure pass to a program pass that runs it over every
/// procedure in the program, in definition order.
pub struct ProcedureToProgramPassAdapter {
    pass: Box<dyn ProcedureTransformPass + 'static>,
}

impl ProcedureToProgramPassAdapter {
    /// Adapts a given pass into a [`ProcedureToProgramPassAdapter`].
    pub fn adapt<T: ProcedureTransformPass + 'static>(pass: T) -> Self {
        Self {
            pass: Box::new(pass),
        }
    }
}

impl ProgramTransformPass for ProcedureToProgramPassAdapter {
    fn run(&mut self, program: &mut Program) -> PassEffect {
        let mut effect = PassEffect::Unchanged;

        for proc in program.procedures() {
            effect = effect.merge(self.pass.run(program.procedure_mut(proc)));
        }

        effect
    }
}
