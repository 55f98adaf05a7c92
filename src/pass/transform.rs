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

/// What a pass did to the code it ran over.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum PassEffect {
    /// Nothing was changed.
    Unchanged,
    /// Something (blocks, edges or annotations) was changed.
    Modified,
}

impl PassEffect {
    /// Combines the effects of two passes that ran one after the other.
    #[inline]
    pub fn merge(self, other: PassEffect) -> PassEffect {
        if self.is_modified() || other.is_modified() {
            PassEffect::Modified
        } else {
            PassEffect::Unchanged
        }
    }

    /// Checks if anything was changed.
    #[inline]
    pub fn is_modified(self) -> bool {
        self == PassEffect::Modified
    }
}

/// Models a pass that possibly transforms an entire program.
pub trait ProgramTransformPass {
    /// Performs the transformation over a given program.
    fn run(&mut self, program: &mut Program) -> PassEffect;
}

/// Models a pass that possibly transforms a single procedure.
pub trait ProcedureTransformPass {
    /// Performs the transformation over a given procedure.
    fn run(&mut self, proc: &mut Procedure) -> PassEffect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge() {
        use PassEffect::*;

        assert_eq!(Unchanged.merge(Unchanged), Unchanged);
        assert_eq!(Unchanged.merge(Modified), Modified);
        assert_eq!(Modified.merge(Unchanged), Modified);
        assert_eq!(Modified.merge(Modified), Modified);
    }
}
