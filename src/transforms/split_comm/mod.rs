//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Splits vertex blocks around the messages they exchange.
//!
//! In the vertex-centric model a message sent during one superstep is only
//! visible during the next one. A vertex block that both sends (an inner
//! neighbor loop, or a random write) and then needs the messages received
//! therefore has to become two vertex blocks with a sequential block between
//! them, which is what this pass does:
//!
//! 1. [`find_communication`] walks the vertex blocks, tags the loops, registers
//!    the communication units and queues the receivers.
//! 2. [`split_vertex_block`] rewires every block that ended up with receivers.

mod detect;
mod error;
mod split;

pub use detect::*;
pub use error::*;
pub use split::*;

use crate::ir::Procedure;
use crate::pass::{PassEffect, ProcedureTransformPass};
use log::debug;

/// Detects the communication in a procedure and splits every vertex block
/// that communicates, in the order the blocks were found.
///
/// A procedure without an entry block is left alone. Returns the blocks created
/// by each split. Errors are broken invariants from an earlier stage, and stop
/// the pass at the first one.
pub fn split_communication(proc: &mut Procedure) -> Result<Vec<SplitBlocks>, CommError> {
    let (ast, info) = proc.parts_mut();

    if info.entry_block().is_none() {
        return Ok(Vec::new());
    }

    let targets = find_communication(ast, info)?;

    debug!(
        "found {} communicating vertex block(s) in `{}`",
        targets.len(),
        proc.name()
    );

    let info = proc.backend_info_mut();

    targets
        .iter()
        .map(|block| split_vertex_block(info, block))
        .collect()
}

/// Runs [`split_communication`] over each procedure.
///
/// Panics with the broken invariant if the procedure violates any of the
/// requirements of the pass.
pub struct SplitCommunicationPass;

impl ProcedureTransformPass for SplitCommunicationPass {
    fn run(&mut self, proc: &mut Procedure) -> PassEffect {
        match split_communication(proc) {
            Ok(splits) if splits.is_empty() => PassEffect::Unchanged,
            Ok(_) => PassEffect::Modified,
            Err(e) => panic!("internal compiler error in `{}`: {e}", proc.name()),
        }
    }
}
