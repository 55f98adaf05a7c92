//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Defines the pass infrastructure used by the backend.
//!
//! Passes at their core are just objects that take in a procedure (or a
//! whole program) and possibly change it:
//!
//! ```
//! # use garnet::ir::Procedure;
//! struct Pass { /* ... */ }
//!
//! impl Pass {
//!     fn run(&mut self, proc: &mut Procedure) { /* ... */ }
//! }
//! ```
//!
//! # Procedure vs. Program Passes
//! Most of the backend works on one procedure at a time, and implements
//! [`ProcedureTransformPass`]. Anything that needs to see every procedure
//! at once implements [`ProgramTransformPass`] instead, and
//! [`ProcedureToProgramPassAdapter`] turns the former into the latter.
//!
//! Every pass reports whether it changed anything through a [`PassEffect`].
//! Passes are allowed to keep state in `&mut self`, but they should act as-if
//! they were pure: running a pass over the same input should give the
//! same output.

mod manager;
mod options;
mod transform;

pub use manager::*;
pub use options::*;
pub use transform::*;
