//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Utility code shared by the AST, the CFG and the passes.
//!
//! This is the general catch-all for small helpers that don't belong anywhere else.

mod hash;
mod packed_option;
mod string_pool;

pub use hash::*;
pub use packed_option::*;
pub use string_pool::*;
