//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! Defines the "transform" passes of the backend.
//!
//! These are the passes that can (potentially) modify a procedure, and don't
//! actually logically yield a result.
//!
//! Some of these "transforms" are not actually transformations (e.g.
//! the verify pass is a "transform pass" even though it changes nothing),
//! but the communication splitter is the one that does the real work.

mod printers;
mod split_comm;
mod verify;

pub use printers::*;
pub use split_comm::*;
pub use verify::*;
