//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

//! The backend's flow graph of basic blocks.
//!
//! Every procedure owns a [`BackendInfo`], which holds its [`BasicBlock`]s, the
//! order they are emitted in, and the communication units that code generation
//! will need message tags for. Sequential blocks run on the master, vertex
//! blocks run once per vertex, and messages sent in one vertex block can only
//! be received in the next one.

mod backend_info;
mod block;
mod comm;
mod error;
mod walk;
mod writer;

pub use backend_info::*;
pub use block::*;
pub use comm::*;
pub use error::*;
pub use walk::*;
pub use writer::*;
