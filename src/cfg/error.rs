//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::cfg::BlockId;
use thiserror::Error;

/// Errors from querying the edges of the block graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    /// Asked for the `index`-th predecessor of a block that has fewer than that.
    #[error("{block} has {len} entry edge(s), entry #{index} does not exist")]
    EntryOutOfRange {
        /// The block being queried.
        block: BlockId,
        /// The requested index.
        index: usize,
        /// How many entries the block actually has.
        len: usize,
    },
    /// Asked for the `index`-th successor of a block that has fewer than that.
    #[error("{block} has {len} exit edge(s), exit #{index} does not exist")]
    ExitOutOfRange {
        /// The block being queried.
        block: BlockId,
        /// The requested index.
        index: usize,
        /// How many exits the block actually has.
        len: usize,
    },
}
