//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

/// Options for building a pass pipeline with [`run_passes`](crate::run_passes).
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct PassOptions {
    /// Whether to verify every procedure before the pipeline and after each pass.
    ///
    /// Verification failures are compiler bugs, so they panic.
    pub verify: bool,
    /// Whether to print every procedure to `stderr` after each pass.
    pub print_after: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            verify: cfg!(debug_assertions),
            print_after: false,
        }
    }
}
