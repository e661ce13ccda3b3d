// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// The ways in which building or using an `RmqTree` can fail.
///
/// All of these are caller errors: nothing is retried and no node is modified when one is
/// returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// The tree was built from zero key/value pairs.
    #[error("no key/value pairs to build the tree from")]
    EmptyInput,

    /// The same key appeared more than once in the input.
    #[error("duplicate key in the key/value pairs")]
    DuplicateKey,

    /// A key passed to `update` or `range_minimum` is not in the tree.
    #[error("key is not in the tree")]
    KeyNotFound,

    /// `range_minimum` was called with a left key greater than the right key.
    #[error("range is descending: left key is greater than right key")]
    InvalidRange,
}
