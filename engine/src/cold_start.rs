// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use controller::Controller;

/// Whether a user with `rated` movies is still too new to be compared
pub fn is_cold(rated: usize, threshold: usize) -> bool {
    rated <= threshold
}

/// The same unpersonalized head of the catalog for everyone
pub fn fallback<C>(controller: &C, size: usize) -> Result<Vec<C::Movie>, Error>
where
    C: Controller,
{
    controller.movies(size)
}
