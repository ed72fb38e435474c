// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use num_traits::float::Float;
use std::{collections::HashSet, hash::Hash, ops::AddAssign};

/// Directional compatibility between an active user and a reference user,
/// given the (active, reference) scores of the movies both rated.
///
/// It's `1 / (1 + Σ(a - r)²)`, so identical scores give exactly one and the
/// value decays towards zero as they disagree. Note that an empty sequence
/// also gives one, callers are expected to check for shared movies first.
pub fn compatibility<V, I>(pairs: I) -> V
where
    I: IntoIterator<Item = (V, V)>,
    V: Float + AddAssign,
{
    let mut sum_of_squares = V::zero();
    for (active, reference) in pairs {
        sum_of_squares += (active - reference).powi(2);
    }

    V::one() / (V::one() + sum_of_squares)
}

/// Movies in `target` that are also in `reference`, compared by id and kept
/// in `target` order
pub fn shared_movies<'a, K>(target: &'a [K], reference: &HashSet<K>) -> Vec<&'a K>
where
    K: Hash + Eq,
{
    target
        .iter()
        .filter(|movie| reference.contains(movie))
        .collect()
}
