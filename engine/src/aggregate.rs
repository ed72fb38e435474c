// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::{cmp::Ordering, collections::HashMap, hash::Hash};

#[derive(Debug, Clone)]
struct Weighted<K> {
    movie: K,
    total: f64,
    sim_sum: f64,
}

/// Similarity-weighted average of reference scores, per movie.
///
/// Movies are remembered in the order they were first added, ties in the
/// final ranking depend on it.
#[derive(Debug, Clone)]
pub struct Aggregation<K> {
    positions: HashMap<K, usize>,
    weighted: Vec<Weighted<K>>,
}

impl<K> Default for Aggregation<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            weighted: Vec::new(),
        }
    }
}

impl<K> Aggregation<K>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, movie: K, rating: f64, sim: f64) {
        let weighted = &mut self.weighted;
        let pos = *self.positions.entry(movie.clone()).or_insert_with(|| {
            weighted.push(Weighted {
                movie,
                total: 0.,
                sim_sum: 0.,
            });

            weighted.len() - 1
        });

        self.weighted[pos].total += rating * sim;
        self.weighted[pos].sim_sum += sim;
    }

    pub fn len(&self) -> usize {
        self.weighted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weighted.is_empty()
    }

    /// Normalized scores from best to worst. Equal scores come out in the
    /// reverse order their movies were discovered.
    pub fn into_ranking(self) -> Vec<(K, f64)> {
        let mut ranking: Vec<_> = self
            .weighted
            .into_iter()
            .map(|w| (w.movie, w.total / w.sim_sum))
            .collect();

        ranking.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        ranking.reverse();
        ranking
    }
}
