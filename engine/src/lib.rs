// Copyright (C) 2020 Kevin Del Castillo Ramírez
//
// This file is part of recommendation-system.
//
// recommendation-system is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// recommendation-system is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with recommendation-system.  If not, see <http://www.gnu.org/licenses/>.

pub mod aggregate;
pub mod cold_start;
pub mod error;
pub mod similarity;

use crate::{aggregate::Aggregation, error::ErrorKind, similarity::compatibility};
use anyhow::Error;
use config::EngineConfig;
use controller::{Controller, Entity};
use std::{collections::HashSet, fmt::Display, hash::Hash};

type UserId<C> = <<C as Controller>::ActiveUser as Entity>::Id;
type MovieId<C> = <<C as Controller>::Movie as Entity>::Id;

/// Weighted nearest-neighbour recommendations for active users, using the
/// reference population as the neighbourhood.
///
/// Nothing is cached, every call reads what it needs through the controller
/// again, so the cost is about `reference users × rated movies` lookups.
pub struct Engine<'a, C>
where
    C: Controller,
{
    controller: &'a C,
    config: EngineConfig,
}

impl<'a, C> Engine<'a, C>
where
    C: Controller,
    UserId<C>: Hash + Eq + Clone + Display,
    MovieId<C>: Hash + Eq + Clone + Display,
{
    pub fn with_controller(controller: &'a C) -> Self {
        Self {
            controller,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(controller: &'a C, config: EngineConfig) -> Result<Self, Error> {
        let threshold = config.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ErrorKind::InvalidSimilarityThreshold(threshold).into());
        }

        if config.max_recommendations == Some(0) {
            return Err(ErrorKind::EmptyRecommendationCap.into());
        }

        Ok(Self { controller, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// How compatible `reference` is with `target`, in `(0, 1]`, or exactly
    /// zero when they have no rated movie in common. Not symmetric: target
    /// scores always come from the active ratings and reference scores from
    /// the reference ratings.
    pub fn similarity(
        &self,
        target: &C::ActiveUser,
        reference: &C::ReferenceUser,
    ) -> Result<f64, Error> {
        let target_movies = self.controller.active_rated_movies(target)?;
        let reference_movies = self
            .controller
            .reference_rated_movies(reference)?
            .into_iter()
            .collect();

        self.compare(
            &target.get_id(),
            &target_movies,
            &reference.get_id(),
            &reference_movies,
        )
    }

    fn compare(
        &self,
        target_id: &UserId<C>,
        target_movies: &[MovieId<C>],
        reference_id: &UserId<C>,
        reference_movies: &HashSet<MovieId<C>>,
    ) -> Result<f64, Error> {
        let shared = similarity::shared_movies(target_movies, reference_movies);
        if shared.is_empty() {
            return Ok(0.);
        }

        let mut pairs = Vec::with_capacity(shared.len());
        for movie in shared {
            let active = self.controller.active_rating(target_id, movie)?;
            let reference = self.controller.reference_rating(reference_id, movie)?;

            // Missing scores don't count as agreement nor disagreement
            if let (Some(active), Some(reference)) = (active, reference) {
                pairs.push((active, reference));
            }
        }

        Ok(compatibility(pairs))
    }

    /// Predicted scores for the movies `target` hasn't rated, best first.
    /// This is the personalized path only, cold users aren't special cased.
    pub fn ranking(
        &self,
        target: &C::ActiveUser,
        reference_users: &[C::ReferenceUser],
    ) -> Result<Vec<(MovieId<C>, f64)>, Error> {
        let target_movies = self.controller.active_rated_movies(target)?;
        let mut ranking = self.rank(target, &target_movies, reference_users)?;

        if let Some(max) = self.config.max_recommendations {
            ranking.truncate(max);
        }

        Ok(ranking)
    }

    fn rank(
        &self,
        target: &C::ActiveUser,
        target_movies: &[MovieId<C>],
        reference_users: &[C::ReferenceUser],
    ) -> Result<Vec<(MovieId<C>, f64)>, Error> {
        let target_id = target.get_id();
        let seen: HashSet<_> = target_movies.iter().cloned().collect();
        let mut aggregation = Aggregation::new();

        for other in reference_users {
            let other_id = other.get_id();
            if other_id == target_id {
                continue;
            }

            let other_movies = self.controller.reference_rated_movies(other)?;
            let other_set = other_movies.iter().cloned().collect();

            let sim = self.compare(&target_id, target_movies, &other_id, &other_set)?;
            if sim <= self.config.similarity_threshold {
                log::trace!("Ignoring reference user({}), similarity {}", other_id, sim);
                continue;
            }

            log::trace!("Reference user({}) contributes, similarity {}", other_id, sim);
            for movie in other_movies {
                if seen.contains(&movie) {
                    continue;
                }

                if let Some(rating) = self.controller.reference_rating(&other_id, &movie)? {
                    aggregation.add(movie, rating, sim);
                }
            }
        }

        log::debug!(
            "Scored {} candidate movies for user({}) against {} reference users",
            aggregation.len(),
            target_id,
            reference_users.len()
        );

        Ok(aggregation.into_ranking())
    }

    /// Movies to recommend to `target`, best first. Users with too few
    /// ratings get the head of the catalog instead.
    pub fn predict(
        &self,
        target: &C::ActiveUser,
        reference_users: &[C::ReferenceUser],
    ) -> Result<Vec<C::Movie>, Error> {
        let target_movies = self.controller.active_rated_movies(target)?;

        if cold_start::is_cold(target_movies.len(), self.config.cold_start_threshold) {
            log::debug!(
                "User({}) has only {} rated movies, using the fallback catalog",
                target.get_id(),
                target_movies.len()
            );

            return cold_start::fallback(self.controller, self.config.cold_start_size);
        }

        let ranking = self.rank(target, &target_movies, reference_users)?;
        let max = self.config.max_recommendations.unwrap_or(usize::MAX);

        let mut movies = Vec::new();
        for (movie_id, _) in ranking {
            if movies.len() >= max {
                break;
            }

            match self.controller.movie(&movie_id)? {
                Some(movie) => movies.push(movie),
                None => log::warn!("Skipping unknown movie({})", movie_id),
            }
        }

        Ok(movies)
    }

    /// Predict against the configured sample of the reference population
    pub fn recommend(&self, target: &C::ActiveUser) -> Result<Vec<C::Movie>, Error> {
        let reference_users = self
            .controller
            .reference_users(self.config.reference_sample_size)?;

        self.predict(target, &reference_users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::*;
    use movie_store::{
        models::{
            movies::Movie,
            users::{ActiveUser, ReferenceUser},
        },
        MovieStoreController,
    };

    // Movies 1..=12, the target user rated 1..=`rated` with a 4
    fn store(rated: i32) -> Result<(MovieStoreController, ActiveUser), Error> {
        let controller = MovieStoreController::in_memory()?;
        for id in 1..=12 {
            controller.insert_movie(id, &format!("Movie {}", id))?;
        }

        let target = controller.insert_active_user("target")?;
        for movie_id in 1..=rated {
            controller.insert_rating(&target.id, &movie_id, 4.)?;
        }

        Ok((controller, target))
    }

    fn seed(
        controller: &MovieStoreController,
        user_id: i32,
        ratings: &[(i32, f64)],
    ) -> Result<(), Error> {
        for (movie_id, score) in ratings {
            controller.insert_reference_rating(user_id, *movie_id, *score)?;
        }

        Ok(())
    }

    fn ids(movies: &[Movie]) -> Vec<i32> {
        movies.iter().map(|movie| movie.id).collect()
    }

    #[test]
    fn cold_users_get_catalog_head() -> Result<(), Error> {
        for rated in &[0, 3, 7] {
            let (controller, target) = store(*rated)?;
            seed(&controller, 20, &[(1, 4.), (9, 5.), (10, 5.)])?;

            let engine = Engine::with_controller(&controller);
            let references = controller.reference_users(16)?;

            let head: Vec<_> = (1..=8).collect();

            assert_eq!(ids(&engine.predict(&target, &references)?), head);
            assert_eq!(ids(&engine.predict(&target, &[])?), head);
        }

        Ok(())
    }

    #[test]
    fn no_shared_movies_means_zero_similarity() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(9, 4.), (10, 1.)])?;

        let engine = Engine::with_controller(&controller);
        let reference = &controller.reference_users(1)?[0];

        assert_eq!(engine.similarity(&target, reference)?, 0.);
        Ok(())
    }

    #[test]
    fn similarity_over_shared_movies() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 4.), (2, 4.), (9, 1.)])?;
        seed(&controller, 21, &[(1, 3.5), (11, 2.)])?;
        seed(&controller, 22, &[(1, 3.), (2, 5.), (3, 2.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(3)?;

        assert_approx_eq!(engine.similarity(&target, &references[0])?, 1.);
        assert_approx_eq!(engine.similarity(&target, &references[1])?, 0.8);
        assert_approx_eq!(engine.similarity(&target, &references[2])?, 1. / 7.);

        Ok(())
    }

    #[test]
    fn weighted_prediction() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        // similarity 0.8
        seed(&controller, 20, &[(1, 3.5), (9, 5.)])?;
        // similarity 2/3
        seed(&controller, 21, &[(1, 3.5), (2, 3.5), (9, 3.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(16)?;
        let ranking = engine.ranking(&target, &references)?;

        let (sim_a, sim_b) = (0.8, 2. / 3.);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].0, 9);
        assert_approx_eq!(ranking[0].1, (5. * sim_a + 3. * sim_b) / (sim_a + sim_b));

        assert_eq!(ids(&engine.predict(&target, &references)?), vec![9]);
        Ok(())
    }

    #[test]
    fn dissimilar_users_contribute_nothing() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 3.5), (9, 5.), (10, 2.)])?;
        // similarity exactly 0.5, still discarded
        seed(&controller, 21, &[(1, 3.), (9, 1.), (11, 5.)])?;
        seed(&controller, 22, &[(1, 0.), (12, 5.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(16)?;
        let with_all = engine.ranking(&target, &references)?;
        let alone = engine.ranking(&target, &references[..1])?;

        assert_eq!(with_all, alone);
        assert_eq!(
            with_all.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![9, 10]
        );

        Ok(())
    }

    #[test]
    fn rated_movies_are_never_recommended() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 4.), (2, 4.5), (3, 3.5), (9, 2.), (12, 1.)])?;
        seed(&controller, 21, &[(5, 4.), (10, 3.), (6, 5.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(16)?;
        let recommended = ids(&engine.predict(&target, &references)?);

        assert!(!recommended.is_empty());
        assert!(recommended.iter().all(|id| *id > 8));

        Ok(())
    }

    #[test]
    fn ranking_is_non_increasing_and_ties_favor_later_movies() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 4.), (10, 3.), (11, 3.), (9, 4.5)])?;
        seed(&controller, 21, &[(2, 4.), (12, 1.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(16)?;
        let ranking = engine.ranking(&target, &references)?;

        for pair in ranking.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }

        let ranked: Vec<_> = ranking.iter().map(|(id, _)| *id).collect();
        assert_eq!(ranked, vec![9, 11, 10, 12]);

        Ok(())
    }

    #[test]
    fn empty_population_gives_nothing() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        let engine = Engine::with_controller(&controller);

        assert!(engine.predict(&target, &[])?.is_empty());
        assert!(engine.recommend(&target)?.is_empty());

        Ok(())
    }

    #[test]
    fn reference_user_sharing_target_id_is_skipped() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, target.id, &[(1, 4.), (12, 5.)])?;

        let engine = Engine::with_controller(&controller);
        let references = controller.reference_users(16)?;

        assert_eq!(references[0].id, target.id);
        assert!(engine.predict(&target, &references)?.is_empty());

        Ok(())
    }

    #[test]
    fn recommendations_can_be_capped() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 4.), (9, 2.), (10, 5.), (11, 3.)])?;

        let config = EngineConfig {
            max_recommendations: Some(2),
            ..Default::default()
        };
        let engine = Engine::with_config(&controller, config)?;
        let references = controller.reference_users(16)?;

        assert_eq!(ids(&engine.predict(&target, &references)?), vec![10, 11]);
        assert_eq!(engine.ranking(&target, &references)?.len(), 2);

        Ok(())
    }

    #[test]
    fn recommend_samples_reference_population() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        seed(&controller, 20, &[(1, 4.), (9, 5.)])?;
        seed(&controller, 21, &[(1, 4.), (10, 5.)])?;

        let config = EngineConfig {
            reference_sample_size: 1,
            ..Default::default()
        };
        let engine = Engine::with_config(&controller, config)?;

        assert_eq!(ids(&engine.recommend(&target)?), vec![9]);
        Ok(())
    }

    #[test]
    fn threshold_can_be_tuned() -> Result<(), Error> {
        let (controller, target) = store(8)?;
        // similarity 0.5
        seed(&controller, 20, &[(1, 3.), (9, 5.)])?;

        let references = controller.reference_users(16)?;
        let strict = Engine::with_controller(&controller);
        let loose = Engine::with_config(
            &controller,
            EngineConfig {
                similarity_threshold: 0.4,
                ..Default::default()
            },
        )?;

        assert!(strict.predict(&target, &references)?.is_empty());
        assert_eq!(ids(&loose.predict(&target, &references)?), vec![9]);

        Ok(())
    }

    #[test]
    fn invalid_configs_are_rejected() -> Result<(), Error> {
        let (controller, _) = store(0)?;

        for threshold in &[-0.1, 1.5, f64::NAN] {
            let config = EngineConfig {
                similarity_threshold: *threshold,
                ..Default::default()
            };

            assert!(Engine::with_config(&controller, config).is_err());
        }

        let config = EngineConfig {
            max_recommendations: Some(0),
            ..Default::default()
        };
        assert!(Engine::with_config(&controller, config).is_err());

        let config = EngineConfig {
            max_recommendations: Some(3),
            ..Default::default()
        };
        let engine = Engine::with_config(&controller, config.clone())?;
        assert_eq!(engine.config(), &config);

        Ok(())
    }

    #[test]
    fn storage_failure_is_propagated() -> Result<(), Error> {
        // Reachable database without any tables
        let controller = MovieStoreController::with_url(":memory:")?;
        let engine = Engine::with_controller(&controller);

        let target = ActiveUser {
            id: 1,
            username: "target".into(),
        };
        let reference = ReferenceUser { id: 20 };

        assert!(engine.predict(&target, &[]).is_err());
        assert!(engine.predict(&target, &[reference.clone()]).is_err());
        assert!(engine.similarity(&target, &reference).is_err());
        assert!(engine.recommend(&target).is_err());

        Ok(())
    }
}
