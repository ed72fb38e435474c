// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod entity;
pub mod error;
pub mod rating;
pub mod searchby;

#[macro_export]
macro_rules! eid {
    ($e:ty) => {
        <$e as $crate::entity::Entity>::Id
    };
}

#[macro_export]
macro_rules! ratings {
    ($e:ty) => {
        $crate::Ratings<$crate::eid!($e)>
    }
}

use anyhow::Error;
use std::collections::HashMap;

pub use entity::{Entity, ToTable};
pub use rating::clamp_rating;
pub use searchby::SearchBy;

pub type Result<T> = std::result::Result<T, Error>;
pub type Ratings<I, Value = f64> = HashMap<I, Value>;

/// Everything the recommendation engine (and the REPL on top of it) needs
/// from storage. Active users rate movies through `insert_rating`, reference
/// users are a fixed, pre-seeded population that is only ever read.
///
/// Missing ratings and missing movies are `Ok(None)`, an `Err` always means
/// the storage itself failed.
pub trait Controller {
    type ActiveUser: Entity;
    type ReferenceUser: Entity<Id = eid!(Self::ActiveUser)>;
    type Movie: Entity;
    type Rating: Entity;

    /// Get the score an active user gave to a movie, the first one if the
    /// rating was submitted more than once
    fn active_rating(
        &self,
        user_id: &eid!(Self::ActiveUser),
        movie_id: &eid!(Self::Movie),
    ) -> Result<Option<f64>>;

    /// Get the score a reference user gave to a movie
    fn reference_rating(
        &self,
        user_id: &eid!(Self::ReferenceUser),
        movie_id: &eid!(Self::Movie),
    ) -> Result<Option<f64>>;

    /// Movies rated by an active user, without repetitions and in the order
    /// they were first rated
    fn active_rated_movies(&self, user: &Self::ActiveUser) -> Result<Vec<eid!(Self::Movie)>>;

    /// Movies rated by a reference user, without repetitions and in the order
    /// they were seeded
    fn reference_rated_movies(
        &self,
        user: &Self::ReferenceUser,
    ) -> Result<Vec<eid!(Self::Movie)>>;

    /// Get at most `limit` reference users
    fn reference_users(&self, limit: usize) -> Result<Vec<Self::ReferenceUser>>;

    /// Get reference users that matched the search criteria
    fn reference_users_by(&self, by: &SearchBy) -> Result<Vec<Self::ReferenceUser>>;

    /// Get active users that matched the search criteria by id or name
    fn active_users_by(&self, by: &SearchBy) -> Result<Vec<Self::ActiveUser>>;

    /// Get all the ratings of an active user, mapping Movie::Id => score
    fn active_ratings(&self, user: &Self::ActiveUser) -> Result<ratings!(Self::Movie)>;

    /// Get a single movie
    fn movie(&self, movie_id: &eid!(Self::Movie)) -> Result<Option<Self::Movie>>;

    /// Get the first `limit` movies in catalog order
    fn movies(&self, limit: usize) -> Result<Vec<Self::Movie>>;

    /// Get movies that matched the search criteria by id or title
    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Self::Movie>>;

    /// The controller score range, ex. (0.0, 5.0) is (min_rating, max_rating)
    fn score_range(&self) -> (f64, f64);

    /// Create a new active user
    fn insert_active_user(&self, username: &str) -> Result<Self::ActiveUser>;

    /// Create a rating in user for a movie, the score is clamped into
    /// `score_range` before it's stored
    fn insert_rating(
        &self,
        user_id: &eid!(Self::ActiveUser),
        movie_id: &eid!(Self::Movie),
        score: f64,
    ) -> Result<Self::Rating>;
}
