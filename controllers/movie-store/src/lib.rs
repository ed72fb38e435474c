// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

#[macro_use]
extern crate diesel;

pub mod models;
pub mod schema;

use crate::models::{
    movies::{Movie, NewMovie},
    ratings::{NewRating, NewReferenceRating, Rating},
    users::{ActiveUser, NewActiveUser, NewReferenceUser, ReferenceUser},
};
use crate::schema::{movies, ratings, reference_ratings, reference_users, users};
use anyhow::Error;
use controller::{clamp_rating, error::ErrorKind, ratings, Controller, SearchBy};
use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use diesel::{insert_into, insert_or_ignore_into, prelude::*};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_URL: &str = "movies.db";

pub fn establish_connection(url: &str) -> Result<SqliteConnection, Error> {
    Ok(SqliteConnection::establish(url)?)
}

// Rated relations may hold the same movie more than once (ratings are never
// de-duplicated on insertion), only the first occurrence is kept.
fn unique_in_order(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub struct MovieStoreController {
    conn: SqliteConnection,
}

impl MovieStoreController {
    /// Connect to the database pointed by `DATABASE_URL` (`.env` is honored),
    /// falling back to `movies.db`
    pub fn new() -> Result<Self, Error> {
        let url = dotenv::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.into());
        Self::with_url(&url)
    }

    pub fn with_url(url: &str) -> Result<Self, Error> {
        let conn = establish_connection(url)?;
        log::debug!("Connected to database at {}", url);

        Ok(Self { conn })
    }

    /// Private database living only as long as the controller, schema included
    pub fn in_memory() -> Result<Self, Error> {
        let controller = Self::with_url(":memory:")?;
        controller.setup_schema()?;

        Ok(controller)
    }

    /// Create every table if it doesn't exist yet
    pub fn setup_schema(&self) -> Result<(), Error> {
        self.conn.batch_execute(schema::CREATE_TABLES)?;
        Ok(())
    }

    pub fn connection(&self) -> &SqliteConnection {
        &self.conn
    }

    pub fn insert_movie(&self, id: i32, title: &str) -> Result<Movie, Error> {
        insert_into(movies::table)
            .values(&NewMovie { id, title })
            .execute(&self.conn)?;

        Ok(movies::table.find(id).first(&self.conn)?)
    }

    pub fn insert_reference_user(&self, id: i32) -> Result<ReferenceUser, Error> {
        insert_or_ignore_into(reference_users::table)
            .values(&NewReferenceUser { id })
            .execute(&self.conn)?;

        Ok(ReferenceUser { id })
    }

    /// Seed a reference rating, creating its reference user if needed
    pub fn insert_reference_rating(
        &self,
        user_id: i32,
        movie_id: i32,
        score: f64,
    ) -> Result<(), Error> {
        self.insert_reference_user(user_id)?;

        insert_into(reference_ratings::table)
            .values(&NewReferenceRating {
                user_id,
                movie_id,
                score,
            })
            .execute(&self.conn)?;

        Ok(())
    }
}

impl Controller for MovieStoreController {
    type ActiveUser = ActiveUser;
    type ReferenceUser = ReferenceUser;
    type Movie = Movie;
    type Rating = Rating;

    fn active_rating(&self, user_id: &i32, movie_id: &i32) -> Result<Option<f64>, Error> {
        let score = ratings::table
            .filter(ratings::user_id.eq(*user_id))
            .filter(ratings::movie_id.eq(*movie_id))
            .order(ratings::id.asc())
            .select(ratings::score)
            .first::<f64>(&self.conn)
            .optional()?;

        Ok(score)
    }

    fn reference_rating(&self, user_id: &i32, movie_id: &i32) -> Result<Option<f64>, Error> {
        let score = reference_ratings::table
            .filter(reference_ratings::user_id.eq(*user_id))
            .filter(reference_ratings::movie_id.eq(*movie_id))
            .order(reference_ratings::id.asc())
            .select(reference_ratings::score)
            .first::<f64>(&self.conn)
            .optional()?;

        Ok(score)
    }

    fn active_rated_movies(&self, user: &ActiveUser) -> Result<Vec<i32>, Error> {
        let movie_ids = ratings::table
            .filter(ratings::user_id.eq(user.id))
            .order(ratings::id.asc())
            .select(ratings::movie_id)
            .load::<i32>(&self.conn)?;

        Ok(unique_in_order(movie_ids))
    }

    fn reference_rated_movies(&self, user: &ReferenceUser) -> Result<Vec<i32>, Error> {
        let movie_ids = reference_ratings::table
            .filter(reference_ratings::user_id.eq(user.id))
            .order(reference_ratings::id.asc())
            .select(reference_ratings::movie_id)
            .load::<i32>(&self.conn)?;

        Ok(unique_in_order(movie_ids))
    }

    fn reference_users(&self, limit: usize) -> Result<Vec<ReferenceUser>, Error> {
        let users = reference_users::table
            .order(reference_users::id.asc())
            .limit(limit as i64)
            .load::<ReferenceUser>(&self.conn)?;

        Ok(users)
    }

    fn reference_users_by(&self, by: &SearchBy) -> Result<Vec<ReferenceUser>, Error> {
        let users = match by {
            SearchBy::Id(id) => {
                let id: i32 = SearchBy::parse_id(id)?;
                reference_users::table
                    .filter(reference_users::id.eq(id))
                    .load::<ReferenceUser>(&self.conn)?
            }

            _ => Vec::new(),
        };

        if users.is_empty() {
            Err(by.not_found().into())
        } else {
            Ok(users)
        }
    }

    fn active_users_by(&self, by: &SearchBy) -> Result<Vec<ActiveUser>, Error> {
        let users = match by {
            SearchBy::Id(id) => {
                let id: i32 = SearchBy::parse_id(id)?;
                users::table
                    .filter(users::id.eq(id))
                    .load::<ActiveUser>(&self.conn)?
            }

            SearchBy::Name(name) => users::table
                .filter(users::username.eq(name))
                .load::<ActiveUser>(&self.conn)?,

            SearchBy::Custom(..) => Vec::new(),
        };

        if users.is_empty() {
            Err(by.not_found().into())
        } else {
            Ok(users)
        }
    }

    fn active_ratings(&self, user: &ActiveUser) -> Result<ratings!(Movie), Error> {
        let rows = ratings::table
            .filter(ratings::user_id.eq(user.id))
            .order(ratings::id.asc())
            .load::<Rating>(&self.conn)?;

        let mut ratings = HashMap::new();
        for rating in rows {
            ratings.entry(rating.movie_id).or_insert(rating.score);
        }

        Ok(ratings)
    }

    fn movie(&self, movie_id: &i32) -> Result<Option<Movie>, Error> {
        let movie = movies::table
            .find(*movie_id)
            .first::<Movie>(&self.conn)
            .optional()?;

        Ok(movie)
    }

    fn movies(&self, limit: usize) -> Result<Vec<Movie>, Error> {
        let movies = movies::table
            .order(movies::id.asc())
            .limit(limit as i64)
            .load::<Movie>(&self.conn)?;

        Ok(movies)
    }

    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>, Error> {
        let movies = match by {
            SearchBy::Id(id) => {
                let id: i32 = SearchBy::parse_id(id)?;
                movies::table
                    .filter(movies::id.eq(id))
                    .load::<Movie>(&self.conn)?
            }

            SearchBy::Name(title) => movies::table
                .filter(movies::title.eq(title))
                .order(movies::id.asc())
                .load::<Movie>(&self.conn)?,

            SearchBy::Custom(..) => Vec::new(),
        };

        if movies.is_empty() {
            Err(by.not_found().into())
        } else {
            Ok(movies)
        }
    }

    fn score_range(&self) -> (f64, f64) {
        (0., 5.)
    }

    fn insert_active_user(&self, username: &str) -> Result<ActiveUser, Error> {
        self.conn.transaction::<_, Error, _>(|| {
            let existing = users::table
                .filter(users::username.eq(username))
                .first::<ActiveUser>(&self.conn)
                .optional()?;

            if existing.is_some() {
                return Err(ErrorKind::UserExists(username.to_string()).into());
            }

            insert_into(users::table)
                .values(&NewActiveUser { username })
                .execute(&self.conn)?;

            let user = users::table
                .filter(users::username.eq(username))
                .first::<ActiveUser>(&self.conn)?;

            Ok(user)
        })
    }

    fn insert_rating(&self, user_id: &i32, movie_id: &i32, score: f64) -> Result<Rating, Error> {
        let score = clamp_rating(score, self.score_range())?;

        self.conn.transaction::<_, Error, _>(|| {
            let user = users::table
                .find(*user_id)
                .first::<ActiveUser>(&self.conn)
                .optional()?;
            let movie = self.movie(movie_id)?;

            if user.is_none() || movie.is_none() {
                return Err(ErrorKind::InsertRatingFailed(
                    user_id.to_string(),
                    movie_id.to_string(),
                )
                .into());
            }

            insert_into(ratings::table)
                .values(&NewRating {
                    user_id: *user_id,
                    movie_id: *movie_id,
                    score,
                })
                .execute(&self.conn)?;

            let rating = ratings::table
                .order(ratings::id.desc())
                .first::<Rating>(&self.conn)?;

            log::debug!(
                "User({}) rated movie({}) with {}",
                rating.user_id,
                rating.movie_id,
                rating.score
            );

            Ok(rating)
        })
    }
}
