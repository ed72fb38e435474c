// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::{ratings, reference_ratings};
use common_macros::hash_map;
use controller::Entity;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Identifiable, Queryable)]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub score: f64,
}

impl Entity for Rating {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    fn get_data(&self) -> HashMap<String, String> {
        hash_map! {
            "user".into() => self.user_id.to_string(),
            "movie".into() => self.movie_id.to_string(),
            "score".into() => self.score.to_string(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "ratings"]
pub struct NewRating {
    pub user_id: i32,
    pub movie_id: i32,
    pub score: f64,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "reference_ratings"]
pub struct NewReferenceRating {
    pub user_id: i32,
    pub movie_id: i32,
    pub score: f64,
}
