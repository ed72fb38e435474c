// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Couldn't found entity with id({0})")]
    NotFoundById(String),

    #[error("Couldn't found entity with name({0})")]
    NotFoundByName(String),

    #[error("Couldn't found entity with {0}({1})")]
    NotFoundByCustom(String, String),

    #[error("Invalid rating value ({0})")]
    InvalidRating(String),

    #[error("Couldn't insert rating for user({0}) on movie({1})")]
    InsertRatingFailed(String, String),

    #[error("User with name({0}) already exists")]
    UserExists(String),
}
