// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::{reference_users, users};
use common_macros::hash_map;
use controller::Entity;
use std::collections::HashMap;

// Someone using the system, rates movies through the REPL
#[derive(Debug, Clone, PartialEq, Identifiable, Queryable)]
#[table_name = "users"]
pub struct ActiveUser {
    pub id: i32,
    pub username: String,
}

impl Entity for ActiveUser {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    fn get_data(&self) -> HashMap<String, String> {
        hash_map! {
            "username".into() => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "users"]
pub struct NewActiveUser<'a> {
    pub username: &'a str,
}

// Member of the seeded population, only has an id
#[derive(Debug, Clone, PartialEq, Identifiable, Queryable)]
pub struct ReferenceUser {
    pub id: i32,
}

impl Entity for ReferenceUser {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "reference_users"]
pub struct NewReferenceUser {
    pub id: i32,
}
