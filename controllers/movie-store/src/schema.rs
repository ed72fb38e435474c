table! {
    movies (id) {
        id -> Integer,
        title -> Text,
    }
}

table! {
    ratings (id) {
        id -> Integer,
        user_id -> Integer,
        movie_id -> Integer,
        score -> Double,
    }
}

table! {
    reference_ratings (id) {
        id -> Integer,
        user_id -> Integer,
        movie_id -> Integer,
        score -> Double,
    }
}

table! {
    reference_users (id) {
        id -> Integer,
    }
}

table! {
    users (id) {
        id -> Integer,
        username -> Text,
    }
}

joinable!(ratings -> movies (movie_id));
joinable!(ratings -> users (user_id));
joinable!(reference_ratings -> movies (movie_id));
joinable!(reference_ratings -> reference_users (user_id));

allow_tables_to_appear_in_same_query!(
    movies,
    ratings,
    reference_ratings,
    reference_users,
    users,
);

pub(crate) const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    username TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users (id),
    movie_id INTEGER NOT NULL REFERENCES movies (id),
    score DOUBLE NOT NULL
);

CREATE TABLE IF NOT EXISTS reference_users (
    id INTEGER PRIMARY KEY NOT NULL
);

CREATE TABLE IF NOT EXISTS reference_ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES reference_users (id),
    movie_id INTEGER NOT NULL REFERENCES movies (id),
    score DOUBLE NOT NULL
);

CREATE INDEX IF NOT EXISTS ratings_user_movie ON ratings (user_id, movie_id);
CREATE INDEX IF NOT EXISTS reference_ratings_user_movie ON reference_ratings (user_id, movie_id);
"#;
