// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use diesel::connection::Connection;
use indicatif::ProgressIterator;
use movie_store::MovieStoreController;

// Expects `id,title` records
fn insert_movies(controller: &MovieStoreController, path: &str) -> Result<(), Error> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_path(path)?;

    println!("Collecting records for movies...");
    let records: Vec<_> = csv.records().collect();

    println!("Pushing into the database");
    for record in records.iter().progress() {
        if let Ok(record) = record {
            let id: i32 = record[0].parse().map_err(|e| {
                println!("Failed for {}", &record[0]);
                e
            })?;

            controller.insert_movie(id, &record[1])?;
        }
    }

    Ok(())
}

// Expects `user_id,movie_id,rating` records
fn insert_reference_ratings(controller: &MovieStoreController, path: &str) -> Result<(), Error> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_path(path)?;

    println!("Collecting records for reference ratings...");
    let mut ratings = Vec::new();
    for record in csv.records() {
        if let Ok(record) = record {
            let user_id: i32 = record[0].parse()?;
            let movie_id: i32 = record[1].parse()?;
            let score: f64 = record[2].parse()?;

            ratings.push((user_id, movie_id, score));
        }
    }

    println!("Pushing ratings by chunks");
    for chunk in ratings.chunks(10_000).progress() {
        controller
            .connection()
            .transaction::<_, Error, _>(|| {
                for (user_id, movie_id, score) in chunk {
                    controller.insert_reference_rating(*user_id, *movie_id, *score)?;
                }

                Ok(())
            })?;
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let mut args = std::env::args().skip(1);
    let movies = args.next().unwrap_or_else(|| "data/movies.csv".into());
    let ratings = args
        .next()
        .unwrap_or_else(|| "data/reference_ratings.csv".into());

    let controller = MovieStoreController::new()?;
    controller.setup_schema()?;

    insert_movies(&controller, &movies)?;
    insert_reference_ratings(&controller, &ratings)?;

    Ok(())
}
