pub mod parser;

use anyhow::Error;
use clap::{App, Arg};
use config::Config;
use controller::{Controller, Entity, ToTable};
use engine::Engine;
use log::{debug, info};
use movie_store::MovieStoreController;
use parser::Statement;
use simplelog::{LevelFilter, TermLogger, TerminalMode};
use std::{fmt::Display, hash::Hash, time::Instant};

macro_rules! prompt {
    ($ed:ident, $db:expr) => {{
        use rustyline::error::ReadlineError;

        let msg = if $db.is_empty() {
            format!("{}", PROMPT)
        } else {
            format!("({}) {}", $db, PROMPT)
        };

        match $ed.readline(&msg) {
            Ok(line) => {
                $ed.add_history_entry(line.as_str());
                Ok(line)
            }

            Err(ReadlineError::Interrupted) => {
                continue;
            }

            Err(ReadlineError::Eof) => {
                println!("Exiting...Good bye!");
                break;
            }

            Err(e) => Err(e),
        }
    }};
}

fn print_help() {
    println!("Main help:");
    println!("h | help                              Shows this help");
    println!("q | quit                              Quit");
    println!("v | version                           Shows the version");
    println!("create_user(<name>)                   Create a new user");
    println!("query_user(<index>)                   Show a user");
    println!("query_movie(<index>)                  Show movies by id or title");
    println!("query_ratings(<index>)                Show the ratings of a user");
    println!("rate(<user>, <movie>, <score>)        Rate a movie, score is clamped to 0-5");
    println!("similarity(<user>, <reference id>)    Compatibility with a reference user");
    println!("recommend(<user>)                     Recommend movies to a user");
    println!();
    println!("<index> is either id(<id>) or name(<name>)");
}

fn run_statement<C>(controller: &C, engine: &Engine<C>, stmt: Statement) -> Result<(), Error>
where
    C: Controller,
    <C::ActiveUser as Entity>::Id: Hash + Eq + Clone + Display,
    <C::Movie as Entity>::Id: Hash + Eq + Clone + Display,
    <C::Rating as Entity>::Id: Display,
{
    match stmt {
        Statement::CreateUser(name) => {
            let user = controller.insert_active_user(&name)?;
            println!("{}", user.to_table());
        }

        Statement::QueryUser(searchby) => {
            for user in controller.active_users_by(&searchby)? {
                println!("{}", user.to_table());
            }
        }

        Statement::QueryMovie(searchby) => {
            let movies = controller.movies_by(&searchby)?;
            println!("{}", movies.as_slice().to_table());
        }

        Statement::QueryRatings(searchby) => {
            for user in controller.active_users_by(&searchby)? {
                let ratings = controller.active_ratings(&user)?;
                if ratings.is_empty() {
                    println!("No ratings found for id({})", user.get_id());
                } else {
                    println!("{}", ratings.to_table());
                }
            }
        }

        Statement::Rate(user, movie, score) => {
            let user = &controller.active_users_by(&user)?[0];
            let movie = &controller.movies_by(&movie)?[0];

            let rating = controller.insert_rating(&user.get_id(), &movie.get_id(), score)?;
            println!("{}", rating.to_table());
        }

        Statement::Similarity(user, reference) => {
            let user = &controller.active_users_by(&user)?[0];
            let reference = &controller.reference_users_by(&reference)?[0];

            let sim = engine.similarity(user, reference)?;
            println!("Similarity is {}", sim);
        }

        Statement::Recommend(user) => {
            let user = &controller.active_users_by(&user)?[0];

            let start = Instant::now();
            let movies = engine.recommend(user)?;
            info!(
                "Recommended {} movies to id({}) in {:?}",
                movies.len(),
                user.get_id(),
                start.elapsed()
            );

            if movies.is_empty() {
                println!("Couldn't find any movie to recommend, rate some more!");
            } else {
                println!("{}", movies.as_slice().to_table());
            }
        }
    }

    Ok(())
}

fn database_connected_prompt<C>(
    controller: &C,
    engine: &Engine<C>,
    name: &str,
) -> Result<(), Error>
where
    C: Controller,
    <C::ActiveUser as Entity>::Id: Hash + Eq + Clone + Display,
    <C::Movie as Entity>::Id: Hash + Eq + Clone + Display,
    <C::Rating as Entity>::Id: Display,
{
    let mut rl = rustyline::Editor::<()>::new();

    loop {
        let opt: String = prompt!(rl, name)?;

        match opt.trim() {
            "?" | "h" | "help" => print_help(),

            "q" | "quit" => {
                println!("Bye!");
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Some(stmt) => {
                    if let Err(e) = run_statement(controller, engine, stmt) {
                        println!("{}", e);
                    }
                }

                None => println!("Invalid syntax!"),
            },
        }
    }

    Ok(())
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">> ";

fn main() -> Result<(), Error> {
    let matches = App::new("movie-recommender")
        .version(VERSION)
        .about("Movie recommendations based on a reference population")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("TOML file with the engine settings")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("database")
                .short("d")
                .long("database")
                .value_name("URL")
                .help("SQLite database, overrides DATABASE_URL and the config")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, simplelog::Config::default(), TerminalMode::Mixed)?;

    let config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let url = match matches.value_of("database") {
        Some(url) => url.to_string(),
        None => dotenv::var("DATABASE_URL").unwrap_or_else(|_| config.database.url.clone()),
    };

    let controller = MovieStoreController::with_url(&url)?;
    controller.setup_schema()?;
    let engine = Engine::with_config(&controller, config.engine)?;
    debug!("Engine settings: {:?}", engine.config());

    println!("Welcome to movie-recommender {}", VERSION);
    println!("Type 'help' to see the available statements");
    database_connected_prompt(&controller, &engine, &url)
}
