mod basics;

use basics::{parse_enclosed, parse_ident, parse_number, parse_score, parse_separator};
use controller::SearchBy;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::map;
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateUser(String),
    QueryUser(SearchBy),
    QueryMovie(SearchBy),
    QueryRatings(SearchBy),
    Rate(SearchBy, SearchBy, f64),
    Similarity(SearchBy, SearchBy),
    Recommend(SearchBy),
}

fn parse_index(input: &str) -> IResult<&str, SearchBy> {
    let (input, index_type) = alt((tag("id"), tag("name")))(input)?;
    let (input, value) = parse_enclosed(input)?;

    let index = match index_type {
        "id" => SearchBy::id(value.trim()),
        _ => SearchBy::name(value.trim()),
    };

    Ok((input, index))
}

// Reference users only have ids, so they're given as a bare number
fn parse_reference(input: &str) -> IResult<&str, SearchBy> {
    map(parse_number, SearchBy::id)(input)
}

fn arguments<'a, O, F>(parser: F) -> impl Fn(&'a str) -> IResult<&'a str, O>
where
    F: Fn(&'a str) -> IResult<&'a str, O>,
{
    delimited(char('('), parser, char(')'))
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    alt((
        map(
            preceded(tag("create_user"), arguments(parse_ident)),
            |name: &str| Statement::CreateUser(name.into()),
        ),
        map(
            preceded(tag("query_user"), arguments(parse_index)),
            Statement::QueryUser,
        ),
        map(
            preceded(tag("query_movie"), arguments(parse_index)),
            Statement::QueryMovie,
        ),
        map(
            preceded(tag("query_ratings"), arguments(parse_index)),
            Statement::QueryRatings,
        ),
        map(
            preceded(
                tag("rate"),
                arguments(tuple((
                    parse_index,
                    parse_separator,
                    parse_index,
                    parse_separator,
                    parse_score,
                ))),
            ),
            |(user, _, movie, _, score)| Statement::Rate(user, movie, score),
        ),
        map(
            preceded(
                tag("similarity"),
                arguments(tuple((parse_index, parse_separator, parse_reference))),
            ),
            |(user, _, reference)| Statement::Similarity(user, reference),
        ),
        map(
            preceded(tag("recommend"), arguments(parse_index)),
            Statement::Recommend,
        ),
    ))(input)
}

pub fn parse_line(input: &str) -> Option<Statement> {
    let input = input.trim();
    let (rest, statement) = parse_statement(input).ok()?;

    if rest.is_empty() {
        Some(statement)
    } else {
        None
    }
}
