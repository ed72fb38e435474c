// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use nom::bytes::complete::{tag, take_till1, take_while, take_while1};
use nom::character::complete::{char, digit1};
use nom::number::complete::double;
use nom::{sequence::delimited, IResult};

pub(crate) fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

pub(crate) fn parse_enclosed(input: &str) -> IResult<&str, &str> {
    delimited(char('('), take_till1(|c: char| c == ')'), char(')'))(input)
}

pub(crate) fn parse_number(input: &str) -> IResult<&str, &str> {
    digit1(input)
}

pub(crate) fn parse_score(input: &str) -> IResult<&str, f64> {
    double(input)
}

pub(crate) fn parse_separator(input: &str) -> IResult<&str, &str> {
    delimited(
        take_while(|c: char| c == ' '),
        tag(","),
        take_while(|c: char| c == ' '),
    )(input)
}
