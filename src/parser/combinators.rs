use nom::{
    bytes::complete::{is_not, take_while},
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
    Parser,
};

/// The only separator the tokenizer knows about. Tabs are token characters.
const SEPARATOR: char = ' ';

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while(|c| c == SEPARATOR).parse(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    is_not(" ").parse(input)
}

/// Words separated by runs of spaces, ignoring leading and trailing spaces.
fn words(input: &str) -> IResult<&str, Vec<&str>> {
    terminated(many0(preceded(spaces, word)), spaces).parse(input)
}

/// Split a raw line into its words. Never yields an empty word.
pub fn split_words(input: &str) -> Vec<&str> {
    match words(input) {
        Ok((_, words)) => words,
        Err(_) => Vec::new(),
    }
}
