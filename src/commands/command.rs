//! Message body parsing.
//!
//! A command looks like `!chikis <subcommand> [key=value ...] [free text]`.
//! The subcommand defaults to `ayuda` when omitted.

use std::collections::HashMap;

use command_parser::Parser;
use log::debug;

use crate::commands::schema::find_command;

const BOT_NAME: &str = "chikis";
const DEFAULT_COMMAND: &str = "ayuda";
/// Argument name holding the free text that follows the named arguments.
pub const TEXT_ARGUMENT: &str = "texto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub arguments: HashMap<String, String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Not a command, or a command for another bot. Ignored silently.
    NotForBot,
}

/// Returns `body` without its first `count` whitespace separated words.
fn skip_words(body: &str, count: usize) -> &str {
    let mut rest = body.trim_start();
    for _ in 0..count {
        rest = match rest.find(char::is_whitespace) {
            Some(end) => rest[end..].trim_start(),
            None => "",
        };
    }
    rest
}

/// Named parameters of the command, free text excluded.
fn named_parameters(command: &str) -> Vec<&'static str> {
    find_command(command)
        .map(|spec| {
            spec.params
                .iter()
                .map(|param| param.name)
                .filter(|name| *name != TEXT_ARGUMENT)
                .collect()
        })
        .unwrap_or_default()
}

/// Splits `key=value` off the front of `rest` when `key` is one of `named`.
///
/// Any other word containing `=` belongs to the free text.
fn take_named_argument<'a>(
    rest: &'a str,
    named: &[&str],
) -> Option<(String, String, &'a str)> {
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (key, value) = rest[..end].split_once('=')?;

    if !named.contains(&key) {
        return None;
    }

    Some((key.to_owned(), value.to_owned(), rest[end..].trim_start()))
}

pub fn parse(parser: &Parser, body: &str) -> Result<ParsedCommand, CommandParseError> {
    // Only the bot name and the subcommand go through the parser, it drops
    // option-like words that free text may contain.
    let head: Vec<&str> = body.split_whitespace().take(2).collect();

    // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
    let head = head.join(" ") + " dummy";

    let Ok(command) = parser.parse(&head) else {
        return Err(CommandParseError::NotForBot);
    };

    if command.name != BOT_NAME {
        return Err(CommandParseError::NotForBot);
    }

    let Some(name) = command.arguments.first() else {
        return Ok(ParsedCommand {
            name: DEFAULT_COMMAND.to_owned(),
            arguments: HashMap::new(),
        });
    };

    let name = name.to_lowercase();
    let named = named_parameters(&name);

    let mut arguments = HashMap::new();
    let mut rest = skip_words(body, 2);
    while let Some((key, value, remaining)) = take_named_argument(rest, &named) {
        arguments.insert(key, value);
        rest = remaining;
    }

    let rest = rest.trim_end();
    if !rest.is_empty() {
        arguments.insert(TEXT_ARGUMENT.to_owned(), rest.to_owned());
    }

    let parsed = ParsedCommand { name, arguments };
    debug!("parsed command {:?}", parsed);

    Ok(parsed)
}
