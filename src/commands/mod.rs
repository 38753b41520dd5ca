//! Command parsing, routing and reply formatting.
//!
//! ```text
//! Matrix message
//!      │
//!      ▼
//! command::parse ──► ParsedCommand ──► Interaction (+ sender)
//!                                          │
//!                                          ▼
//!                                 Router::dispatch
//!                                   │ lookup by name or alias
//!                                   │ role check
//!                                   │ argument validation
//!                                   ▼
//!                        actions::handle_* ──► Reply / CommandError
//!                                   │
//!                                   ▼
//!                           CommandResult { reply, action }
//! ```
//!
//! Every failure is turned into a user facing [`Reply`] by the router, so the
//! bot always has something to send back. Side effects the platform must carry
//! out (redacting a message, warning the operator, shutting down) are returned
//! as a [`BotAction`] instead of being performed by the handlers.

use std::{collections::HashMap, time::Duration};

mod actions;
mod command;
mod reply;
mod responses;
mod router;
mod schema;

pub use crate::commands::{
    command::{CommandParseError, ParsedCommand},
    reply::Reply,
    responses::format_greeting,
    router::Router,
    schema::COMMANDS,
};

/// A command addressed to the bot, with where it was sent and by whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Command name or alias as typed by the user
    pub command: String,
    /// Named arguments, free text is stored under `texto`
    pub arguments: HashMap<String, String>,
    pub room_id: String,
    pub user_id: String,
    /// Display name used in replies
    pub user_name: String,
}

impl Interaction {
    pub fn new(parsed: ParsedCommand, room_id: &str, user_id: &str, user_name: &str) -> Self {
        Interaction {
            command: parsed.name,
            arguments: parsed.arguments,
            room_id: room_id.to_owned(),
            user_id: user_id.to_owned(),
            user_name: user_name.to_owned(),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }
}

/// Side effect requested from the bot after the reply is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    /// Redact the reply once the delay has elapsed.
    ExpireAfter(Duration),
    /// Post a report in the configured channel.
    NotifyOperator(String),
    /// Replace the given room by a fresh one, make it the channel and stop
    /// the bot.
    Disconnect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub reply: Reply,
    pub action: Option<BotAction>,
}

impl From<Reply> for CommandResult {
    fn from(reply: Reply) -> Self {
        CommandResult {
            reply,
            action: None,
        }
    }
}

/// Why an argument was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentIssue {
    Missing,
    TooLong { max: usize },
    NotAllowed(String),
    Unexpected,
}

/// Why a text cannot be transliterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptIssue {
    DigitsOnly,
    NotJapanese,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    InvalidArgument {
        parameter: String,
        reason: ArgumentIssue,
    },
    InvalidScript(ScriptIssue),
    TranslationBackend,
    /// Carries the probe failure for the operator report
    ServerUnreachable(String),
    Forbidden,
}
