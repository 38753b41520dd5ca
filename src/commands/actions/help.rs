//! Help command handler.
//!
//! Lists every command with its parameters and the accepted language codes.

use log::debug;

use crate::commands::{
    CommandResult,
    reply::{Field, render},
    responses::format_help,
    schema::COMMANDS,
};

pub const TITLE: &str = "Ayuda";

/// Lists every command of the table with its parameters and aliases.
///
/// # Returns
///
/// A `CommandResult` titled `Ayuda` with a single field holding the command
/// list and the supported language codes. Never requests a bot action.
pub fn handle_help() -> CommandResult {
    debug!("handling help command");

    render(TITLE, vec![Field::block("Chikis", format_help(&COMMANDS))]).into()
}
