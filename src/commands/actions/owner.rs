//! Owner only command handlers.

use std::time::Duration;

use log::{debug, info};

use crate::commands::{
    BotAction, CommandResult,
    reply::{Field, render},
    responses::{format_goodbye, format_server_ip},
};

pub const IP_TITLE: &str = "IP del servidor";
pub const DISCONNECT_TITLE: &str = "Adiós";
/// The address is redacted from the room after this delay.
pub const IP_VISIBILITY: Duration = Duration::from_secs(10);

/// Discloses the address of the Minecraft server.
///
/// # Arguments
///
/// * `server_host` - Configured host, or the public address looked up at startup
///
/// # Returns
///
/// A `CommandResult` with the address and a [`BotAction::ExpireAfter`] request,
/// so the reply does not stay in the room.
pub fn handle_ip(server_host: &str) -> CommandResult {
    debug!("handling ip command");

    CommandResult {
        reply: render(IP_TITLE, vec![Field::block(format_server_ip(server_host), "")]),
        action: Some(BotAction::ExpireAfter(IP_VISIBILITY)),
    }
}

/// Says goodbye and asks the bot to reset the room and stop.
///
/// # Arguments
///
/// * `room_id` - Room the command was sent from, the one that gets replaced
///
/// # Returns
///
/// A `CommandResult` with the goodbye and a [`BotAction::Disconnect`] request
/// for `room_id`.
pub fn handle_disconnect(room_id: &str) -> CommandResult {
    info!("disconnect requested from {}", room_id);

    CommandResult {
        reply: render(DISCONNECT_TITLE, vec![Field::block(format_goodbye(), "")]),
        action: Some(BotAction::Disconnect(room_id.to_owned())),
    }
}
