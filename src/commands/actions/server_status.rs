//! Minecraft server status command handler.
//!
//! The liveness probe runs first; the roster query only runs when someone is
//! online. Both must succeed, a failing probe never falls back on older data.

use log::{debug, error};

use crate::{
    commands::{
        CommandError,
        reply::{Field, Reply, render},
        responses::{format_players_online, format_server_empty},
    },
    minecraft::GameServer,
};

pub const TITLE: &str = "Status del servidor de Minecraft";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatusResult {
    Empty,
    Populated {
        map: String,
        online: u32,
        players: Vec<String>,
    },
}

/// Probes the server and collects who is playing.
///
/// Runs the liveness probe, then the roster query unless nobody is online.
/// The player count is the length of the roster.
///
/// # Returns
///
/// - `Ok(ServerStatusResult::Empty)`: nobody online, or an empty roster
/// - `Ok(ServerStatusResult::Populated)`: map, count and player names
/// - `Err(CommandError::ServerUnreachable)`: either probe failed, with its detail
pub async fn fetch_server_status<G: GameServer>(
    server: &G,
) -> Result<ServerStatusResult, CommandError> {
    let status = server.status().await.map_err(|e| {
        error!("minecraft server did not answer the status request: {}", e);
        CommandError::ServerUnreachable(e.to_string())
    })?;

    if status.online == 0 {
        return Ok(ServerStatusResult::Empty);
    }

    let roster = server.query().await.map_err(|e| {
        error!("minecraft server did not answer the query: {}", e);
        CommandError::ServerUnreachable(e.to_string())
    })?;

    // Names and count both come from the roster
    if roster.players.is_empty() {
        return Ok(ServerStatusResult::Empty);
    }

    Ok(ServerStatusResult::Populated {
        map: roster.map,
        online: roster.players.len() as u32,
        players: roster.players,
    })
}

/// Handles the `server_status` command.
///
/// The caller is expected to have checked the roles already.
///
/// # Returns
///
/// A reply with either the empty server notice, or the map followed by the
/// player count and names. Probe failures are returned as
/// `CommandError::ServerUnreachable` for the router to report.
pub async fn handle_server_status<G: GameServer>(server: &G) -> Result<Reply, CommandError> {
    debug!("handling server status command");

    let fields = match fetch_server_status(server).await? {
        ServerStatusResult::Empty => vec![Field::block(format_server_empty(), "")],
        ServerStatusResult::Populated {
            map,
            online,
            players,
        } => vec![
            Field::block(map, ""),
            Field::block(format_players_online(online), players.join(", ")),
        ],
    };

    Ok(render(TITLE, fields))
}
