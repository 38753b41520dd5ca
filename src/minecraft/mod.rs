//! Minecraft Java edition server probing.
//!
//! Two independent probes are exposed through [`GameServer`]:
//!
//! - [`GameServer::status`] uses the Server List Ping over TCP. It only tells
//!   whether the server answers and how many players are online.
//! - [`GameServer::query`] uses the UDP query protocol (`enable-query=true` in
//!   `server.properties`) to get the map name and the full player roster.
//!
//! [`lookup_public_address`] resolves the host's public IPv4 address when no
//! server host is configured.

mod address;
mod codec;
mod query;
mod status;

use std::time::Duration;

use log::debug;
use mockall::automock;
use thiserror::Error;
use tokio::time::timeout;

pub use crate::minecraft::address::lookup_public_address;

#[derive(Error, Debug)]
pub enum MinecraftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("no answer after {0:?}")]
    Timeout(Duration),
}

/// Liveness information from the Server List Ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub online: u32,
    pub max: u32,
    pub version: String,
    pub motd: String,
}

/// Full statistics from the query protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub motd: String,
    pub map: String,
    pub version: String,
    pub online: u32,
    pub max: u32,
    pub players: Vec<String>,
}

#[automock]
pub trait GameServer {
    async fn status(&self) -> Result<ServerStatus, MinecraftError>;
    async fn query(&self) -> Result<QueryResponse, MinecraftError>;
}

/// A Minecraft server reachable at a fixed address.
pub struct MinecraftServer {
    host: String,
    port: u16,
    query_port: u16,
    timeout: Duration,
}

impl MinecraftServer {
    pub fn new(host: &str, port: u16, query_port: u16, timeout: Duration) -> Self {
        MinecraftServer {
            host: host.to_string(),
            port,
            query_port,
            timeout,
        }
    }
}

impl GameServer for MinecraftServer {
    async fn status(&self) -> Result<ServerStatus, MinecraftError> {
        debug!("pinging {}:{}", &self.host, self.port);
        timeout(self.timeout, status::fetch_status(&self.host, self.port))
            .await
            .map_err(|_| MinecraftError::Timeout(self.timeout))?
    }

    async fn query(&self) -> Result<QueryResponse, MinecraftError> {
        debug!("querying {}:{}", &self.host, self.query_port);
        timeout(self.timeout, query::full_stat(&self.host, self.query_port))
            .await
            .map_err(|_| MinecraftError::Timeout(self.timeout))?
    }
}
