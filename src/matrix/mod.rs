//! Matrix protocol integration.
//!
//! - `encryption`: login or session restore, cross signing and recovery
//! - `session`: session tokens and sync token persisted on disk
//! - `sync`: sync loop, auto join and message callback
//! - `client`: [`MatrixClient`], the only type the bot uses

mod client;
mod encryption;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// Account of the bot.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
    pub passphrase: String,
}
