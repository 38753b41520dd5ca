//! Command action handlers.
//!
//! One handler per command kind. Backend handlers return
//! `Result<Reply, CommandError>` and leave error rendering to the router; the
//! owner handlers return a full [`CommandResult`](crate::commands::CommandResult)
//! because they request a [`BotAction`](crate::commands::BotAction).
//!
//! Handlers never talk to Matrix.

mod help;
mod owner;
mod server_status;
mod translation;
mod transliteration;

pub use help::handle_help;
pub use owner::{handle_disconnect, handle_ip};
pub use server_status::handle_server_status;
pub use translation::handle_translation;
pub use transliteration::handle_transliteration;
