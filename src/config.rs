//! Configuration file structures for the Chikis bot.
//!
//! The configuration is read from a YAML file and can be overridden with
//! environment variables prefixed by `CHIKIS_`, nested keys being separated by
//! `__` (e.g. `CHIKIS_MATRIX__PASSWORD`).
//!
//! ```yaml
//! owner: "@admin:matrix.org"
//!
//! matrix:
//!   user_id: "@chikis:matrix.org"
//!   password: "secret-password"
//!   passphrase: "recovery-passphrase"
//!
//! channel:
//!   room_id: "!abcdef:matrix.org"
//!
//! # Every key is optional, defaults shown
//! minecraft:
//!   host: "play.example.com"   # public address of this machine when omitted
//!   port: 25565
//!   query_port: 25565
//!   timeout_secs: 5
//!   address_lookup_url: "https://v4.ident.me/"
//!
//! translator:
//!   url: "https://translate.googleapis.com"
//!   timeout_secs: 10
//!
//! roles:
//!   misionero: ["@ana:matrix.org"]
//!   arzobispo: []
//!   papa: ["@luis:matrix.org"]
//! ```

use std::collections::HashMap;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

const ENV_PREFIX: &str = "CHIKIS_";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix user id allowed to run owner commands
    pub owner: String,
    pub matrix: Matrix,
    pub channel: Channel,
    #[serde(default)]
    pub minecraft: Minecraft,
    #[serde(default)]
    pub translator: Translation,
    /// Role name to member user ids
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

/// Matrix account of the bot.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, e.g. `@chikis:matrix.org`.
    pub user_id: String,
    /// Used for the first login only, the session is persisted afterwards.
    pub password: String,
    /// E2EE recovery passphrase, also encrypts the local store.
    pub passphrase: String,
}

/// Room the bot greets on startup and reports server failures to.
#[derive(Debug, Deserialize)]
pub struct Channel {
    pub room_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Minecraft {
    pub host: Option<String>,
    pub port: u16,
    /// `query.port` of `server.properties`
    pub query_port: u16,
    pub timeout_secs: u64,
    pub address_lookup_url: String,
}

impl Default for Minecraft {
    fn default() -> Self {
        Minecraft {
            host: None,
            port: 25565,
            query_port: 25565,
            timeout_secs: 5,
            address_lookup_url: "https://v4.ident.me/".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for Translation {
    fn default() -> Self {
        Translation {
            url: "https://translate.googleapis.com".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// Values resolved at startup and handed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub channel_id: String,
    pub server_host: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}
