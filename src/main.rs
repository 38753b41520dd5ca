//! Chikis - a Matrix bot for a small Minecraft community.
//!
//! Users talk to the bot with `!chikis <command> [key=value ...] [text]`:
//!
//! - `!chikis traduccion idioma=en Hola` - translate a text
//! - `!chikis traduccion_jap 東京` - hiragana and romaji of a Japanese text
//! - `!chikis server_status` - players online on the Minecraft server
//! - `!chikis ayuda` - list the commands
//!
//! The owner can also reveal the server address (`ip`) and reset the channel
//! before stopping the bot (`adios`).
//!
//! # Usage
//!
//! ```bash
//! chikis --config config.yaml --data ./chikis-data
//! ```
//!
//! See [`config`] for the configuration file. `RUST_LOG` controls the log
//! level, `info` by default.

use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{
    bot::Bot,
    channel::ChannelStore,
    commands::Router,
    config::{BotSettings, Config},
    matrix::{Credentials, MatrixClient},
    minecraft::{MinecraftServer, lookup_public_address},
    roles::ConfigRoles,
    script::KakasiConverter,
    translator::GoogleTranslator,
    utils::{get_path, normalize_url},
};

mod bot;
mod channel;
mod commands;
mod config;
mod matrix;
mod minecraft;
mod roles;
mod script;
mod translator;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: String,

    /// Directory holding the Matrix session and the persisted channel.
    ///
    /// It contains the bot access token and encryption keys, keep it private.
    #[arg(short, long)]
    data: String,
}

async fn resolve_server_host(config: &config::Minecraft) -> anyhow::Result<String> {
    if let Some(host) = &config.host {
        return Ok(host.clone());
    }

    let host = lookup_public_address(
        &config.address_lookup_url,
        Duration::from_secs(config.timeout_secs),
    )
    .await?;
    info!("public address is {}", host);
    Ok(host)
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let server_host = resolve_server_host(&config.minecraft).await?;
    let channel_store = ChannelStore::new(get_path(&args.data, "channel"));
    let settings = BotSettings {
        channel_id: channel_store.resolve(&config.channel.room_id).await,
        server_host,
    };

    let translator = GoogleTranslator::new(
        &normalize_url(&config.translator.url),
        Duration::from_secs(config.translator.timeout_secs),
    )?;
    let server = MinecraftServer::new(
        &settings.server_host,
        config.minecraft.port,
        config.minecraft.query_port,
        Duration::from_secs(config.minecraft.timeout_secs),
    );
    let roles = ConfigRoles::new(&config.owner, &config.roles);
    let router = Router::new(
        translator,
        KakasiConverter,
        server,
        roles,
        &settings.server_host,
    );

    let matrix_client = MatrixClient::new(
        &Credentials {
            user_id: config.matrix.user_id,
            password: config.matrix.password,
            passphrase: config.matrix.passphrase,
        },
        &get_path(&args.data, "session"),
    )
    .await?;

    Bot::new(matrix_client, router, channel_store, settings)
        .start()
        .await
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting chikis {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    if let Err(e) = run(args, config).await {
        error!("Bot stopped: {:?}", e);
    }
}
