//! Glue between the Matrix client and the command router.
//!
//! Every text message is parsed by the [`Router`]; the ones addressed to the bot
//! are dispatched in their own task, answered with a reply to the original
//! message, then the [`BotAction`] attached to the result, if any, is carried out.

use std::{sync::Arc, time::Duration};

use log::{error, info, warn};
use tokio::{sync::Notify, time::sleep};

use crate::{
    channel::ChannelStore,
    commands::{
        BotAction, COMMANDS, CommandParseError, CommandResult, Interaction, Router,
        format_greeting,
    },
    config::BotSettings,
    matrix::MatrixClient,
    minecraft::MinecraftServer,
    roles::ConfigRoles,
    script::KakasiConverter,
    translator::GoogleTranslator,
};

pub type ChikisRouter = Router<GoogleTranslator, KakasiConverter, MinecraftServer, ConfigRoles>;

/// Time left to the users to read the goodbye before the room goes away.
const DISCONNECT_DELAY: Duration = Duration::from_secs(3);

/// A text message received by the bot.
struct Message {
    body: String,
    room_id: String,
    sender_id: String,
    event_id: String,
}

/// Shared state of the message tasks.
#[derive(Clone)]
struct Context {
    matrix_client: Arc<MatrixClient>,
    router: Arc<ChikisRouter>,
    channel_store: ChannelStore,
    channel_id: String,
    shutdown: Arc<Notify>,
}

pub struct Bot {
    context: Context,
}

impl Bot {
    pub fn new(
        matrix_client: MatrixClient,
        router: ChikisRouter,
        channel_store: ChannelStore,
        settings: BotSettings,
    ) -> Self {
        Bot {
            context: Context {
                matrix_client: Arc::new(matrix_client),
                router: Arc::new(router),
                channel_store,
                channel_id: settings.channel_id,
                shutdown: Arc::new(Notify::new()),
            },
        }
    }

    /// Runs until the sync fails or the disconnect command completes.
    pub async fn start(self) -> anyhow::Result<()> {
        info!(
            "listening for {} commands, channel {}",
            COMMANDS.len(),
            self.context.channel_id
        );

        let on_ready = {
            let context = self.context.clone();
            move || {
                tokio::spawn(async move {
                    context
                        .matrix_client
                        .send_markdown(&context.channel_id, &format_greeting())
                        .await;
                });
            }
        };

        let on_message = {
            let context = self.context.clone();
            move |body: String, room_id: String, sender_id: String, event_id: String| {
                let message = Message {
                    body,
                    room_id,
                    sender_id,
                    event_id,
                };
                tokio::spawn(handle_message(context.clone(), message));
            }
        };

        tokio::select! {
            result = self.context.matrix_client.sync(on_ready, on_message) => result,
            _ = self.context.shutdown.notified() => {
                info!("shutting down");
                Ok(())
            }
        }
    }
}

async fn handle_message(context: Context, message: Message) {
    if context.matrix_client.is_own_user(&message.sender_id) {
        return;
    }

    let parsed = match context.router.parse(&message.body) {
        Ok(parsed) => parsed,
        Err(CommandParseError::NotForBot) => return,
    };

    let user_name = context
        .matrix_client
        .member_name(&message.room_id, &message.sender_id)
        .await;
    let interaction = Interaction::new(
        parsed,
        &message.room_id,
        &message.sender_id,
        &user_name,
    );

    info!("{} sent {}", message.sender_id, interaction.command);
    let CommandResult { reply, action } = context.router.dispatch(&interaction).await;

    let sent_id = context
        .matrix_client
        .send_reply(
            &message.room_id,
            &message.sender_id,
            &message.event_id,
            &reply.to_markdown(),
        )
        .await;

    if let Some(action) = action {
        perform(&context, &message.room_id, sent_id, action).await;
    }
}

async fn perform(context: &Context, room_id: &str, sent_id: Option<String>, action: BotAction) {
    match action {
        BotAction::ExpireAfter(delay) => {
            let Some(sent_id) = sent_id else {
                warn!("reply was not sent, nothing to expire");
                return;
            };
            sleep(delay).await;
            if let Err(e) = context.matrix_client.redact(room_id, &sent_id).await {
                error!("failed to redact {}: {:?}", sent_id, e);
            }
        }
        BotAction::NotifyOperator(report) => {
            context
                .matrix_client
                .send_markdown(&context.channel_id, &report)
                .await;
        }
        BotAction::Disconnect(reset_room) => {
            sleep(DISCONNECT_DELAY).await;
            match context.matrix_client.recreate_room(&reset_room).await {
                Ok(new_room) => {
                    if let Err(e) = context.channel_store.persist(&new_room).await {
                        error!("failed to persist channel {}: {:?}", new_room, e);
                    }
                }
                Err(e) => error!("failed to recreate channel: {:?}", e),
            }
            context.shutdown.notify_one();
        }
    }
}
