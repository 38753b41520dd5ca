//! Sync loop and event handlers.
//!
//! The first sync catches up on what happened while the bot was offline
//! (mostly invites) without dispatching old messages. Only messages received
//! after it reach the message callback.

use std::sync::Arc;

use log::{error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::session::SessionStore;

const INITIAL_SYNC_RETRY: Duration = Duration::from_secs(5);
const MAX_JOIN_DELAY_SECS: u64 = 3600;

pub struct MatrixSync {
    client: Client,
    store: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, store: &SessionStore) -> Self {
        MatrixSync {
            client: client.to_owned(),
            store: store.to_owned(),
        }
    }

    /// Syncs until an error occurs.
    ///
    /// `on_ready` runs once, after the initial sync. `on_message` receives the
    /// body, room id, sender id and event id of every new text message.
    pub async fn sync<R, F>(&self, on_ready: R, on_message: F) -> anyhow::Result<()>
    where
        R: FnOnce(),
        F: Fn(String, String, String, String) + Send + Sync + 'static,
    {
        self.client.add_event_handler(auto_join_rooms);

        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());
        if let Some(sync_token) = self.store.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("initial sync failed: {e}, retrying");
                    sleep(INITIAL_SYNC_RETRY).await;
                }
            }
        };
        if let Err(e) = self.store.save_sync_token(response.next_batch.clone()).await {
            error!("failed to save sync token: {:?}", e);
        }
        sync_settings = sync_settings.token(response.next_batch);

        info!("initial sync done");
        on_ready();

        let on_message = Arc::new(on_message);
        self.client.add_event_handler(
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, &on_message) }
            },
        );

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;
                if let Err(e) = self.store.save_sync_token(response.next_batch).await {
                    error!("failed to save sync token: {:?}", e);
                }
                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

async fn auto_join_rooms(member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };
    if member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("joining room {}", room.room_id());
        let mut delay = 2;

        // Synapse can send the invite before the room is joinable
        while let Err(e) = room.join().await {
            if delay > MAX_JOIN_DELAY_SECS {
                error!("giving up joining room {} ({e:?})", room.room_id());
                return;
            }
            warn!(
                "failed to join room {} ({e:?}), retrying in {delay}s",
                room.room_id()
            );
            sleep(Duration::from_secs(delay)).await;
            delay *= 2;
        }
        info!("joined room {}", room.room_id());
    });
}

fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &Arc<F>)
where
    F: Fn(String, String, String, String),
{
    if room.state() != RoomState::Joined {
        return;
    }

    let MessageType::Text(text) = event.content.msgtype else {
        return;
    };

    on_message(
        text.body,
        room.room_id().to_string(),
        event.sender.to_string(),
        event.event_id.to_string(),
    );
}
