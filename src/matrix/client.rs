//! High level Matrix client used by the bot.

use anyhow::{Context, anyhow};
use log::{debug, error, info};
use matrix_sdk::{
    Client, Room, RoomMemberships,
    ruma::{
        EventId, OwnedUserId, RoomId, UserId,
        api::client::room::create_room::v3::Request as CreateRoomRequest,
        events::room::message::{
            AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent,
        },
    },
};

use crate::matrix::{
    Credentials, encryption::setup_client, session::SessionStore, sync::MatrixSync,
};

const DISPLAY_NAME: &str = "Chikis";

pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in, or restores the session saved in `session_path`.
    pub async fn new(credentials: &Credentials, session_path: &str) -> anyhow::Result<Self> {
        let store = SessionStore::open(session_path).await;
        let client = setup_client(credentials, &store)
            .await
            .context("failed to setup matrix client")?;

        client.account().set_display_name(Some(DISPLAY_NAME)).await?;

        let matrix_sync = MatrixSync::new(&client, &store);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    pub async fn sync<R, F>(&self, on_ready: R, on_message: F) -> anyhow::Result<()>
    where
        R: FnOnce(),
        F: Fn(String, String, String, String) + Send + Sync + 'static,
    {
        self.matrix_sync.sync(on_ready, on_message).await
    }

    pub fn is_own_user(&self, user_id: &str) -> bool {
        self.client
            .user_id()
            .is_some_and(|own| own.as_str() == user_id)
    }

    fn room(&self, room_id: &str) -> anyhow::Result<Room> {
        let room_id = RoomId::parse(room_id)?;
        self.client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("unknown room {}", room_id))
    }

    /// Display name of `user_id` in the room, its localpart when unknown.
    pub async fn member_name(&self, room_id: &str, user_id: &str) -> String {
        let Ok(parsed) = UserId::parse(user_id) else {
            return user_id.to_owned();
        };

        if let Ok(room) = self.room(room_id)
            && let Ok(Some(member)) = room.get_member(&parsed).await
        {
            return member.name().to_owned();
        }

        parsed.localpart().to_owned()
    }

    /// Sends `body` to the room. Returns the id of the sent event.
    pub async fn send_markdown(&self, room_id: &str, body: &str) -> Option<String> {
        self.send(room_id, RoomMessageEventContent::text_markdown(body))
            .await
    }

    /// Sends `body` as a reply to `event_id`. Returns the id of the sent event.
    pub async fn send_reply(
        &self,
        room_id: &str,
        sender_id: &str,
        event_id: &str,
        body: &str,
    ) -> Option<String> {
        let (Ok(sender), Ok(event)) = (UserId::parse(sender_id), EventId::parse(event_id)) else {
            error!("invalid reply target {} / {}", sender_id, event_id);
            return None;
        };

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(room_id, content).await
    }

    async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> Option<String> {
        let room = match self.room(room_id) {
            Ok(room) => room,
            Err(e) => {
                error!("failed to send message: {:?}", e);
                return None;
            }
        };

        match room.send(content).await {
            Ok(sent) => Some(sent.event_id.to_string()),
            Err(e) => {
                error!("failed to send message: {:?}", e);
                None
            }
        }
    }

    pub async fn redact(&self, room_id: &str, event_id: &str) -> anyhow::Result<()> {
        let room = self.room(room_id)?;
        let event_id = EventId::parse(event_id)?;
        room.redact(&event_id, None, None).await?;

        debug!("redacted {} in {}", event_id, room_id);
        Ok(())
    }

    /// Replaces a room by a new one with the same name and topic.
    ///
    /// Current members are invited to the new room, then the bot leaves the old
    /// one so its history is no longer reachable from the channel. Returns the
    /// id of the new room.
    pub async fn recreate_room(&self, room_id: &str) -> anyhow::Result<String> {
        let room = self.room(room_id)?;

        let invite: Vec<OwnedUserId> = room
            .members(RoomMemberships::JOIN)
            .await?
            .iter()
            .map(|member| member.user_id().to_owned())
            .filter(|user_id| !self.is_own_user(user_id.as_str()))
            .collect();

        let mut request = CreateRoomRequest::new();
        request.name = room.name();
        request.topic = room.topic();
        request.invite = invite;

        let new_room = self.client.create_room(request).await?;
        room.leave().await?;

        info!("room {} replaced by {}", room_id, new_room.room_id());
        Ok(new_room.room_id().to_string())
    }
}
