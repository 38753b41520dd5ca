//! Persistence of the channel room id.
//!
//! The disconnect command replaces the channel room with a fresh one, so the
//! new id is written to the data directory and takes precedence over the
//! configured one on the next start.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Serialize, Deserialize)]
struct PersistedChannel {
    room_id: String,
}

#[derive(Clone)]
pub struct ChannelStore {
    path: String,
}

impl ChannelStore {
    pub fn new(path: String) -> Self {
        ChannelStore { path }
    }

    pub async fn load(&self) -> Option<String> {
        let Ok(serialized) = fs::read_to_string(&self.path).await else {
            warn!("no persisted channel found");
            return None;
        };

        let Ok(channel) = serde_json::from_str::<PersistedChannel>(&serialized) else {
            error!("failed to deserialize persisted channel, ignoring it");
            return None;
        };

        info!("loaded persisted channel {}", channel.room_id);

        Some(channel.room_id)
    }

    pub async fn persist(&self, room_id: &str) -> Result<(), anyhow::Error> {
        let serialized = serde_json::to_string(&PersistedChannel {
            room_id: room_id.to_owned(),
        })?;
        fs::write(&self.path, serialized).await?;

        info!("persisted channel {}", room_id);
        Ok(())
    }

    /// The persisted channel if any, `configured` otherwise.
    pub async fn resolve(&self, configured: &str) -> String {
        self.load().await.unwrap_or_else(|| configured.to_owned())
    }
}
