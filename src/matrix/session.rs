//! On-disk Matrix session.
//!
//! The session directory holds the SQLite crypto store and a JSON file with the
//! login tokens and the last sync token, so the bot can restart without logging
//! in again and without replaying old messages.

use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::utils::get_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    user_session: matrix::MatrixSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

#[derive(Clone)]
pub struct SessionStore {
    saved: Option<SessionFile>,
    sqlite_path: String,
    session_path: String,
}

impl SessionStore {
    /// Opens the session directory, reading the saved session when there is a valid one.
    pub async fn open(dir_path: &str) -> Self {
        let sqlite_path = get_path(dir_path, "sqlite");
        let session_path = get_path(dir_path, "session");

        let saved = read_session_file(&session_path).await;
        debug!(
            "session store at {} (saved session: {})",
            dir_path,
            saved.is_some()
        );

        SessionStore {
            saved,
            sqlite_path,
            session_path,
        }
    }

    pub fn sqlite_path(&self) -> &str {
        &self.sqlite_path
    }

    pub fn user_session(&self) -> Option<&matrix::MatrixSession> {
        self.saved.as_ref().map(|s| &s.user_session)
    }

    pub fn sync_token(&self) -> Option<String> {
        self.saved.as_ref().and_then(|s| s.sync_token.clone())
    }

    pub async fn save_user_session(
        &self,
        user_session: &matrix::MatrixSession,
    ) -> anyhow::Result<()> {
        let file = SessionFile {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&file)?).await?;

        trace!("user session saved");
        Ok(())
    }

    pub async fn save_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        let mut file: SessionFile =
            serde_json::from_str(&fs::read_to_string(&self.session_path).await?)?;
        file.sync_token = Some(sync_token);
        fs::write(&self.session_path, serde_json::to_string(&file)?).await?;

        trace!("sync token saved");
        Ok(())
    }
}

async fn read_session_file(path: &str) -> Option<SessionFile> {
    let content = fs::read_to_string(path).await.ok()?;
    serde_json::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_sdk::{SessionMeta, SessionTokens};
    use tempfile::TempDir;

    fn create_user_session() -> matrix::MatrixSession {
        matrix::MatrixSession {
            meta: SessionMeta {
                user_id: "@chikis:example.com".try_into().unwrap(),
                device_id: "CHIKISDEVICE".into(),
            },
            tokens: SessionTokens {
                access_token: "access_token".to_string(),
                refresh_token: None,
            },
        }
    }

    fn dir_path(dir: &TempDir) -> String {
        dir.path().to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_open_empty_directory() {
        let dir = TempDir::new().unwrap();

        let store = SessionStore::open(&dir_path(&dir)).await;

        assert!(store.user_session().is_none());
        assert!(store.sync_token().is_none());
        assert_eq!(store.sqlite_path(), get_path(&dir_path(&dir), "sqlite"));
    }

    #[tokio::test]
    async fn test_open_ignores_corrupted_session() {
        let dir = TempDir::new().unwrap();
        fs::write(get_path(&dir_path(&dir), "session"), "{ corrupted")
            .await
            .unwrap();

        let store = SessionStore::open(&dir_path(&dir)).await;

        assert!(store.user_session().is_none());
    }

    #[tokio::test]
    async fn test_saved_session_is_restored() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&dir)).await;

        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("s42_7".to_string()).await.unwrap();

        let reopened = SessionStore::open(&dir_path(&dir)).await;
        assert_eq!(
            reopened.user_session().unwrap().meta.user_id.to_string(),
            "@chikis:example.com"
        );
        assert_eq!(reopened.sync_token(), Some("s42_7".to_string()));
    }

    #[tokio::test]
    async fn test_new_login_clears_sync_token() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&dir)).await;
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("s1".to_string()).await.unwrap();

        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();

        let content = fs::read_to_string(get_path(&dir_path(&dir), "session"))
            .await
            .unwrap();
        assert!(!content.contains("sync_token"));
    }

    #[tokio::test]
    async fn test_save_sync_token_without_session_fails() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(&dir_path(&dir)).await;

        assert!(store.save_sync_token("s1".to_string()).await.is_err());
    }
}
