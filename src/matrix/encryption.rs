//! Login and end-to-end encryption setup.
//!
//! On the first start the bot logs in with its password, bootstraps cross
//! signing and enables recovery protected by the passphrase. Later starts
//! restore the saved session and import the secrets from secret storage.
//! Either way the device must end up verified.

use anyhow::{Context, anyhow, bail};
use log::{debug, info};
use matrix_sdk::{
    Client,
    encryption::{
        BackupDownloadStrategy, EncryptionSettings,
        recovery::{RecoveryError, RecoveryState},
    },
    ruma::{OwnedUserId, api::client::uiaa},
};

use crate::matrix::{Credentials, session::SessionStore};

const DEVICE_NAME: &str = "chikis bot";

async fn bootstrap_cross_signing(client: &Client, credentials: &Credentials) -> anyhow::Result<()> {
    let Err(error) = client
        .encryption()
        .bootstrap_cross_signing_if_needed(None)
        .await
    else {
        debug!("cross signing already set up");
        return Ok(());
    };

    // The server asks for interactive auth, answer it with the password
    let Some(response) = error.as_uiaa_response() else {
        bail!("cross signing bootstrap failed: {:?}", error);
    };
    let mut password = uiaa::Password::new(
        uiaa::UserIdentifier::UserIdOrLocalpart(credentials.user_id.to_owned()),
        credentials.password.to_owned(),
    );
    password.session = response.session.clone();

    client
        .encryption()
        .bootstrap_cross_signing(Some(uiaa::AuthData::Password(password)))
        .await?;

    debug!("cross signing set up");
    Ok(())
}

async fn enable_recovery(client: &Client, credentials: &Credentials) -> anyhow::Result<()> {
    match client
        .encryption()
        .recovery()
        .enable()
        .with_passphrase(&credentials.passphrase)
        .await
    {
        Ok(_) => debug!("recovery enabled"),
        Err(RecoveryError::BackupExistsOnServer) => debug!("recovery already enabled"),
        Err(e) => bail!("error enabling recovery: {:?}", e),
    }
    Ok(())
}

async fn check_encryption(client: &Client) -> anyhow::Result<()> {
    if client.encryption().recovery().state() != RecoveryState::Enabled {
        bail!("recovery is disabled after setting up encryption");
    }

    let device = client
        .encryption()
        .get_own_device()
        .await?
        .ok_or_else(|| anyhow!("own device not found"))?;
    if !device.is_verified() {
        bail!("device is not verified after setting up encryption");
    }

    Ok(())
}

async fn login(credentials: &Credentials, store: &SessionStore) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = credentials.user_id.clone().try_into()?;
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), Some(&credentials.passphrase))
        .with_encryption_settings(EncryptionSettings {
            auto_enable_cross_signing: true,
            backup_download_strategy: BackupDownloadStrategy::default(),
            auto_enable_backups: true,
        })
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(user_id, &credentials.password)
        .initial_device_display_name(DEVICE_NAME)
        .send()
        .await?;

    bootstrap_cross_signing(&client, credentials).await?;
    enable_recovery(&client, credentials).await?;

    client
        .encryption()
        .recovery()
        .recover(&credentials.passphrase)
        .await
        .context("failed to recover secrets")?;

    check_encryption(&client).await?;

    let user_session = client
        .matrix_auth()
        .session()
        .ok_or_else(|| anyhow!("no session after login"))?;
    store
        .save_user_session(&user_session)
        .await
        .context("failed to save user session")?;

    info!("logged in as {}", credentials.user_id);
    Ok(client)
}

async fn restore(
    credentials: &Credentials,
    store: &SessionStore,
    user_session: &matrix_sdk::authentication::matrix::MatrixSession,
) -> anyhow::Result<Client> {
    let user_id: OwnedUserId = credentials.user_id.clone().try_into()?;
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), Some(&credentials.passphrase))
        .build()
        .await?;

    client.restore_session(user_session.clone()).await?;

    client
        .encryption()
        .secret_storage()
        .open_secret_store(&credentials.passphrase)
        .await
        .context("failed to open secret store")?
        .import_secrets()
        .await
        .context("failed to import secrets")?;

    check_encryption(&client).await?;

    info!("restored session of {}", credentials.user_id);
    Ok(client)
}

/// Returns a logged in client with working encryption.
pub async fn setup_client(credentials: &Credentials, store: &SessionStore) -> anyhow::Result<Client> {
    match store.user_session() {
        Some(user_session) => restore(credentials, store, user_session).await,
        None => login(credentials, store).await,
    }
}
