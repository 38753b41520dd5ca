use std::time::Duration;

use log::info;

/// Asks an echo service (e.g. `https://v4.ident.me/`) for this host's public address.
pub async fn lookup_public_address(url: &str, timeout: Duration) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let address = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?
        .trim()
        .to_owned();

    info!("public address resolved to {}", address);

    Ok(address)
}
