//! Page fetching. The only component that touches the network; the
//! core pipeline consumes the returned markup as an opaque text blob.

use agenda_core::{AgendaError, AgendaResult};
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = "agenda-cli/0.1 (+https://github.com/agenda-cultural/agenda-cli)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared HTTP client. The timeout doubles as the per-source
/// deadline: a source slower than this counts as a failed source.
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch one venue page as text.
pub async fn fetch_page(client: &Client, name: &str, url: &str) -> AgendaResult<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(name, e))?
        .error_for_status()
        .map_err(|e| fetch_error(name, e))?;

    response.text().await.map_err(|e| fetch_error(name, e))
}

fn fetch_error(name: &str, error: reqwest::Error) -> AgendaError {
    AgendaError::Fetch {
        name: name.to_string(),
        message: error.to_string(),
    }
}
