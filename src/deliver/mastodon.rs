// Mastodon sink — posts each boost as a status via the REST API.
//
// Mastodon has no channel concept, so the profile disables fan-out and
// the routed channel set is ignored. Statuses are capped at 500
// characters on a stock instance; the chunker splits anything longer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::message::{Emphasis, ProtocolProfile};

use super::BoostSink;

/// Stock Mastodon status length limit.
const STATUS_LIMIT: usize = 500;

pub struct MastodonSink {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MastodonSink {
    /// Connect and verify the access token. A bad token is a fatal
    /// startup error — the bot must not run half-configured.
    pub async fn connect(instance: &str, access_token: &str) -> Result<Self> {
        let sink = Self {
            client: Client::new(),
            base_url: instance.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        };

        let url = format!("{}/api/v1/accounts/verify_credentials", sink.base_url);
        let response = sink
            .client
            .get(&url)
            .bearer_auth(&sink.access_token)
            .send()
            .await
            .context("Failed to reach Mastodon instance")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Mastodon credential check returned {status}");
        }

        let account: Account = response
            .json()
            .await
            .context("Failed to parse Mastodon account")?;
        info!(instance = %sink.base_url, acct = %account.acct, "Connected to Mastodon");

        Ok(sink)
    }
}

#[async_trait]
impl BoostSink for MastodonSink {
    fn name(&self) -> &'static str {
        "mastodon"
    }

    fn profile(&self) -> ProtocolProfile {
        ProtocolProfile {
            emphasis: Emphasis::None,
            max_length: Some(STATUS_LIMIT),
            multi_channel: false,
        }
    }

    async fn deliver(&self, _channel: &str, text: &str) -> Result<()> {
        let url = format!("{}/api/v1/statuses", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&NewStatus { status: text })
            .send()
            .await
            .context("Failed to post Mastodon status")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mastodon status post returned {status}: {body}");
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct NewStatus<'a> {
    status: &'a str,
}

#[derive(Deserialize)]
struct Account {
    acct: String,
}
