// Matrix sink — sends boosts into rooms over the client-server API.
//
// Logs in with a password at startup to obtain an access token (fatal on
// failure), then delivers each fragment as an m.room.message event. The
// routed channel identifiers are Matrix room ids.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::message::ProtocolProfile;

use super::BoostSink;

pub struct MatrixSink {
    client: Client,
    base_url: Url,
    access_token: String,
    /// Transaction ids must be unique per access token; a counter is enough
    /// for a single process.
    txn: AtomicU64,
}

impl MatrixSink {
    /// Log in with a password and keep the access token for the process
    /// lifetime.
    pub async fn login(homeserver: &str, user: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(homeserver)
            .with_context(|| format!("Invalid Matrix homeserver URL {homeserver:?}"))?;
        let client = Client::new();

        let url = base_url
            .join("/_matrix/client/v3/login")
            .context("Matrix homeserver URL cannot be a base")?;
        let body = json!({
            "type": "m.login.password",
            "identifier": { "type": "m.id.user", "user": user },
            "password": password,
        });

        let response = client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Matrix homeserver")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Matrix login returned {status}");
        }

        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse Matrix login response")?;
        info!(homeserver = %base_url, user_id = %login.user_id, "Logged in to Matrix");

        Ok(Self {
            client,
            base_url,
            access_token: login.access_token,
            txn: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl BoostSink for MatrixSink {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn profile(&self) -> ProtocolProfile {
        ProtocolProfile::plain()
    }

    async fn deliver(&self, channel: &str, text: &str) -> Result<()> {
        let txn = self.txn.fetch_add(1, Ordering::Relaxed);
        let url = room_message_url(&self.base_url, channel, txn)?;

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&RoomMessage {
                msgtype: "m.text",
                body: text,
            })
            .send()
            .await
            .with_context(|| format!("Failed to send to Matrix room {channel}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Matrix send to {channel} returned {status}: {body}");
        }

        Ok(())
    }
}

/// Build the send endpoint with the room id percent-encoded as a single
/// path segment. Room aliases start with '#', which a plain string
/// interpolation would turn into a URL fragment.
fn room_message_url(base: &Url, room: &str, txn: u64) -> Result<Url> {
    let mut url = base.clone();
    let txn_id = format!("boostbot{txn}");
    url.path_segments_mut()
        .map_err(|_| anyhow!("Matrix homeserver URL cannot be a base"))?
        .pop_if_empty()
        .extend([
            "_matrix",
            "client",
            "v3",
            "rooms",
            room,
            "send",
            "m.room.message",
            txn_id.as_str(),
        ]);
    Ok(url)
}

#[derive(Serialize)]
struct RoomMessage<'a> {
    msgtype: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    user_id: String,
}
