use super::{ChannelAuth, IPushNotifier};
use crate::config::PushConfig;
use chrono::Utc;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

fn hmac_hex(secret: &str, input: &str) -> anyhow::Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::Error::msg(format!("Invalid push secret: {}", e)))?;
    mac.update(input.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `{key}:{hex(hmac(secret, "{socket_id}:{channel}"))}`
pub(super) fn sign_channel(
    key: &str,
    secret: &str,
    socket_id: &str,
    channel: &str,
) -> anyhow::Result<ChannelAuth> {
    let signature = hmac_hex(secret, &format!("{}:{}", socket_id, channel))?;
    Ok(ChannelAuth {
        auth: format!("{}:{}", key, signature),
    })
}

#[derive(Debug, Serialize)]
struct TriggerBody<'a> {
    name: &'a str,
    channels: [&'a str; 1],
    /// The broker expects the payload as a JSON encoded string
    data: String,
}

/// Client of the Pusher HTTP API
pub struct PusherClient {
    client: Client,
    config: PushConfig,
}

impl PusherClient {
    pub fn new(config: PushConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn events_path(&self) -> String {
        format!("/apps/{}/events", self.config.app_id)
    }

    /// Query string of a signed request to the events endpoint
    fn signed_query(&self, body: &str, auth_timestamp: i64) -> anyhow::Result<String> {
        let body_md5 = hex::encode(Md5::digest(body.as_bytes()));
        // Parameters have to be sorted by key for the signature
        let query = format!(
            "auth_key={}&auth_timestamp={}&auth_version=1.0&body_md5={}",
            self.config.key, auth_timestamp, body_md5
        );
        let string_to_sign = format!("POST\n{}\n{}", self.events_path(), query);
        let auth_signature = hmac_hex(&self.config.secret, &string_to_sign)?;
        Ok(format!("{}&auth_signature={}", query, auth_signature))
    }
}

#[async_trait::async_trait]
impl IPushNotifier for PusherClient {
    async fn trigger(
        &self,
        channel: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<()> {
        let body = serde_json::to_string(&TriggerBody {
            name: event,
            channels: [channel],
            data: payload.to_string(),
        })?;
        let query = self.signed_query(&body, Utc::now().timestamp())?;
        let url = format!("{}{}?{}", self.config.base_url(), self.events_path(), query);

        let res = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Pusher trigger error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let text = res.text().await.unwrap_or_default();
        error!(
            "[Unexpected Response] Pusher trigger error. Status: {}, body: {}",
            status, text
        );
        Err(anyhow::Error::msg(format!(
            "Pusher responded with status: {}",
            status
        )))
    }

    fn authorize_channel(&self, socket_id: &str, channel: &str) -> anyhow::Result<ChannelAuth> {
        sign_channel(&self.config.key, &self.config.secret, socket_id, channel)
    }
}
