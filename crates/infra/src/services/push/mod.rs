mod pusher;

pub use pusher::PusherClient;
use pusher::sign_channel;
use serde::Serialize;
use std::sync::Mutex;

/// Response of the push channel authorization handshake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAuth {
    pub auth: String,
}

#[async_trait::async_trait]
pub trait IPushNotifier: Send + Sync {
    /// Publishes `event` with `payload` on `channel`. Delivery is at most
    /// once, clients that are offline never see the event.
    async fn trigger(
        &self,
        channel: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<()>;
    /// Signs the subscription of the socket to the private channel
    fn authorize_channel(&self, socket_id: &str, channel: &str) -> anyhow::Result<ChannelAuth>;
}

/// Used when no push broker is configured
pub struct DisabledPushNotifier {}

#[async_trait::async_trait]
impl IPushNotifier for DisabledPushNotifier {
    async fn trigger(
        &self,
        channel: &str,
        event: &str,
        _payload: &serde_json::Value,
    ) -> anyhow::Result<()> {
        Err(anyhow::Error::msg(format!(
            "No push broker is configured, dropping event: {} on channel: {}",
            event, channel
        )))
    }

    fn authorize_channel(&self, _socket_id: &str, _channel: &str) -> anyhow::Result<ChannelAuth> {
        Err(anyhow::Error::msg("No push broker is configured"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushedEvent {
    pub channel: String,
    pub event: String,
    pub payload: serde_json::Value,
}

/// Keeps every triggered event in memory, used when testing
pub struct InMemoryPushNotifier {
    key: String,
    secret: String,
    pushed: Mutex<Vec<PushedEvent>>,
    failing: Mutex<bool>,
}

impl InMemoryPushNotifier {
    pub fn new(key: &str, secret: &str) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            pushed: Mutex::new(vec![]),
            failing: Mutex::new(false),
        }
    }

    pub fn pushed(&self) -> Vec<PushedEvent> {
        self.pushed.lock().unwrap().clone()
    }

    /// Makes every following trigger fail until turned off again
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait::async_trait]
impl IPushNotifier for InMemoryPushNotifier {
    async fn trigger(
        &self,
        channel: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(anyhow::Error::msg("Push broker unavailable"));
        }
        self.pushed.lock().unwrap().push(PushedEvent {
            channel: channel.into(),
            event: event.into(),
            payload: payload.clone(),
        });
        Ok(())
    }

    fn authorize_channel(&self, socket_id: &str, channel: &str) -> anyhow::Result<ChannelAuth> {
        sign_channel(&self.key, &self.secret, socket_id, channel)
    }
}
