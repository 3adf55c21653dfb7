mod http_relay;
mod smtp;
pub mod templates;

pub use http_relay::HttpRelayMailer;
pub use smtp::SmtpMailer;
use std::sync::Mutex;

/// A rendered email ready to be handed to an `IMailer`
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, email: &Email) -> anyhow::Result<()>;
}

/// Used when no mail relay is configured. Every send fails so that callers
/// report the email as not sent.
pub struct DisabledMailer {}

#[async_trait::async_trait]
impl IMailer for DisabledMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        Err(anyhow::Error::msg(format!(
            "No mail relay is configured, dropping email: {}",
            email.subject
        )))
    }
}

/// Keeps every sent email in memory, used when testing
pub struct InMemoryMailer {
    outbox: Mutex<Vec<Email>>,
    failing: Mutex<bool>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(vec![]),
            failing: Mutex::new(false),
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.outbox.lock().unwrap().clone()
    }

    /// Makes every following send fail until turned off again
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(anyhow::Error::msg("Mail relay unavailable"));
        }
        self.outbox.lock().unwrap().push(email.clone());
        Ok(())
    }
}
