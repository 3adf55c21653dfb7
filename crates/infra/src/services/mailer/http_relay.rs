use super::{Email, IMailer};
use crate::config::MailConfig;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct RelayAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelaySendEmailBody<'a> {
    sender: RelayAddress<'a>,
    to: Vec<RelayAddress<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

/// Sends emails through a transactional mail relay exposing a JSON HTTP API
/// authenticated by an `api-key` header
pub struct HttpRelayMailer {
    client: Client,
    config: MailConfig,
}

impl HttpRelayMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl IMailer for HttpRelayMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        let body = RelaySendEmailBody {
            sender: RelayAddress {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            to: vec![RelayAddress {
                email: &email.to,
                name: email.to_name.as_deref(),
            }],
            subject: &email.subject,
            html_content: &email.html,
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Mail relay POST error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            })?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let text = res.text().await.unwrap_or_default();
        error!(
            "[Unexpected Response] Mail relay POST error. Status: {}, body: {}",
            status, text
        );
        Err(anyhow::Error::msg(format!(
            "Mail relay responded with status: {}",
            status
        )))
    }
}
