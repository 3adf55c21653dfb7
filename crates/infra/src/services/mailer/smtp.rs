use super::{Email, IMailer};
use crate::config::SmtpConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::error;

/// Port on which the relay expects TLS from the first byte
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends emails through an SMTP relay. Port 465 uses implicit TLS, every
/// other port upgrades with STARTTLS when the relay offers it.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> anyhow::Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::Error::msg(format!("Invalid MAIL_FROM: {}. {}", config.from, e)))?;

        let tls_parameters = TlsParameters::new(config.host.clone())?;
        let tls = if config.port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls);
        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn build_message(from: &Mailbox, email: &Email) -> anyhow::Result<Message> {
    let to = Mailbox::new(email.to_name.clone(), email.to.parse::<Address>()?);
    let message = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())?;
    Ok(message)
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        let message = build_message(&self.from, email)?;
        self.transport.send(message).await.map_err(|e| {
            error!("[Network Error] SMTP relay send error. Error message: {:?}", e);
            anyhow::Error::new(e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn email(to: &str) -> Email {
        Email {
            to: to.into(),
            to_name: Some("Nora".into()),
            subject: "Reminder".into(),
            html: "<p>Main stage in 15 min</p>".into(),
        }
    }

    fn sender() -> Mailbox {
        "Aurora Fest <noreply@aurora-fest.example>".parse().unwrap()
    }

    #[test]
    fn builds_html_message() {
        let message = build_message(&sender(), &email("nora@example.com")).unwrap();

        let envelope = message.envelope();
        assert_eq!(
            envelope.from().map(|a| a.to_string()),
            Some("noreply@aurora-fest.example".to_string())
        );
        assert_eq!(
            envelope.to().iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            vec!["nora@example.com".to_string()]
        );

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Reminder"));
        assert!(formatted.contains("Content-Type: text/html"));
        assert!(formatted.contains("<p>Main stage in 15 min</p>"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        assert!(build_message(&sender(), &email("not an address")).is_err());
    }

    #[tokio::test]
    async fn rejects_invalid_sender() {
        let config = SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: None,
            password: None,
            from: "not an address".into(),
        };
        assert!(SmtpMailer::new(config).is_err());
    }
}
