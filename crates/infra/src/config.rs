use aurora_fest_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

/// Reminders are only scheduled when they fire strictly later than
/// `now + REMINDER_SAFETY_MARGIN_MILLIS`
const REMINDER_SAFETY_MARGIN_MILLIS: i64 = 15 * 1000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Public origin of the festival web application, used to build the
    /// links sent in reminder emails
    pub app_base_url: String,
    /// How far ahead of `now` a sweep delivers reminders
    pub reminder_lookahead_millis: i64,
    /// How far behind `now` a sweep still delivers reminders that a late or
    /// skipped sweep missed
    pub reminder_drift_back_millis: i64,
    /// Maximum number of reminders delivered by a single sweep
    pub reminder_batch_size: i64,
    pub reminder_safety_margin_millis: i64,
    /// Secret used to sign the links sent in reminder emails
    pub reminder_link_secret: String,
    /// Secret the main application signs its session tokens with
    pub auth_jwt_secret: String,
    /// When set, the sweep endpoint requires the `x-cron-secret` header
    pub cron_secret: Option<String>,
    /// Run the sweep every minute from within the server instead of waiting
    /// for an external scheduler to call the sweep endpoint
    pub run_internal_sweeper: bool,
    pub smtp: Option<SmtpConfig>,
    pub mail: Option<MailConfig>,
    pub push: Option<PushConfig>,
}

/// Submission port used when `SMTP_PORT` is not set
const DEFAULT_SMTP_PORT: u16 = 587;

/// Credentials of the SMTP relay, preferred over the HTTP mail relay
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `MAIL_FROM`, either `noreply@host` or `Name <noreply@host>`
    pub from: String,
}

impl SmtpConfig {
    /// Reads the `SMTP_*` and `MAIL_FROM` variables through `lookup`. Returns
    /// `None` when `SMTP_HOST` is missing or no sender can be derived.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let host = lookup("SMTP_HOST")?;
        let port = match lookup("SMTP_PORT") {
            Some(port) => port.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "The given SMTP_PORT: {} is not valid, falling back to the default value: {}.",
                    port, DEFAULT_SMTP_PORT
                );
                DEFAULT_SMTP_PORT
            }),
            None => DEFAULT_SMTP_PORT,
        };
        let username = lookup("SMTP_USER");
        let from = match lookup("MAIL_FROM").or_else(|| username.clone()) {
            Some(from) => from,
            None => {
                warn!("SMTP_HOST is set but neither MAIL_FROM nor SMTP_USER is. The SMTP relay is disabled.");
                return None;
            }
        };

        Some(Self {
            host,
            port,
            username,
            password: lookup("SMTP_PASS"),
            from,
        })
    }
}

/// Credentials of the transactional mail relay
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
}

/// Credentials of the Pusher compatible push broker
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    pub cluster: String,
    /// Overrides the host derived from the cluster
    pub host: Option<String>,
}

impl PushConfig {
    pub fn base_url(&self) -> String {
        match &self.host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("https://{}", host.trim_end_matches('/')),
            None => format!("https://api-{}.pusher.com", self.cluster),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env_var(name) {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        None => default,
    }
}

fn parse_positive_or_default(name: &str, default: i64) -> i64 {
    let value = parse_or_default(name, default);
    if value > 0 {
        value
    } else {
        warn!(
            "The given {}: {} must be positive, falling back to the default value: {}.",
            name, value, default
        );
        default
    }
}

fn parse_flag(name: &str) -> bool {
    matches!(
        env_var(name).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

impl Config {
    pub fn new() -> Self {
        let port = parse_or_default("PORT", 5000_usize);
        let app_base_url = env_var("APP_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let window_minutes = parse_positive_or_default("REMINDER_WINDOW_MINUTES", 5);
        let drift_back_seconds = parse_positive_or_default("REMINDER_DRIFT_BACK_SECONDS", 120);
        let reminder_batch_size = parse_positive_or_default("REMINDER_BATCH_SIZE", 500);

        let reminder_link_secret = match env_var("REMINDER_LINK_SECRET") {
            Some(secret) => secret,
            None => {
                warn!("Did not find REMINDER_LINK_SECRET environment variable. Going to create one, links in emails already sent will stop verifying after a restart.");
                create_random_secret(32)
            }
        };

        let auth_jwt_secret = match env_var("AUTH_JWT_SECRET").or_else(|| env_var("NEXTAUTH_SECRET"))
        {
            Some(secret) => secret,
            None => {
                warn!("Did not find AUTH_JWT_SECRET or NEXTAUTH_SECRET environment variable. Going to create one, no session token of the main application will be accepted.");
                create_random_secret(32)
            }
        };

        let cron_secret = env_var("CRON_SECRET");
        if cron_secret.is_none() {
            info!("Did not find CRON_SECRET environment variable. The reminder sweep endpoint is not protected.");
        }

        let smtp = SmtpConfig::from_lookup(env_var);
        let mail = Self::mail_from_env();
        if smtp.is_none() && mail.is_none() {
            warn!("Neither SMTP_HOST nor MAIL_API_URL, MAIL_API_KEY and MAIL_FROM are set. Reminder emails will not be sent.");
        }

        Self {
            port,
            app_base_url,
            reminder_lookahead_millis: window_minutes * 60 * 1000,
            reminder_drift_back_millis: drift_back_seconds * 1000,
            reminder_batch_size,
            reminder_safety_margin_millis: REMINDER_SAFETY_MARGIN_MILLIS,
            reminder_link_secret,
            auth_jwt_secret,
            cron_secret,
            run_internal_sweeper: parse_flag("REMINDER_INTERNAL_SWEEP"),
            smtp,
            mail,
            push: Self::push_from_env(),
        }
    }

    fn mail_from_env() -> Option<MailConfig> {
        match (env_var("MAIL_API_URL"), env_var("MAIL_API_KEY"), env_var("MAIL_FROM")) {
            (Some(api_url), Some(api_key), Some(from_email)) => Some(MailConfig {
                api_url,
                api_key,
                from_email,
                from_name: env_var("MAIL_FROM_NAME").unwrap_or_else(|| "Aurora Fest".into()),
            }),
            _ => None,
        }
    }

    fn push_from_env() -> Option<PushConfig> {
        match (
            env_var("PUSHER_APP_ID"),
            env_var("PUSHER_KEY"),
            env_var("PUSHER_SECRET"),
        ) {
            (Some(app_id), Some(key), Some(secret)) => Some(PushConfig {
                app_id,
                key,
                secret,
                cluster: env_var("PUSHER_CLUSTER").unwrap_or_else(|| "eu".into()),
                host: env_var("PUSHER_HOST"),
            }),
            _ => {
                warn!("PUSHER_APP_ID, PUSHER_KEY and PUSHER_SECRET are not all set. Push notifications are disabled.");
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn push_config(host: Option<&str>) -> PushConfig {
        PushConfig {
            app_id: "1".into(),
            key: "key".into(),
            secret: "secret".into(),
            cluster: "eu".into(),
            host: host.map(String::from),
        }
    }

    #[test]
    fn push_base_url_defaults_to_cluster_host() {
        assert_eq!(push_config(None).base_url(), "https://api-eu.pusher.com");
        assert_eq!(
            push_config(Some("push.example.com")).base_url(),
            "https://push.example.com"
        );
        assert_eq!(
            push_config(Some("http://127.0.0.1:4000/")).base_url(),
            "http://127.0.0.1:4000"
        );
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn parses_smtp_relay() {
        let smtp = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASS", "hunter2"),
            ("MAIL_FROM", "Aurora Fest <noreply@aurora-fest.example>"),
        ]));
        assert_eq!(
            smtp,
            Some(SmtpConfig {
                host: "smtp.example.com".into(),
                port: 587,
                username: Some("mailer".into()),
                password: Some("hunter2".into()),
                from: "Aurora Fest <noreply@aurora-fest.example>".into(),
            })
        );

        let smtp = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USER", "noreply@aurora-fest.example"),
        ]))
        .unwrap();
        assert_eq!(smtp.port, 465);
        assert_eq!(smtp.from, "noreply@aurora-fest.example");
        assert_eq!(smtp.password, None);

        let smtp = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("MAIL_FROM", "noreply@aurora-fest.example"),
        ]))
        .unwrap();
        assert_eq!(smtp.port, 587);
    }

    #[test]
    fn smtp_relay_needs_host_and_sender() {
        assert_eq!(
            SmtpConfig::from_lookup(lookup(&[("MAIL_FROM", "noreply@aurora-fest.example")])),
            None
        );
        assert_eq!(
            SmtpConfig::from_lookup(lookup(&[("SMTP_HOST", "smtp.example.com")])),
            None
        );
    }

    #[test]
    fn falls_back_to_defaults_on_invalid_values() {
        std::env::set_var("AURORA_TEST_INVALID_NUMBER", "abc");
        assert_eq!(parse_or_default("AURORA_TEST_INVALID_NUMBER", 5_i64), 5);
        std::env::set_var("AURORA_TEST_NEGATIVE_NUMBER", "-2");
        assert_eq!(parse_positive_or_default("AURORA_TEST_NEGATIVE_NUMBER", 5), 5);
        std::env::set_var("AURORA_TEST_VALID_NUMBER", " 12 ");
        assert_eq!(parse_positive_or_default("AURORA_TEST_VALID_NUMBER", 5), 12);
        assert_eq!(parse_or_default("AURORA_TEST_MISSING_NUMBER", 7_i64), 7);
    }

    #[test]
    fn parses_flags() {
        std::env::set_var("AURORA_TEST_FLAG_ON", "TRUE");
        assert!(parse_flag("AURORA_TEST_FLAG_ON"));
        std::env::set_var("AURORA_TEST_FLAG_OFF", "0");
        assert!(!parse_flag("AURORA_TEST_FLAG_OFF"));
        assert!(!parse_flag("AURORA_TEST_FLAG_MISSING"));
    }
}
