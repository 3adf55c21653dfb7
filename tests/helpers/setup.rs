use aurora_fest_api::Application;
use aurora_fest_domain::{FestivalEvent, User, UserRole, ID};
use aurora_fest_infra::{
    Config, FestContext, InMemoryMailer, InMemoryPushNotifier, ManualSys,
};
use aurora_fest_sdk::FestSDK;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;

pub const MINUTE: i64 = 60 * 1000;
/// 2024-07-03T09:46:40Z
pub const NOW: i64 = 1_720_000_000_000;
pub const JWT_SECRET: &str = "session-secret";
pub const LINK_SECRET: &str = "link-secret";

pub struct TestApp {
    pub ctx: FestContext,
    pub sys: ManualSys,
    pub mailer: Arc<InMemoryMailer>,
    pub push: Arc<InMemoryPushNotifier>,
    pub address: String,
}

impl TestApp {
    pub async fn insert_user(&self, id: i64, email_verified: bool, role: UserRole) -> User {
        let user = User {
            id: ID::from(id),
            email: format!("user{}@example.com", id),
            name: Some(format!("User {}", id)),
            email_verified,
            role,
        };
        self.ctx
            .repos
            .users
            .insert(&user)
            .await
            .expect("Expected to insert user");
        user
    }

    pub async fn insert_event(&self, id: i64, starts_in_minutes: i64) -> FestivalEvent {
        let event = FestivalEvent {
            id: ID::from(id),
            title: format!("Concert {}", id),
            start_ts: NOW + starts_in_minutes * MINUTE,
            end_ts: Some(NOW + (starts_in_minutes + 60) * MINUTE),
        };
        self.ctx
            .repos
            .events
            .insert(&event)
            .await
            .expect("Expected to insert event");
        event
    }

    /// Session token as issued by the main festival application
    pub fn session_token(&self, user_id: &ID) -> String {
        let claims = json!({
            "id": user_id.to_string(),
            "exp": 4_000_000_000u64,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("Expected to sign session token")
    }

    pub fn sdk_for(&self, user: &User) -> FestSDK {
        FestSDK::new(self.address.clone(), self.session_token(&user.id))
    }

    pub fn anonymous_sdk(&self) -> FestSDK {
        FestSDK::new(self.address.clone(), "")
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    spawn_app_with_config(|_| {}).await
}

pub async fn spawn_app_with_config(configure: impl FnOnce(&mut Config)) -> TestApp {
    let mut ctx = FestContext::create_inmemory();
    let sys = ManualSys::new(NOW);
    let mailer = Arc::new(InMemoryMailer::new());
    let push = Arc::new(InMemoryPushNotifier::new("push-key", "push-secret"));
    ctx.sys = Arc::new(sys.clone());
    ctx.mailer = mailer.clone();
    ctx.push = push.clone();

    ctx.config.port = 0; // Random port
    ctx.config.auth_jwt_secret = JWT_SECRET.into();
    ctx.config.reminder_link_secret = LINK_SECRET.into();
    ctx.config.app_base_url = "https://aurora.example".into();
    ctx.config.cron_secret = None;
    ctx.config.run_internal_sweeper = false;
    ctx.config.reminder_lookahead_millis = 5 * MINUTE;
    ctx.config.reminder_drift_back_millis = 2 * MINUTE;
    ctx.config.reminder_batch_size = 500;
    ctx.config.reminder_safety_margin_millis = 15 * 1000;
    configure(&mut ctx.config);

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        ctx,
        sys,
        mailer,
        push,
        address,
    }
}
