use aurora_fest_domain::{FestivalEvent, User, UserRole, ID};
use aurora_fest_infra::{FestContext, InMemoryMailer, InMemoryPushNotifier, ManualSys};
use std::sync::Arc;

pub const MINUTE: i64 = 60 * 1000;
pub const NOW: i64 = 1_720_000_000_000;
pub const JWT_SECRET: &str = "session-secret";

/// In-memory context with a clock standing still at `NOW` and handles on
/// the transports so that tests can inspect what was delivered
pub struct TestContext {
    pub ctx: FestContext,
    pub sys: ManualSys,
    pub mailer: Arc<InMemoryMailer>,
    pub push: Arc<InMemoryPushNotifier>,
}

pub fn setup() -> TestContext {
    let mut ctx = FestContext::create_inmemory();
    let sys = ManualSys::new(NOW);
    let mailer = Arc::new(InMemoryMailer::new());
    let push = Arc::new(InMemoryPushNotifier::new("push-key", "push-secret"));
    ctx.sys = Arc::new(sys.clone());
    ctx.mailer = mailer.clone();
    ctx.push = push.clone();
    ctx.config.auth_jwt_secret = JWT_SECRET.into();
    ctx.config.reminder_link_secret = "link-secret".into();
    ctx.config.app_base_url = "https://aurora.example".into();
    ctx.config.cron_secret = None;
    ctx.config.reminder_lookahead_millis = 5 * MINUTE;
    ctx.config.reminder_drift_back_millis = 2 * MINUTE;
    ctx.config.reminder_batch_size = 500;
    ctx.config.reminder_safety_margin_millis = 15 * 1000;

    TestContext {
        ctx,
        sys,
        mailer,
        push,
    }
}

pub async fn insert_user(ctx: &FestContext, id: i64, email_verified: bool, role: UserRole) -> User {
    let user = User {
        id: ID::from(id),
        email: format!("user{}@example.com", id),
        name: Some(format!("User {}", id)),
        email_verified,
        role,
    };
    ctx.repos.users.insert(&user).await.unwrap();
    user
}

pub async fn insert_event(ctx: &FestContext, id: i64, starts_in_minutes: i64) -> FestivalEvent {
    let event = FestivalEvent {
        id: ID::from(id),
        title: format!("Concert {}", id),
        start_ts: NOW + starts_in_minutes * MINUTE,
        end_ts: Some(NOW + (starts_in_minutes + 60) * MINUTE),
    };
    ctx.repos.events.insert(&event).await.unwrap();
    event
}
