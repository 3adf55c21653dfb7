use aurora_fest_domain::{
    user_channel, FestivalEvent, Reminder, ReminderLinkClaims, ReminderLinkSigner, ReminderPush,
    User, REMINDER_PUSH_EVENT,
};
use aurora_fest_infra::{templates, FestContext};
use tracing::{error, info};

pub fn link_signer(ctx: &FestContext) -> anyhow::Result<ReminderLinkSigner> {
    ReminderLinkSigner::new(&ctx.config.reminder_link_secret)
        .map_err(|e| anyhow::Error::msg(format!("Invalid reminder link secret: {}", e)))
}

/// Signed deep link to the event page of the `Reminder`
fn reminder_link(reminder: &Reminder, ctx: &FestContext) -> anyhow::Result<String> {
    let claims = ReminderLinkClaims {
        event_id: reminder.event_id,
        reminder_id: reminder.id,
        user_id: reminder.user_id,
        delay: reminder.delay,
    };
    let link = link_signer(ctx)?.build_link(&ctx.config.app_base_url, &claims)?;
    Ok(link.to_string())
}

/// Confirms an activation by email. The link points at the reminder that
/// fires first. Returns whether the email was sent.
pub async fn send_activation_email(
    user: &User,
    event: &FestivalEvent,
    created: &[Reminder],
    ctx: &FestContext,
) -> bool {
    if !user.can_receive_email() {
        info!(
            "User: {} has no verified email address, skipping activation email",
            user.id
        );
        return false;
    }
    let nearest = match created.iter().min_by_key(|r| r.delay.minutes()) {
        Some(reminder) => reminder,
        None => return false,
    };
    let link = match reminder_link(nearest, ctx) {
        Ok(link) => link,
        Err(e) => {
            error!("Unable to build reminder link. Error: {:?}", e);
            return false;
        }
    };
    let delays = created.iter().map(|r| r.delay).collect::<Vec<_>>();
    let email = templates::reminder_activated_email(user, event, &delays, &link);

    match ctx.mailer.send(&email).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Unable to send activation email for event: {} to user: {}. Error: {:?}",
                event.id, user.id, e
            );
            false
        }
    }
}

/// Returns whether the reminder email was sent
pub async fn send_reminder_email(
    user: &User,
    event: &FestivalEvent,
    reminder: &Reminder,
    ctx: &FestContext,
) -> bool {
    let link = match reminder_link(reminder, ctx) {
        Ok(link) => link,
        Err(e) => {
            error!(
                "Unable to build link for reminder: {}. Error: {:?}",
                reminder.id, e
            );
            return false;
        }
    };
    let email = templates::reminder_email(user, event, reminder.delay, &link);

    match ctx.mailer.send(&email).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Unable to send email for reminder: {}. Error: {:?}",
                reminder.id, e
            );
            false
        }
    }
}

/// Publishes the reminder on the private channel of its user. Returns
/// whether the push broker accepted the event.
pub async fn publish_reminder_push(
    reminder: &Reminder,
    event: &FestivalEvent,
    ctx: &FestContext,
) -> bool {
    let payload = match serde_json::to_value(ReminderPush::new(reminder, event)) {
        Ok(payload) => payload,
        Err(e) => {
            error!(
                "Unable to serialize push for reminder: {}. Error: {:?}",
                reminder.id, e
            );
            return false;
        }
    };
    let channel = user_channel(&reminder.user_id);

    match ctx.push.trigger(&channel, REMINDER_PUSH_EVENT, &payload).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Unable to push reminder: {} on channel: {}. Error: {:?}",
                reminder.id, channel, e
            );
            false
        }
    }
}
