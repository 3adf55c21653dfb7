use super::notifications::{publish_reminder_push, send_reminder_email};
use crate::{
    error::FestError,
    shared::{
        auth::protect_cron_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::dtos::SweepWindowDTO;
use aurora_fest_api_structs::sweep_reminders::*;
use aurora_fest_domain::{FestivalEvent, SweepWindow, User, ID};
use aurora_fest_infra::FestContext;
use std::collections::HashMap;
use tracing::{error, info, warn};

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::StorageError => FestError::InternalError,
    }
}

pub async fn sweep_reminders_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    protect_cron_route(&http_req, &ctx)?;

    let usecase = SweepRemindersUseCase {
        force: query.is_forced(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                ok: true,
                processed: res.processed,
                emails_sent: res.emails_sent,
                pusher_sent: res.pusher_sent,
                window: SweepWindowDTO::new(&res.window),
            })
        })
        .map_err(handle_error)
}

/// Delivers every due reminder once and deactivates it.
///
/// Failing deliveries are logged and never abort the sweep, only failing to
/// read the batch does.
#[derive(Debug)]
pub struct SweepRemindersUseCase {
    /// Also deliver reminders that are older than the backward tolerance
    pub force: bool,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseResponse {
    pub processed: u64,
    pub emails_sent: u64,
    pub pusher_sent: u64,
    pub window: SweepWindow,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

fn distinct_ids(ids: impl Iterator<Item = ID>) -> Vec<ID> {
    let mut ids = ids.collect::<Vec<_>>();
    ids.sort();
    ids.dedup();
    ids
}

#[async_trait::async_trait(?Send)]
impl UseCase for SweepRemindersUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SweepReminders";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let window = SweepWindow::new(
            now,
            ctx.config.reminder_drift_back_millis,
            ctx.config.reminder_lookahead_millis,
            self.force,
        );

        let due = ctx
            .repos
            .reminders
            .find_due(&window, ctx.config.reminder_batch_size)
            .await
            .map_err(|e| {
                error!("Unable to read due reminders. Error: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        let event_ids = distinct_ids(due.iter().map(|r| r.event_id));
        let events: HashMap<ID, FestivalEvent> = ctx
            .repos
            .events
            .find_many(&event_ids)
            .await
            .map_err(|e| {
                error!("Unable to read events of due reminders. Error: {:?}", e);
                UseCaseErrors::StorageError
            })?
            .into_iter()
            .map(|event| (event.id, event))
            .collect();

        let user_ids = distinct_ids(due.iter().map(|r| r.user_id));
        let users: HashMap<ID, User> = ctx
            .repos
            .users
            .find_many(&user_ids)
            .await
            .map_err(|e| {
                error!("Unable to read users of due reminders. Error: {:?}", e);
                UseCaseErrors::StorageError
            })?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut res = UseCaseResponse {
            processed: 0,
            emails_sent: 0,
            pusher_sent: 0,
            window,
        };

        for reminder in &due {
            res.processed += 1;

            match (events.get(&reminder.event_id), users.get(&reminder.user_id)) {
                (Some(event), Some(user)) => {
                    if user.can_receive_email()
                        && send_reminder_email(user, event, reminder, ctx).await
                    {
                        res.emails_sent += 1;
                    }
                    if publish_reminder_push(reminder, event, ctx).await {
                        res.pusher_sent += 1;
                    }
                }
                _ => {
                    warn!(
                        "Reminder: {} refers to a missing event or user, deactivating it without delivery",
                        reminder.id
                    );
                }
            }

            // Deactivated whatever the outcome so that a reminder is never delivered twice
            if let Err(e) = ctx.repos.reminders.deactivate(&reminder.id).await {
                error!(
                    "Unable to deactivate delivered reminder: {}. Error: {:?}",
                    reminder.id, e
                );
            }
        }

        info!(
            "Swept {} reminders, {} emails and {} push notifications sent",
            res.processed, res.emails_sent, res.pusher_sent
        );

        Ok(res)
    }
}
