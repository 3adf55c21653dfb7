use super::notifications::send_activation_email;
use crate::{
    error::FestError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::create_reminders::*;
use aurora_fest_domain::{plan_reminder_slots, FestivalEvent, Reminder, ReminderPlanError, User, ID};
use aurora_fest_infra::FestContext;
use futures::future::try_join_all;
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::EventNotFound(event_id) => {
            FestError::NotFound(format!("The event with id: {}, was not found.", event_id))
        }
        UseCaseErrors::Unschedulable(e) => FestError::Conflict(e.to_string()),
        UseCaseErrors::StorageError => FestError::InternalError,
    }
}

pub async fn create_reminders_controller(
    http_req: HttpRequest,
    body: Result<web::Json<RequestBody>, actix_web::Error>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    let user = protect_route(&http_req, &ctx).await?;
    let body = body.map_err(FestError::from_extractor)?;

    let usecase = CreateRemindersUseCase {
        user,
        event_id: body.0.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(&res.created, res.email_sent)))
        .map_err(handle_error)
}

/// Activates the 60, 30 and 15 minute reminders of an event that are still
/// ahead and confirms the activation by email
#[derive(Debug)]
pub struct CreateRemindersUseCase {
    pub user: User,
    pub event_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub event: FestivalEvent,
    pub created: Vec<Reminder>,
    pub email_sent: bool,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    EventNotFound(ID),
    Unschedulable(ReminderPlanError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateRemindersUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateReminders";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();

        let event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => return Err(UseCaseErrors::EventNotFound(self.event_id)),
            Err(e) => {
                error!("Unable to find event: {}. Error: {:?}", self.event_id, e);
                return Err(UseCaseErrors::StorageError);
            }
        };

        let slots = plan_reminder_slots(&event, now, ctx.config.reminder_safety_margin_millis)
            .map_err(UseCaseErrors::Unschedulable)?;

        let upserts = slots.iter().map(|slot| {
            ctx.repos
                .reminders
                .upsert_active(&self.user.id, &event.id, slot.delay, slot.remind_at)
        });
        let created = try_join_all(upserts).await.map_err(|e| {
            error!(
                "Unable to store reminders of user: {} for event: {}. Error: {:?}",
                self.user.id, event.id, e
            );
            UseCaseErrors::StorageError
        })?;

        let email_sent = send_activation_email(&self.user, &event, &created, ctx).await;

        Ok(UseCaseResponse {
            event,
            created,
            email_sent,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_context::{insert_event, insert_user, setup, MINUTE};
    use aurora_fest_domain::UserRole;

    fn delays(reminders: &[Reminder]) -> Vec<i64> {
        reminders.iter().map(|r| r.delay.minutes()).collect()
    }

    #[actix_web::main]
    #[test]
    async fn creates_all_slots_for_far_event() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;
        let event = insert_event(&test.ctx, 10, 90).await;

        let mut usecase = CreateRemindersUseCase {
            user,
            event_id: event.id,
        };
        let res = usecase.execute(&test.ctx).await.unwrap();

        assert_eq!(delays(&res.created), vec![60, 30, 15]);
        assert_eq!(res.created[0].remind_at, event.start_ts - 60 * MINUTE);
        assert!(res.email_sent);

        let sent = test.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Rappel activé — Concert 10");
        assert!(sent[0].html.contains("60 / 30 / 15 min"));
        // The link points at the reminder firing first
        let nearest = &res.created[2];
        assert!(sent[0]
            .html
            .contains(&format!("r={}&amp;d=15&amp;u=1", nearest.id)));
    }

    #[actix_web::main]
    #[test]
    async fn only_creates_remaining_slots() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;

        let event = insert_event(&test.ctx, 10, 45).await;
        let mut usecase = CreateRemindersUseCase {
            user: user.clone(),
            event_id: event.id,
        };
        let res = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(delays(&res.created), vec![30, 15]);

        let event = insert_event(&test.ctx, 11, 20).await;
        let mut usecase = CreateRemindersUseCase {
            user,
            event_id: event.id,
        };
        let res = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(delays(&res.created), vec![15]);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_events_without_remaining_slots() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;

        for (event_id, starts_in) in [(10, 5), (11, 10)] {
            let event = insert_event(&test.ctx, event_id, starts_in).await;
            let mut usecase = CreateRemindersUseCase {
                user: user.clone(),
                event_id: event.id,
            };
            let res = usecase.execute(&test.ctx).await;
            assert!(matches!(
                res,
                Err(UseCaseErrors::Unschedulable(ReminderPlanError::AllSlotsPassed))
            ));
        }

        let over = insert_event(&test.ctx, 12, -120).await;
        let mut usecase = CreateRemindersUseCase {
            user,
            event_id: over.id,
        };
        assert!(matches!(
            usecase.execute(&test.ctx).await,
            Err(UseCaseErrors::Unschedulable(ReminderPlanError::EventOver))
        ));
        assert!(test.mailer.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_event() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;

        let mut usecase = CreateRemindersUseCase {
            user,
            event_id: ID::from(404),
        };
        assert!(matches!(
            usecase.execute(&test.ctx).await,
            Err(UseCaseErrors::EventNotFound(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn reactivation_reuses_rows_and_refreshes_fire_times() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;
        let event = insert_event(&test.ctx, 10, 90).await;

        let mut usecase = CreateRemindersUseCase {
            user: user.clone(),
            event_id: event.id,
        };
        let first = usecase.execute(&test.ctx).await.unwrap();
        test.ctx
            .repos
            .reminders
            .deactivate_for_event(&user.id, &event.id)
            .await
            .unwrap();

        test.sys.advance_millis(40 * MINUTE);
        let second = usecase.execute(&test.ctx).await.unwrap();

        // The 60 minute slot has passed in the meantime
        assert_eq!(delays(&second.created), vec![30, 15]);
        assert_eq!(second.created[0].id, first.created[1].id);
        assert!(second.created.iter().all(|r| r.active));
        assert_eq!(
            test.ctx
                .repos
                .reminders
                .count_for_event(&user.id, &event.id)
                .await
                .unwrap(),
            3
        );
    }

    #[actix_web::main]
    #[test]
    async fn activation_survives_mail_failures() {
        let test = setup();
        let verified = insert_user(&test.ctx, 1, true, UserRole::User).await;
        let unverified = insert_user(&test.ctx, 2, false, UserRole::User).await;
        let event = insert_event(&test.ctx, 10, 90).await;

        let mut usecase = CreateRemindersUseCase {
            user: unverified,
            event_id: event.id,
        };
        let res = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(res.created.len(), 3);
        assert!(!res.email_sent);

        test.mailer.set_failing(true);
        let mut usecase = CreateRemindersUseCase {
            user: verified,
            event_id: event.id,
        };
        let res = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(res.created.len(), 3);
        assert!(!res.email_sent);
        assert!(test.mailer.sent().is_empty());
    }
}
