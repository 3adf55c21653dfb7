use crate::{
    error::FestError,
    shared::{
        auth::auth_optional,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::get_reminder_state::*;
use aurora_fest_domain::ID;
use aurora_fest_infra::FestContext;
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::StorageError => FestError::InternalError,
    }
}

fn to_response(state: ReminderState) -> APIResponse {
    match state {
        ReminderState::ActiveEvents(active_event_ids) => {
            APIResponse::ActiveEvents { active_event_ids }
        }
        ReminderState::Event(active) => APIResponse::Event { active },
    }
}

pub async fn get_reminder_state_controller(
    http_req: HttpRequest,
    query: Result<web::Query<QueryParams>, actix_web::Error>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    // Anonymous visitors have no active reminders, whatever they ask for
    let user = match auth_optional(&http_req, &ctx).await? {
        Some(user) => user,
        None => return Ok(HttpResponse::Ok().json(to_response(ReminderState::anonymous()))),
    };
    let event_id = query
        .map_err(FestError::from_extractor)?
        .event_id()
        .map_err(|e| FestError::BadClientData(e.to_string()))?;

    let usecase = GetReminderStateUseCase {
        user_id: user.id,
        event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|state| HttpResponse::Ok().json(to_response(state)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetReminderStateUseCase {
    pub user_id: ID,
    /// When given only tells whether this event has an active reminder
    pub event_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum ReminderState {
    ActiveEvents(Vec<ID>),
    Event(bool),
}

impl ReminderState {
    fn anonymous() -> Self {
        Self::ActiveEvents(vec![])
    }
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderStateUseCase {
    type Response = ReminderState;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetReminderState";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let reminders = &ctx.repos.reminders;
        let res = match &self.event_id {
            Some(event_id) => reminders
                .has_active(&self.user_id, event_id)
                .await
                .map(ReminderState::Event),
            None => reminders
                .find_active_event_ids(&self.user_id)
                .await
                .map(ReminderState::ActiveEvents),
        };
        res.map_err(|e| {
            error!(
                "Unable to read reminder state of user: {}. Error: {:?}",
                self.user_id, e
            );
            UseCaseErrors::StorageError
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminders::CreateRemindersUseCase;
    use crate::shared::test_context::{insert_event, insert_user, setup};
    use aurora_fest_domain::UserRole;

    #[actix_web::main]
    #[test]
    async fn lists_events_with_active_reminders() {
        let test = setup();
        let user = insert_user(&test.ctx, 1, true, UserRole::User).await;
        let other = insert_user(&test.ctx, 2, true, UserRole::User).await;
        let first = insert_event(&test.ctx, 20, 90).await;
        let second = insert_event(&test.ctx, 10, 90).await;
        let unrelated = insert_event(&test.ctx, 30, 90).await;

        for event in [&first, &second] {
            let mut usecase = CreateRemindersUseCase {
                user: user.clone(),
                event_id: event.id,
            };
            usecase.execute(&test.ctx).await.unwrap();
        }
        let mut usecase = CreateRemindersUseCase {
            user: other,
            event_id: unrelated.id,
        };
        usecase.execute(&test.ctx).await.unwrap();

        let mut usecase = GetReminderStateUseCase {
            user_id: user.id,
            event_id: None,
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap(),
            ReminderState::ActiveEvents(vec![second.id, first.id])
        );

        let mut usecase = GetReminderStateUseCase {
            user_id: user.id,
            event_id: Some(unrelated.id),
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap(),
            ReminderState::Event(false)
        );

        let mut usecase = GetReminderStateUseCase {
            user_id: user.id,
            event_id: Some(first.id),
        };
        assert_eq!(
            usecase.execute(&test.ctx).await.unwrap(),
            ReminderState::Event(true)
        );
    }
}
