use crate::{
    error::FestError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::cancel_reminders::*;
use aurora_fest_domain::{CancellationNote, User, ID};
use aurora_fest_infra::FestContext;
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::StorageError => FestError::InternalError,
    }
}

pub async fn cancel_reminders_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = CancelRemindersUseCase {
        user,
        event_id: path.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                ok: true,
                disabled_count: res.disabled_count,
                note: res.note.map(|note| note.message().to_string()),
            })
        })
        .map_err(handle_error)
}

/// Disables every active reminder of the user for the event
#[derive(Debug)]
pub struct CancelRemindersUseCase {
    pub user: User,
    pub event_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub disabled_count: u64,
    pub note: Option<CancellationNote>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelRemindersUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CancelReminders";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let storage_error = |e: anyhow::Error| {
            error!(
                "Unable to cancel reminders of user: {} for event: {}. Error: {:?}",
                self.user.id, self.event_id, e
            );
            UseCaseErrors::StorageError
        };

        let disabled_count = ctx
            .repos
            .reminders
            .deactivate_for_event(&self.user.id, &self.event_id)
            .await
            .map_err(storage_error)?;

        let note = if disabled_count == 0 {
            let existing_count = ctx
                .repos
                .reminders
                .count_for_event(&self.user.id, &self.event_id)
                .await
                .map_err(storage_error)?;
            CancellationNote::from_counts(disabled_count, existing_count)
        } else {
            None
        };

        Ok(UseCaseResponse {
            disabled_count,
            note,
        })
    }
}
