use super::subscribers::RescheduleRemindersOnEventUpdated;
use crate::{
    error::FestError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::update_event_schedule::*;
use aurora_fest_domain::{FestivalEvent, ID};
use aurora_fest_infra::FestContext;
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::NotFound(event_id) => {
            FestError::NotFound(format!("The event with id: {}, was not found.", event_id))
        }
        UseCaseErrors::InvalidSchedule(msg) => FestError::BadClientData(msg),
        UseCaseErrors::StorageError => FestError::InternalError,
    }
}

pub async fn update_event_schedule_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    protect_admin_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateEventScheduleUseCase {
        event_id: path_params.event_id,
        start_ts: body.start_ts,
        end_ts: body.end_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(handle_error)
}

/// Moves an event on the programme. The active reminders of the event
/// follow it through `RescheduleRemindersOnEventUpdated`.
#[derive(Debug)]
pub struct UpdateEventScheduleUseCase {
    pub event_id: ID,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidSchedule(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventScheduleUseCase {
    type Response = FestivalEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateEventSchedule";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let mut event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => return Err(UseCaseErrors::NotFound(self.event_id)),
            Err(e) => {
                error!("Unable to find event: {}. Error: {:?}", self.event_id, e);
                return Err(UseCaseErrors::StorageError);
            }
        };

        event
            .reschedule(self.start_ts, self.end_ts)
            .map_err(|e| UseCaseErrors::InvalidSchedule(e.to_string()))?;

        ctx.repos.events.save(&event).await.map_err(|e| {
            error!("Unable to save event: {}. Error: {:?}", event.id, e);
            UseCaseErrors::StorageError
        })?;

        Ok(event)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RescheduleRemindersOnEventUpdated)]
    }
}
