use super::update_event_schedule::UpdateEventScheduleUseCase;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use aurora_fest_domain::FestivalEvent;
use aurora_fest_infra::FestContext;
use tracing::{error, info};

pub struct RescheduleRemindersOnEventUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventScheduleUseCase> for RescheduleRemindersOnEventUpdated {
    async fn notify(&self, e: &FestivalEvent, ctx: &FestContext) {
        let usecase = RescheduleEventRemindersUseCase { event: e.clone() };

        // Sideeffect, ignore result
        let _ = execute(usecase, ctx).await;
    }
}

/// Recomputes the fire time of every active reminder of the event.
/// Reminders that would now fire in the past are deactivated.
#[derive(Debug)]
pub struct RescheduleEventRemindersUseCase {
    pub event: FestivalEvent,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleEventRemindersUseCase {
    type Response = u64;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "RescheduleEventReminders";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let rescheduled = ctx
            .repos
            .reminders
            .reschedule_for_event(&self.event.id, self.event.start_ts, now)
            .await
            .map_err(|e| {
                error!(
                    "Unable to reschedule reminders of event: {}. Error: {:?}",
                    self.event.id, e
                );
                UseCaseErrors::StorageError
            })?;
        info!(
            "Rescheduled {} reminders of event: {}",
            rescheduled, self.event.id
        );
        Ok(rescheduled)
    }
}
