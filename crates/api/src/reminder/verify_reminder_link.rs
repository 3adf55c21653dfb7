use super::notifications::link_signer;
use crate::{
    error::FestError,
    shared::{
        guard::Guard,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpResponse};
use aurora_fest_api_structs::verify_reminder_link::*;
use aurora_fest_domain::{FestivalEvent, Reminder, ReminderLinkClaims};
use aurora_fest_infra::FestContext;
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::InvalidSignature => {
            FestError::Forbidden("The reminder link signature is invalid".into())
        }
        UseCaseErrors::ReminderNotFound => {
            FestError::NotFound("No reminder matches this link".into())
        }
        UseCaseErrors::SignerUnavailable | UseCaseErrors::StorageError => {
            FestError::InternalError
        }
    }
}

pub async fn verify_reminder_link_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    let query = query.0;
    let delay = Guard::against_invalid_delay(query.d)?;

    let usecase = VerifyReminderLinkUseCase {
        claims: ReminderLinkClaims {
            event_id: query.e,
            reminder_id: query.r,
            user_id: query.u,
            delay,
        },
        signature: query.sig,
    };

    execute(usecase, &ctx)
        .await
        .map(|(reminder, event)| HttpResponse::Ok().json(APIResponse::new(reminder, event)))
        .map_err(handle_error)
}

/// Checks that a link from a reminder email was issued by this service and
/// still refers to an existing reminder. Grants nothing by itself.
#[derive(Debug)]
pub struct VerifyReminderLinkUseCase {
    pub claims: ReminderLinkClaims,
    pub signature: String,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidSignature,
    ReminderNotFound,
    /// The configured link secret cannot key a signer
    SignerUnavailable,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for VerifyReminderLinkUseCase {
    type Response = (Reminder, FestivalEvent);

    type Errors = UseCaseErrors;

    const NAME: &'static str = "VerifyReminderLink";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        let signer = link_signer(ctx).map_err(|e| {
            error!("Unable to verify reminder link. Error: {:?}", e);
            UseCaseErrors::SignerUnavailable
        })?;
        if !signer.verify(&self.claims, &self.signature) {
            return Err(UseCaseErrors::InvalidSignature);
        }

        let claims = &self.claims;
        let reminder = match ctx.repos.reminders.find(&claims.reminder_id).await {
            Ok(Some(reminder))
                if reminder.user_id == claims.user_id
                    && reminder.event_id == claims.event_id
                    && reminder.delay == claims.delay =>
            {
                reminder
            }
            Ok(_) => return Err(UseCaseErrors::ReminderNotFound),
            Err(e) => {
                error!(
                    "Unable to find reminder: {}. Error: {:?}",
                    claims.reminder_id, e
                );
                return Err(UseCaseErrors::StorageError);
            }
        };

        match ctx.repos.events.find(&claims.event_id).await {
            Ok(Some(event)) => Ok((reminder, event)),
            Ok(None) => Err(UseCaseErrors::ReminderNotFound),
            Err(e) => {
                error!("Unable to find event: {}. Error: {:?}", claims.event_id, e);
                Err(UseCaseErrors::StorageError)
            }
        }
    }
}
