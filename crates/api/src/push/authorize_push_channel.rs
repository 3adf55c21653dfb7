use crate::{
    error::FestError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use aurora_fest_api_structs::authorize_push_channel::*;
use aurora_fest_domain::{channel_owner, is_valid_socket_id, ID};
use aurora_fest_infra::{ChannelAuth, FestContext};
use tracing::error;

fn handle_error(e: UseCaseErrors) -> FestError {
    match e {
        UseCaseErrors::InvalidSocketId(socket_id) => {
            FestError::BadClientData(format!("Malformed socket id: {}", socket_id))
        }
        UseCaseErrors::ForeignChannel(channel) => FestError::Forbidden(format!(
            "Not allowed to subscribe to channel: {}",
            channel
        )),
        UseCaseErrors::PushUnavailable => FestError::InternalError,
    }
}

pub async fn authorize_push_channel_controller(
    http_req: HttpRequest,
    form: Result<web::Form<RequestBody>, actix_web::Error>,
    ctx: web::Data<FestContext>,
) -> Result<HttpResponse, FestError> {
    let user = protect_route(&http_req, &ctx).await?;

    let form = form.map_err(FestError::from_extractor)?.into_inner();
    let usecase = AuthorizePushChannelUseCase {
        user_id: user.id,
        socket_id: form.socket_id,
        channel_name: form.channel_name,
    };

    execute(usecase, &ctx)
        .await
        .map(|auth| HttpResponse::Ok().json(APIResponse { auth: auth.auth }))
        .map_err(handle_error)
}

/// Lets a user subscribe to their own private channel and to no other
#[derive(Debug)]
pub struct AuthorizePushChannelUseCase {
    pub user_id: ID,
    pub socket_id: String,
    pub channel_name: String,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidSocketId(String),
    ForeignChannel(String),
    PushUnavailable,
}

#[async_trait::async_trait(?Send)]
impl UseCase for AuthorizePushChannelUseCase {
    type Response = ChannelAuth;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "AuthorizePushChannel";

    async fn execute(&mut self, ctx: &FestContext) -> Result<Self::Response, Self::Errors> {
        if !is_valid_socket_id(&self.socket_id) {
            return Err(UseCaseErrors::InvalidSocketId(self.socket_id.clone()));
        }
        if channel_owner(&self.channel_name) != Some(self.user_id) {
            return Err(UseCaseErrors::ForeignChannel(self.channel_name.clone()));
        }

        ctx.push
            .authorize_channel(&self.socket_id, &self.channel_name)
            .map_err(|e| {
                error!("Unable to authorize push channel. Error: {:?}", e);
                UseCaseErrors::PushUnavailable
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_context::setup;

    fn usecase(user_id: i64, socket_id: &str, channel_name: &str) -> AuthorizePushChannelUseCase {
        AuthorizePushChannelUseCase {
            user_id: ID::from(user_id),
            socket_id: socket_id.into(),
            channel_name: channel_name.into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn authorizes_own_channel() {
        let test = setup();
        let auth = usecase(5, "123.456", "private-user-5")
            .execute(&test.ctx)
            .await
            .unwrap();
        let (key, signature) = auth.auth.split_once(':').unwrap();
        assert_eq!(key, "push-key");
        assert_eq!(signature.len(), 64);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_foreign_channels() {
        let test = setup();
        for channel in ["private-user-6", "private-user-55", "presence-user-5", "private-admin"] {
            assert!(matches!(
                usecase(5, "123.456", channel).execute(&test.ctx).await,
                Err(UseCaseErrors::ForeignChannel(_))
            ));
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_malformed_socket_ids() {
        let test = setup();
        assert!(matches!(
            usecase(5, "abc", "private-user-5").execute(&test.ctx).await,
            Err(UseCaseErrors::InvalidSocketId(_))
        ));
    }
}
