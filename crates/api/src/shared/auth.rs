use crate::error::FestError;
use actix_web::{http::header, HttpRequest};
use aurora_fest_domain::{secrets_match, User, ID};
use aurora_fest_infra::FestContext;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{error, warn};

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Claims of the session tokens issued by the main application
#[derive(Debug, Deserialize)]
struct Claims {
    /// The id of the `User`, sent either as a number or a numeric string
    id: ID,
}

fn parse_bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                None
            } else {
                Some(token)
            }
        }
        _ => None,
    }
}

fn decode_user_id(token: &str, ctx: &FestContext) -> Result<ID, FestError> {
    let key = DecodingKey::from_secret(ctx.config.auth_jwt_secret.as_bytes());
    decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims.id)
        .map_err(|e| {
            warn!("Rejected session token: {:?}", e);
            FestError::Unauthorized("Invalid session token".into())
        })
}

async fn find_user(user_id: &ID, ctx: &FestContext) -> Result<Option<User>, FestError> {
    ctx.repos.users.find(user_id).await.map_err(|e| {
        error!("Unable to load user: {} of session. Error: {:?}", user_id, e);
        FestError::InternalError
    })
}

/// Finds out which `User` made the request, rejecting anonymous requests
pub async fn protect_route(req: &HttpRequest, ctx: &FestContext) -> Result<User, FestError> {
    let token = parse_bearer_token(req)
        .ok_or_else(|| FestError::Unauthorized("Missing session token".into()))?;
    let user_id = decode_user_id(token, ctx)?;
    find_user(&user_id, ctx)
        .await?
        .ok_or_else(|| FestError::Unauthorized(format!("Unknown user: {}", user_id)))
}

/// Like `protect_route` but treats a missing or invalid session as anonymous
pub async fn auth_optional(req: &HttpRequest, ctx: &FestContext) -> Result<Option<User>, FestError> {
    let user_id = match parse_bearer_token(req).map(|token| decode_user_id(token, ctx)) {
        Some(Ok(user_id)) => user_id,
        _ => return Ok(None),
    };
    find_user(&user_id, ctx).await
}

pub async fn protect_admin_route(req: &HttpRequest, ctx: &FestContext) -> Result<User, FestError> {
    let user = protect_route(req, ctx).await?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(FestError::Forbidden(
            "Only administrators can perform this action".into(),
        ))
    }
}

/// Requires the `x-cron-secret` header when a cron secret is configured
pub fn protect_cron_route(req: &HttpRequest, ctx: &FestContext) -> Result<(), FestError> {
    let expected = match &ctx.config.cron_secret {
        Some(secret) => secret,
        None => return Ok(()),
    };
    let provided = req
        .headers()
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(provided) if secrets_match(expected, provided) => Ok(()),
        _ => Err(FestError::Unauthorized(format!(
            "Missing or invalid {} header",
            CRON_SECRET_HEADER
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_context::{insert_user, setup, JWT_SECRET};
    use actix_web::test::TestRequest;
    use aurora_fest_domain::UserRole;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(id: serde_json::Value, secret: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        encode(
            &Header::default(),
            &json!({ "id": id, "exp": exp }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn request(token: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request()
    }

    #[actix_web::main]
    #[test]
    async fn accepts_valid_session_tokens() {
        let test = setup();
        let user = insert_user(&test.ctx, 7, true, UserRole::User).await;

        let req = request(&token(json!("7"), JWT_SECRET));
        assert_eq!(protect_route(&req, &test.ctx).await.unwrap().id, user.id);

        let req = request(&token(json!(7), JWT_SECRET));
        assert_eq!(protect_route(&req, &test.ctx).await.unwrap().id, user.id);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_session_tokens() {
        let test = setup();
        insert_user(&test.ctx, 7, true, UserRole::User).await;

        let anonymous = TestRequest::default().to_http_request();
        assert!(matches!(
            protect_route(&anonymous, &test.ctx).await,
            Err(FestError::Unauthorized(_))
        ));

        let req = request(&token(json!("7"), "another-secret"));
        assert!(matches!(
            protect_route(&req, &test.ctx).await,
            Err(FestError::Unauthorized(_))
        ));

        let req = request(&token(json!("8"), JWT_SECRET));
        assert!(matches!(
            protect_route(&req, &test.ctx).await,
            Err(FestError::Unauthorized(_))
        ));

        let expired = encode(
            &Header::default(),
            &json!({ "id": "7", "exp": 1000 }),
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            protect_route(&request(&expired), &test.ctx).await,
            Err(FestError::Unauthorized(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn optional_auth_treats_invalid_tokens_as_anonymous() {
        let test = setup();
        insert_user(&test.ctx, 7, true, UserRole::User).await;

        let anonymous = TestRequest::default().to_http_request();
        assert!(auth_optional(&anonymous, &test.ctx).await.unwrap().is_none());
        let req = request("garbage");
        assert!(auth_optional(&req, &test.ctx).await.unwrap().is_none());
        let req = request(&token(json!("7"), JWT_SECRET));
        assert!(auth_optional(&req, &test.ctx).await.unwrap().is_some());
    }

    #[actix_web::main]
    #[test]
    async fn only_admins_pass_admin_routes() {
        let test = setup();
        insert_user(&test.ctx, 1, true, UserRole::User).await;
        insert_user(&test.ctx, 2, true, UserRole::Admin).await;

        let req = request(&token(json!("1"), JWT_SECRET));
        assert!(matches!(
            protect_admin_route(&req, &test.ctx).await,
            Err(FestError::Forbidden(_))
        ));
        let req = request(&token(json!("2"), JWT_SECRET));
        assert!(protect_admin_route(&req, &test.ctx).await.is_ok());
    }

    #[test]
    fn cron_secret_is_only_required_when_configured() {
        let mut test = setup();
        let anonymous = TestRequest::default().to_http_request();
        assert!(protect_cron_route(&anonymous, &test.ctx).is_ok());

        test.ctx.config.cron_secret = Some("cron".into());
        assert!(protect_cron_route(&anonymous, &test.ctx).is_err());
        let wrong = TestRequest::default()
            .insert_header((CRON_SECRET_HEADER, "nope"))
            .to_http_request();
        assert!(protect_cron_route(&wrong, &test.ctx).is_err());
        let same_length = TestRequest::default()
            .insert_header((CRON_SECRET_HEADER, "crom"))
            .to_http_request();
        assert!(protect_cron_route(&same_length, &test.ctx).is_err());
        let right = TestRequest::default()
            .insert_header((CRON_SECRET_HEADER, "cron"))
            .to_http_request();
        assert!(protect_cron_route(&right, &test.ctx).is_ok());
    }
}
