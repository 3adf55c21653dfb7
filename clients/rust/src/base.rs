use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// Header carrying the secret shared with the external sweep scheduler
const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Debug, Clone, PartialEq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    UnexpectedStatusCode,
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub status: Option<StatusCode>,
    pub message: String,
}

pub type APIResponse<T> = Result<T, APIError>;

pub(crate) struct BaseClient {
    client: Client,
    address: String,
    session_token: Option<String>,
    cron_secret: Option<String>,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        let client = Client::new();
        Self {
            client,
            address,
            session_token: None,
            cron_secret: None,
        }
    }

    pub fn set_session_token(&mut self, token: String) {
        if !token.is_empty() {
            self.session_token = Some(token);
        }
    }

    pub fn set_cron_secret(&mut self, secret: String) {
        self.cron_secret = Some(secret);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.address, path)
    }

    fn with_credentials(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.session_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(secret) = &self.cron_secret {
            builder = builder.header(CRON_SECRET_HEADER, secret);
        }
        builder
    }

    async fn handle_api_response<T: DeserializeOwned>(
        &self,
        res: Result<Response, reqwest::Error>,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match res {
            Ok(res) => res,
            Err(e) => {
                return Err(APIError {
                    variant: APIErrorVariant::Network,
                    status: None,
                    message: e.to_string(),
                })
            }
        };

        let status = res.status();
        if status != expected_status_code {
            return Err(APIError {
                variant: APIErrorVariant::UnexpectedStatusCode,
                status: Some(status),
                message: res.text().await.unwrap_or_default(),
            });
        }

        res.json::<T>().await.map_err(|e| APIError {
            variant: APIErrorVariant::MalformedResponse,
            status: Some(status),
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .with_credentials(self.client.get(self.url(&path)))
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .with_credentials(self.client.delete(self.url(&path)))
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn post<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .with_credentials(self.client.post(self.url(&path)))
            .json(&body)
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn post_form<T: DeserializeOwned, S: Serialize>(
        &self,
        form: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .with_credentials(self.client.post(self.url(&path)))
            .form(&form)
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn put<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .with_credentials(self.client.put(self.url(&path)))
            .json(&body)
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }
}
