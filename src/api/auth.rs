//! Account session handling.
//!
//! Successful login or registration stores the issued access token on the
//! client, so every later call is authenticated until `logout`.

use serde::Serialize;
use serde_json::json;

use crate::api::endpoints;
use crate::api::models::{AuthSession, User};
use crate::client::{ApiClient, ApiClientError, ApiResult, RequestBody, RequestConfig};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let body = json!({ "email": email, "password": password });
        self.open_session(endpoints::auth::LOGIN, RequestBody::Json(body)).await
    }

    pub async fn register(&self, data: &RegisterData) -> ApiResult<AuthSession> {
        let body = RequestBody::json(data).map_err(|e| ApiClientError::decode(e.to_string()))?;
        self.open_session(endpoints::auth::REGISTER, body).await
    }

    pub async fn profile(&self) -> ApiResult<User> {
        #[derive(serde::Deserialize)]
        struct ProfileData {
            user: User,
        }
        let resp = self
            .client
            .get::<ProfileData>(endpoints::auth::PROFILE, RequestConfig::default())
            .await?;
        resp.data
            .map(|d| d.user)
            .ok_or_else(|| ApiClientError::decode("Profile response carried no data"))
    }

    pub fn logout(&self) {
        self.client.set_auth_token(None);
    }

    async fn open_session(&self, endpoint: &str, body: RequestBody) -> ApiResult<AuthSession> {
        let resp = self
            .client
            .post::<AuthSession>(endpoint, Some(body), RequestConfig::default())
            .await?;
        let session = resp
            .data
            .ok_or_else(|| ApiClientError::decode("Auth response carried no session"))?;
        self.client.set_auth_token(Some(&session.tokens.access_token));
        tracing::info!(user_id = %session.user.id, "Session opened");
        Ok(session)
    }
}
