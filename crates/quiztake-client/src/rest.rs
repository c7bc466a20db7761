//! REST client for the quiz backend.
//!
//! Endpoint paths and payload field names follow the backend's API; the
//! wire types here exist only to keep those shapes out of the data model.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use quiztake_core::error::ApiError;
use quiztake_core::model::{
    AttemptDetail, AttemptHandle, ClassRoom, CompletionOutcome, Quiz, UserProfile,
};
use quiztake_core::traits::{KeyValueStore, QuizService, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client carrying the bearer token from the local store.
///
/// The access token is read from the store on every request, so a token
/// written by `login` is picked up without rebuilding the client.
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
    timeout_secs: u64,
}

impl RestClient {
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_timeout(base_url, store, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, store: Arc<dyn KeyValueStore>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            store,
            timeout_secs,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn access_token(&self) -> Result<String> {
        match self.store.get(ACCESS_TOKEN_KEY)? {
            Some(token) => Ok(token),
            None => Err(ApiError::Unauthorized(
                "no access token in the local store, log in first".to_string(),
            )
            .into()),
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(request.bearer_auth(self.access_token()?))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_secs)
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // Quiz endpoints report errors as {"message"}, the auth endpoints
        // and DRF defaults as {"detail"}.
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.detail))
            .unwrap_or(body);
        Err(match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Api { status, message },
        }
        .into())
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let parsed = response.json::<T>().await.map_err(|e| ApiError::Api {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;
        Ok(parsed)
    }

    /// Authenticate and persist the token pair in the store.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let response = self
            .send(
                self.client
                    .post(self.url("accounts/login/"))
                    .json(&LoginRequest { email, password }),
            )
            .await?;
        let body: LoginResponse = Self::parse_json(response).await?;

        self.store.set(ACCESS_TOKEN_KEY, &body.tokens.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &body.tokens.refresh)?;
        tracing::info!(user = %body.user.display_name(), "logged in");
        Ok(body.user)
    }

    /// Revoke the refresh token and clear stored credentials.
    ///
    /// Local tokens are removed even when the revocation request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh) = self.store.get(REFRESH_TOKEN_KEY)? {
            let request = self
                .client
                .post(self.url("accounts/logout/"))
                .json(&LogoutRequest { refresh: &refresh });
            match self.authed(request) {
                Ok(request) => {
                    if let Err(e) = self.send(request).await {
                        tracing::warn!("failed to revoke refresh token: {e:#}");
                    }
                }
                Err(e) => tracing::warn!("skipping server-side logout: {e:#}"),
            }
        }
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        Ok(())
    }

    /// Profile of the authenticated user.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<UserProfile> {
        let request = self.authed(self.client.get(self.url("accounts/user/")))?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    /// Quizzes visible to the authenticated student.
    #[instrument(skip(self))]
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let request = self.authed(self.client.get(self.url("quizzes/")))?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    /// Classes the authenticated student is enrolled in.
    #[instrument(skip(self))]
    pub async fn enrolled_classes(&self) -> Result<Vec<ClassRoom>> {
        let request = self.authed(self.client.get(self.url("student/enrolled-classes/")))?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    /// Join a class by its six-character code.
    #[instrument(skip(self))]
    pub async fn join_class(&self, code: &str) -> Result<()> {
        let request = self.authed(
            self.client
                .post(self.url("student/join-class/"))
                .json(&JoinClassRequest { code }),
        )?;
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizService for RestClient {
    #[instrument(skip(self))]
    async fn fetch_quiz(&self, quiz_id: Uuid) -> Result<Quiz> {
        let request = self.authed(self.client.get(self.url(&format!("quizzes/{quiz_id}/"))))?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    #[instrument(skip(self))]
    async fn start_attempt(&self, quiz_id: Uuid) -> Result<AttemptHandle> {
        let request = self.authed(
            self.client
                .post(self.url(&format!("quizzes/{quiz_id}/start/"))),
        )?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    #[instrument(skip(self))]
    async fn submit_answer(
        &self,
        attempt_id: Uuid,
        session_id: Uuid,
        question_id: Uuid,
        option_id: Uuid,
    ) -> Result<()> {
        let request = self.authed(
            self.client
                .post(self.url(&format!("attempts/{attempt_id}/submit_answer/")))
                .json(&SubmitAnswerRequest {
                    question_id,
                    option_id,
                    session_id,
                }),
        )?;
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn complete_session(
        &self,
        attempt_id: Uuid,
        session_id: Uuid,
    ) -> Result<CompletionOutcome> {
        let request = self.authed(
            self.client
                .post(self.url(&format!("attempts/{attempt_id}/complete_session/")))
                .json(&CompleteSessionRequest { session_id }),
        )?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_attempt(&self, attempt_id: Uuid) -> Result<AttemptDetail> {
        let request = self.authed(
            self.client
                .get(self.url(&format!("attempts/{attempt_id}/"))),
        )?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserProfile,
    tokens: TokenPair,
}

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh: &'a str,
}

#[derive(Serialize)]
struct JoinClassRequest<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct SubmitAnswerRequest {
    question_id: Uuid,
    option_id: Uuid,
    session_id: Uuid,
}

#[derive(Serialize)]
struct CompleteSessionRequest {
    session_id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}
