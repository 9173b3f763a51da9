use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use crate::auth::RefreshGate;
use crate::cfg;
use crate::db;

#[rustfmt::skip]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Session expired")]
    SessionExpired,

    #[error("Credential store error: {0}")]
    Store(#[from] db::StoreError),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Descriptor of one outbound call. `send` holds it for the duration of the
/// call so the request can be re-issued once after a token refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// HTTP client for the gym backend. Attaches the stored bearer token to
/// every call and recovers transparently from a single 401 through the
/// shared refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    refresh_url: Url,
    role: String,
    credentials: db::Credentials,
    gate: RefreshGate,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        settings: &cfg::ApiSettings,
        credentials: db::Credentials,
    ) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&settings.base_url)?;
        let refresh_url = base_url.join("/auth/refresh")?;
        Ok(Self {
            http,
            base_url,
            refresh_url,
            role: settings.role.clone(),
            credentials,
            gate: RefreshGate::new(),
        })
    }

    /// Issues `request` with the current bearer token.
    ///
    /// A 401 response routes through the refresh gate: the first caller of a
    /// burst refreshes, everyone else shares the outcome. With a renewed
    /// token the request is re-issued exactly once; a second 401 propagates
    /// as an error rather than triggering another refresh. Non-401 failures
    /// are never retried.
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        // Snapshot before dispatch: a refresh that settles while this request
        // is in flight fixed the very token it was sent with, so its outcome
        // must be shared instead of starting another refresh.
        let observed = self.gate.generation();
        let token = self.credentials.access_token().await?;
        let response = self.dispatch(&request, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_status(response).await;
        }

        tracing::debug!(path = %request.path, "Received 401, acquiring token refresh");
        let renewed = self.gate.acquire(observed, || self.refresh_access_token()).await;

        match renewed {
            Some(token) => {
                let retry = self.dispatch(&request, Some(&token)).await?;
                Self::check_status(retry).await
            }
            None => Err(ApiError::SessionExpired),
        }
    }

    /// Sends `request` and deserializes the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.base_url.join(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        // No stored token is not an error here; the call goes out
        // unauthenticated and fails server-side if auth was required.
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder.send().await?)
    }

    /// Propagates non-success statuses as [`ApiError::Api`], carrying
    /// whatever message the backend supplied.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| body.to_string(), ToString::to_string),
            Err(_) => String::new(),
        };
        Err(ApiError::Api { status, message })
    }

    /// Calls the refresh endpoint with the stored owner identity and replaces
    /// the access token in the store. Any failure, including a missing owner
    /// id, clears the stored credentials so the next action lands back at the
    /// login entry point.
    async fn refresh_access_token(&self) -> Option<String> {
        let owner_id = match self.credentials.get(db::keys::OWNER_ID).await {
            Ok(Some(owner_id)) => owner_id,
            Ok(None) => {
                tracing::warn!("No owner id available for token refresh, logging out");
                self.force_logout().await;
                return None;
            }
            Err(e) => {
                tracing::error!("Credential store read failed during refresh: {e}");
                self.force_logout().await;
                return None;
            }
        };

        let result = self
            .http
            .post(self.refresh_url.clone())
            .json(&json!({ "id": owner_id, "role": self.role }))
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Token refresh rejected, logging out");
                self.force_logout().await;
                return None;
            }
            Err(e) => {
                tracing::warn!("Token refresh call failed, logging out: {e}");
                self.force_logout().await;
                return None;
            }
        };

        let body = match response.json::<RefreshResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Malformed refresh response, logging out: {e}");
                self.force_logout().await;
                return None;
            }
        };

        // Only the access token mutates; owner id and refresh token stay as
        // they were stored at login.
        if let Err(e) = self.credentials.save(db::keys::ACCESS_TOKEN, &body.access_token).await {
            tracing::error!("Failed to persist refreshed access token: {e}");
            self.force_logout().await;
            return None;
        }

        tracing::debug!("Access token refreshed");
        Some(body.access_token)
    }

    async fn force_logout(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::error!("Failed to clear credentials: {e}");
        }
    }
}
