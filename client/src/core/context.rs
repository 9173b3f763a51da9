use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::api;
use crate::cfg;
use crate::db;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Database error: {0}")]
    DatabaseInitFailed(#[from] db::DbError),

    #[error("HTTP client error: {0}")]
    HttpClientBuildFailed(#[from] reqwest::Error),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

#[derive(Clone)]
pub struct Context {
    pub credentials: db::Credentials,
    pub api: api::ApiClient,
    pub settings: Arc<cfg::AppSettings>,
}

impl Context {
    pub async fn new(settings: cfg::AppSettings) -> Result<Self, ContextError> {
        let pool = db::init_pool(&settings.database).await?;
        let credentials = db::Credentials::new(pool);

        // One shared client with an explicit timeout; no call may suspend
        // its caller indefinitely.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.api.request_timeout_secs))
            .build()?;

        let api = api::ApiClient::new(http_client, &settings.api, credentials.clone())?;
        Ok(Self {
            credentials,
            api,
            settings: Arc::new(settings),
        })
    }
}
