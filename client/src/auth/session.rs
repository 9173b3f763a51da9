use serde::Deserialize;
use serde_json::json;

use crate::api;
use crate::db;

/// Credential payload returned inside `data` by `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub owner_id: String,
    pub gym_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: String,
    pub data: LoginData,
}

/// Logs in with the configured role and persists the returned credential set.
pub async fn login(
    api: &api::ApiClient,
    credentials: &db::Credentials,
    role: &str,
    mobile_number: &str,
    password: &str,
) -> Result<LoginData, api::ApiError> {
    let request = api::ApiRequest::post("/auth/login").json(json!({
        "mobile_number": mobile_number,
        "password": password,
        "role": role,
    }));
    let response: LoginResponse = api.send_json(request).await?;

    let data = response.data;
    credentials.save(db::keys::ACCESS_TOKEN, &data.access_token).await?;
    if let Some(refresh_token) = &data.refresh_token {
        credentials.save(db::keys::REFRESH_TOKEN, refresh_token).await?;
    }
    credentials.save(db::keys::OWNER_ID, &data.owner_id).await?;
    credentials.save(db::keys::GYM_ID, &data.gym_id).await?;
    credentials.save(db::keys::ROLE, role).await?;

    tracing::info!(owner_id = %data.owner_id, gym_id = %data.gym_id, "Logged in");
    Ok(data)
}

/// Clears every stored credential. The consumed API surface has no logout
/// endpoint; the session ends client-side.
pub async fn logout(credentials: &db::Credentials) -> Result<(), db::StoreError> {
    credentials.clear().await?;
    tracing::info!("Logged out, credentials cleared");
    Ok(())
}
