use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub request_timeout_secs: u64, // Upper bound for every outbound call

    #[serde(default)]
    pub role: String, // Role discriminator sent on login and refresh
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            role: "owner".to_string(),
        }
    }
}
