use std::{env, path::Path};

use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::cfg;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppSettings {
    // Plain values first so the defaults serialize as valid TOML
    #[serde(default)]
    pub log_directives: String,

    #[serde(default)]
    pub api: cfg::ApiSettings,

    #[serde(default)]
    pub database: cfg::DatabaseSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_directives: "info".to_string(),
            api: cfg::ApiSettings::default(),
            database: cfg::DatabaseSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let app_run_env = Self::get_app_run_env();
        let config_path = Self::get_config_path();
        let mut builder = config::Config::builder();

        // Layer 0: Set defaults from AppSettings::default()
        let default_settings = Self::default();
        let default_toml = toml::to_string(&default_settings)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize defaults: {e}")))?;
        builder = builder.add_source(File::from_str(&default_toml, config::FileFormat::Toml));

        // Layer 1: Add default configuration from files
        let default_config_path = config_path.join("default.toml");
        if default_config_path.exists() {
            builder = builder.add_source(File::from(default_config_path));
        }

        // Layer 2: Add environment-specific config
        let env_config_path = config_path.join(format!("{app_run_env}.toml"));
        if env_config_path.exists() {
            builder = builder.add_source(File::from(env_config_path));
        }

        // Layer 3: Add local config overrides
        let local_config_path = config_path.join("local.toml");
        if local_config_path.exists() {
            builder = builder.add_source(File::from(local_config_path));
        }

        // Layer 4: Override with environment variables
        // Use APP_API_BASE_URL, APP_DATABASE_URL, etc.
        builder = builder.add_source(Environment::with_prefix("APP").separator("_"));

        builder.build()?.try_deserialize::<Self>()
    }

    #[must_use]
    pub fn get_app_run_env() -> String {
        env::var("APP_RUN_ENV").unwrap_or_else(|_| "production".to_string())
    }

    #[must_use]
    pub fn get_config_path() -> &'static Path {
        Path::new("config")
    }
}
