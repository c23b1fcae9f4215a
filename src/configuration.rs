use config::Config;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub api_keys: ApiKeySettings,
    #[serde(default)]
    pub search: SearchSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct ApiKeySettings {
    pub google_api_key: String,
    pub google_cse_id: String,
    pub google_places_api_key: Option<String>,
}

/// Tuning knobs for the search pipeline; every field has a default so
/// the whole section can be omitted from configuration.yaml.
#[derive(Deserialize, Clone)]
pub struct SearchSettings {
    #[serde(default = "default_reddit_max_age_days")]
    pub reddit_max_age_days: i64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            reddit_max_age_days: default_reddit_max_age_days(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_reddit_max_age_days() -> i64 {
    60
}

fn default_page_delay_ms() -> u64 {
    500
}

/// The storage backend is chosen here, explicitly, at startup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    pub postgres: Option<PostgresSettings>,
}

fn default_sqlite_path() -> String {
    "data/leads.db".to_string()
}

#[derive(Deserialize, Clone)]
pub struct PostgresSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,
    pub require_ssl: bool,
}

impl PostgresSettings {
    pub fn with_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
