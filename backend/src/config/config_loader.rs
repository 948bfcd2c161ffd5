use std::str::FromStr;

use anyhow::{Context, Result};
use crates::infra::{
    storages::local_fs::DEFAULT_BASE_DIR,
    telegram::client::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS},
};

use super::config_model::{BackendServer, Database, DotEnvyConfig, Storage, Telegram};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

pub(crate) fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let backend_server = BackendServer {
        port: required(&lookup, "SERVER_PORT")?,
        body_limit: required(&lookup, "SERVER_BODY_LIMIT")?,
        timeout: required(&lookup, "SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required(&lookup, "DATABASE_URL")?,
    };

    let storage = Storage {
        base_dir: optional(&lookup, "STORAGE_BASE_DIR")
            .unwrap_or_else(|| DEFAULT_BASE_DIR.to_string()),
    };

    let telegram = Telegram {
        token: optional(&lookup, "TELEGRAM_TOKEN").unwrap_or_default(),
        api_base_url: optional(&lookup, "TELEGRAM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        timeout_secs: match optional(&lookup, "TELEGRAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TELEGRAM_TIMEOUT_SECS is invalid: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        },
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        storage,
        telegram,
    })
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = optional(lookup, key).with_context(|| format!("{key} is missing"))?;
    raw.parse::<T>()
        .with_context(|| format!("{key} is invalid: {raw}"))
}
