use std::{str::FromStr, time::Duration};

use anyhow::Context;
use tracing::Level;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8501;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL_NAME: &str = "llama3.1:8b";
const DEFAULT_FALLBACK_IDENTITY: &str = "Albert Einstein";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub log_level: Level,

    pub ollama_url: String,
    pub model_name: String,
    pub ollama_timeout: Option<Duration>,

    pub game: GameOptions,

    pub session_cache_capacity: u64,
}

/// Tuning for the generator and validator calls.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    pub model_name: String,
    pub max_retries: usize,
    pub generator_temperature: f32,
    pub validator_temperature: f32,
    pub fallback_identity: String,
}

impl Default for GameOptions {
    fn default() -> Self {
        return Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_retries: 3,
            generator_temperature: 0.7,
            validator_temperature: 0.2,
            fallback_identity: DEFAULT_FALLBACK_IDENTITY.to_string(),
        };
    }
}

pub fn build() -> crate::Result<Config> {
    return build_from(|key| std::env::var(key).ok());
}

pub fn build_from<F>(lookup: F) -> crate::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let defaults = GameOptions::default();

    let model_name = var("MODEL_NAME").unwrap_or(defaults.model_name);

    let ollama_url = var("OLLAMA_URL")
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let ollama_timeout = parse_var::<u64>(&var, "OLLAMA_TIMEOUT_SECS")?.map(Duration::from_secs);

    let max_retries = parse_var(&var, "MAX_RETRIES")?.unwrap_or(defaults.max_retries);
    if max_retries == 0 {
        return Err(anyhow::anyhow!("MAX_RETRIES must be at least 1").into());
    }

    let game = GameOptions {
        model_name: model_name.clone(),
        max_retries,
        generator_temperature: parse_var(&var, "GENERATOR_TEMPERATURE")?
            .unwrap_or(defaults.generator_temperature),
        validator_temperature: parse_var(&var, "VALIDATOR_TEMPERATURE")?
            .unwrap_or(defaults.validator_temperature),
        fallback_identity: var("FALLBACK_IDENTITY").unwrap_or(defaults.fallback_identity),
    };

    return Ok(Config {
        server_host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
        server_port: parse_var(&var, "SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
        log_level: parse_var(&var, "LOG_LEVEL")?.unwrap_or(Level::INFO),

        ollama_url,
        model_name,
        ollama_timeout,

        game,

        session_cache_capacity: parse_var(&var, "SESSION_CACHE_CAPACITY")?.unwrap_or(2000),
    });
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> crate::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = var(key) else {
        return Ok(None);
    };

    let parsed = raw
        .trim()
        .parse::<T>()
        .with_context(|| format!("invalid value for {key}: {raw:?}"))?;

    return Ok(Some(parsed));
}
