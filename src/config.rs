use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_DATABASE_PATH: &str = "./nocturn.db";
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_MAX_WINNERS: u32 = 10;

// Runtime settings collected from the environment on startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub database_path: PathBuf,
    pub sweep_interval: Duration,
    pub max_winners: u32,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let token = env::var("DISCORD_TOKEN").map_err(|_| {
            Error::Configuration("Expected a DISCORD_TOKEN in the environment".to_string())
        })?;

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let sweep_interval_seconds = match env::var("SWEEP_INTERVAL_SECONDS") {
            Ok(value) => parse_env_number(&value, "SWEEP_INTERVAL_SECONDS")?,
            Err(_) => DEFAULT_SWEEP_INTERVAL_SECONDS,
        };

        let max_winners = match env::var("MAX_WINNERS") {
            Ok(value) => parse_env_number(&value, "MAX_WINNERS")?,
            Err(_) => DEFAULT_MAX_WINNERS,
        };

        Ok(BotConfig {
            token,
            database_path,
            sweep_interval: Duration::from_secs(sweep_interval_seconds),
            max_winners,
        })
    }
}

fn parse_env_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        let message = format!("The {} variable must be a positive number.", name);
        Error::Configuration(message)
    })
}
