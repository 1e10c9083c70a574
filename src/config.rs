use std::time::Duration;

use dotenvy::dotenv;
use tracing::Level;
use url::Url;

use crate::AppResult;

pub const DEFAULT_URL: &str = "http://localhost/index.html";
const DEFAULT_TICK_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: Url,
    pub log_level: Level,
    pub tick: Duration,
}

impl Config {
    /// Reads `.env` and the process environment. `cli_url` takes precedence
    /// over `PRESENTATION_URL`.
    pub fn load(cli_url: Option<String>) -> AppResult<Self> {
        dotenv().ok();
        Self::from_vars(
            cli_url.or_else(|| std::env::var("PRESENTATION_URL").ok()),
            std::env::var("LOG_LEVEL").ok(),
            std::env::var("TICK_MS").ok(),
        )
    }

    pub fn from_vars(
        url: Option<String>,
        log_level: Option<String>,
        tick_ms: Option<String>,
    ) -> AppResult<Self> {
        let url = Url::parse(url.as_deref().unwrap_or(DEFAULT_URL))?;
        let log_level = log_level.as_deref().unwrap_or("error").parse::<Level>()?;
        let tick_ms = match tick_ms {
            Some(raw) => raw.parse::<u64>()?,
            None => DEFAULT_TICK_MS,
        };
        if tick_ms == 0 {
            return Err("TICK_MS must be greater than zero".into());
        }

        Ok(Self {
            url,
            log_level,
            tick: Duration::from_millis(tick_ms),
        })
    }
}
