use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_TIMEZONE: &str = "America/Argentina/Buenos_Aires";

/// Runtime configuration.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ORDERS_DB_PATH | orders.db | SQLite database file |
/// | ORDERS_TIMEZONE | America/Argentina/Buenos_Aires | reminder and report timezone |
/// | REMINDER_POLL_SECS | 60 | reminder check cadence |
/// | LOG_LEVEL | info | default log level (RUST_LOG wins) |
/// | SEED_DEMO_DATA | true | seed default accounts and products into an empty database |
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub timezone: Tz,
    pub reminder_poll: Duration,
    pub log_level: String,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let timezone = std::env::var("ORDERS_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into());

        Ok(Self {
            db_path: std::env::var("ORDERS_DB_PATH")
                .unwrap_or_else(|_| "orders.db".into())
                .into(),
            timezone: parse_timezone(&timezone)?,
            reminder_poll: Duration::from_secs(
                std::env::var("REMINDER_POLL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(60),
            ),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }
}

pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| AppError::Config(format!("zona horaria desconocida `{name}`: {e}")))
}
