pub mod catalog;
pub mod clock;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod import;
pub mod logger;
pub mod mail;
pub mod models;
pub mod notifications;
pub mod orders;
pub mod poller;
pub mod reminders;
pub mod seed;
pub mod settings;
pub mod state;
pub mod users;


pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

use poller::ReminderPoller;

/// Opens the configured database, seeds it on first run and keeps the
/// reminder poll going until Ctrl-C.
pub async fn run() -> AppResult<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    logger::init_logger(&config.log_level);

    let app = AppState::open(&config)?;
    if config.seed_demo_data {
        seed::ensure_defaults(&app)?;
    }

    tracing::info!(
        db = %config.db_path.display(),
        timezone = %config.timezone,
        unread = app.notifications().unread_count()?,
        "Order desk ready"
    );

    let mut poller = ReminderPoller::new(config.reminder_poll);
    poller.start(app.reminder_watcher());

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    poller.stop().await;
    tracing::info!("Order desk stopped");
    Ok(())
}
