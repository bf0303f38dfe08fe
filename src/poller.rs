//! Periodic reminder check with a start/stop lifecycle.
//!
//! The poller owns one background task per session. `start` on a running
//! poller does nothing; `stop` cancels the task and waits for it to exit.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::models::Notification;
use crate::reminders::ReminderWatcher;

struct Running {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct ReminderPoller {
    period: Duration,
    fired: broadcast::Sender<Notification>,
    running: Option<Running>,
}

impl ReminderPoller {
    pub fn new(period: Duration) -> Self {
        let (fired, _) = broadcast::channel(16);
        Self {
            period,
            fired,
            running: None,
        }
    }

    /// Reminder notifications as they fire, for toasts and the like.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.fired.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Spawns the poll loop on the current tokio runtime. The first check runs
    /// immediately. Returns `false` when a loop is already running.
    pub fn start(&mut self, mut watcher: ReminderWatcher) -> bool {
        if self.is_running() {
            tracing::debug!("Reminder poller already running");
            return false;
        }

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let fired = self.fired.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            tracing::info!(period_secs = period.as_secs(), "Reminder poller started");

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        match watcher.tick() {
                            Ok(notifications) => {
                                for notification in notifications {
                                    tracing::info!(title = %notification.title, "Reminder fired");
                                    // No subscribers is fine
                                    let _ = fired.send(notification);
                                }
                            }
                            Err(e) => tracing::error!("Reminder check failed: {}", e),
                        }
                    }
                }
            }

            tracing::info!("Reminder poller stopped");
        });

        self.running = Some(Running { shutdown, handle });
        true
    }

    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.shutdown.cancel();
        if let Err(e) = running.handle.await {
            tracing::warn!("Reminder poller task ended abnormally: {}", e);
        }
    }
}

impl Drop for ReminderPoller {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.shutdown.cancel();
        }
    }
}
