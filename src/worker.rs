use std::time::Duration;

use tokio::sync::watch;

use crate::db;
use crate::state::SharedState;

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Periodic housekeeping: stale rate limiter entries and expired refresh tokens.
/// Runs until shutdown is signaled.
pub fn spawn(
    state: SharedState,
    mut shutdown: watch::Receiver<bool>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Maintenance worker started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(every) => {}
                _ = shutdown.changed() => {}
            }
            if *shutdown.borrow() {
                break;
            }

            run_once(&state).await;
        }

        tracing::debug!("Maintenance worker stopped");
    })
}

pub async fn run_once(state: &SharedState) {
    let contact_window = Duration::from_secs(state.config.contact_rate_window);
    state.contact_limiter.cleanup(contact_window);
    state.login_limiter.cleanup(LOGIN_WINDOW);

    match db::refresh_tokens::delete_expired(&state.pool).await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Removed {n} expired refresh tokens"),
        Err(e) => tracing::error!("Failed to remove expired refresh tokens: {e}"),
    }
}
