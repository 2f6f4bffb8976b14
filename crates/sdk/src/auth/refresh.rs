//! Background access-token refresh.
//!
//! One task per session. It re-runs the credential exchange on a fixed
//! cadence and installs each new token into the shared [`TokenHolder`]. A
//! failed exchange is retried after a short delay until it succeeds; the
//! previous token stays installed meanwhile.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::exchanger::CredentialExchange;
use super::token::TokenHolder;

type TaskHandle = Mutex<Option<JoinHandle<()>>>;

/// How long [`RefreshScheduler::stop`] waits for the task to wind down.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Refresh cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Time between successful refreshes.
    pub interval: Duration,
    /// Time between attempts after a failed exchange.
    pub retry_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60), // 1 hour
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// Handle to a running refresh task.
///
/// Dropping the scheduler cancels the task without waiting for it.
pub struct RefreshScheduler {
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

struct RefreshTask {
    exchanger: Arc<dyn CredentialExchange>,
    api_key: Arc<str>,
    tokens: Arc<TokenHolder>,
    config: RefreshConfig,
}

impl RefreshScheduler {
    /// Spawn the refresh task on the current runtime.
    ///
    /// The first refresh happens one `interval` after this call.
    #[must_use]
    pub fn spawn(
        exchanger: Arc<dyn CredentialExchange>,
        api_key: Arc<str>,
        tokens: Arc<TokenHolder>,
        config: RefreshConfig,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let task = RefreshTask { exchanger, api_key, tokens, config };
        let handle = tokio::spawn(task.run(cancellation_token.clone()));

        debug!(interval_secs = config.interval.as_secs(), "token refresh task started");

        Self { cancellation_token, task_handle: Mutex::new(Some(handle)) }
    }

    /// Whether [`stop`](Self::stop) has been called (or the scheduler dropped).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Cancel the task and wait for it to finish.
    ///
    /// Idempotent. An exchange that is in flight is abandoned and its result
    /// never installed.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        self.cancellation_token.cancel();

        let Some(handle) = self.task_handle.lock().await.take() else {
            return;
        };
        match time::timeout(STOP_TIMEOUT, handle).await {
            Ok(Ok(())) => debug!("token refresh task stopped"),
            Ok(Err(e)) => warn!(error = %e, "token refresh task panicked"),
            Err(_) => warn!("token refresh task did not stop within timeout"),
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            debug!("refresh scheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}

impl RefreshTask {
    async fn run(self, cancel: CancellationToken) {
        let period = self.config.interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if !self.refresh_until_success(&cancel).await {
                        break;
                    }
                }
            }
        }
        debug!("token refresh loop exited");
    }

    /// Returns `false` if cancelled before a token could be installed.
    async fn refresh_until_success(&self, cancel: &CancellationToken) -> bool {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return false,
                result = self.exchanger.exchange(&self.api_key) => result,
            };

            match result {
                Ok(login) => {
                    if cancel.is_cancelled() {
                        return false;
                    }
                    self.tokens.set(login.access_token);
                    info!(attempt, "access token refreshed");
                    return true;
                }
                Err(err) => {
                    warn!(
                        attempt,
                        error = %err,
                        kind = err.label(),
                        retry_in_secs = self.config.retry_delay.as_secs(),
                        "failed to refresh token"
                    );
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return false,
                        () = time::sleep(self.config.retry_delay) => {}
                    }
                }
            }
        }
    }
}
