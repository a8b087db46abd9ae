//! Periodic drain task.
//!
//! The [`Connector`] owns a background task that wakes every `interval` and
//! drains the [`IngressQueue`](crate::queue::IngressQueue) through the
//! [`Consumers`] registry. Messages are applied one at a time; a new tick
//! never starts while the previous drain is still awaiting a store.

use std::sync::Arc;
use std::time::Duration;

use fbmqtt_domain::error::FbMqttError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::consumers::Consumers;
use crate::ports::Repositories;

/// Default pause between two drains of the queue.
pub const DEFAULT_QUEUE_INTERVAL: Duration = Duration::from_millis(10);

struct DrainTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owner of the queue drain task.
pub struct Connector<R> {
    consumers: Arc<Consumers<R>>,
    interval: Duration,
    task: Option<DrainTask>,
}

impl<R: Repositories> Connector<R> {
    #[must_use]
    pub fn new(consumers: Consumers<R>, interval: Duration) -> Self {
        Self {
            consumers: Arc::new(consumers),
            interval,
            task: None,
        }
    }

    /// Spawn the drain task.
    ///
    /// # Errors
    ///
    /// Returns [`FbMqttError::InvalidState`] if the task is already running.
    pub fn start(&mut self) -> Result<(), FbMqttError> {
        if self.task.is_some() {
            return Err(FbMqttError::InvalidState("connector is already running"));
        }

        let (shutdown, receiver) = watch::channel(false);
        let handle = tokio::spawn(drain_loop(
            Arc::clone(&self.consumers),
            self.interval,
            receiver,
        ));
        self.task = Some(DrainTask { shutdown, handle });

        tracing::info!(
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "connector started"
        );
        Ok(())
    }

    /// Stop the drain task if the queue is empty.
    ///
    /// Returns `true` once the task is stopped (or was never started) and
    /// `false` while messages are still queued; callers retry until it
    /// succeeds.
    pub async fn terminate(&mut self) -> bool {
        if !self.consumers.queue().is_empty() {
            tracing::debug!(
                queued = self.consumers.queue().len(),
                "connector still has queued messages"
            );
            return false;
        }

        let Some(task) = self.task.take() else {
            return true;
        };

        // The receiver only goes away when the task already ended.
        let _ = task.shutdown.send(true);
        if let Err(err) = task.handle.await {
            tracing::warn!(%err, "connector task ended abnormally");
        }

        tracing::info!("connector stopped");
        true
    }

    /// `true` while the drain task runs and messages are waiting.
    #[must_use]
    pub fn has_unfinished_tasks(&self) -> bool {
        self.is_running() && !self.consumers.queue().is_empty()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    #[must_use]
    pub fn consumers(&self) -> &Consumers<R> {
        &self.consumers
    }
}

async fn drain_loop<R: Repositories>(
    consumers: Arc<Consumers<R>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let count = consumers.consume_all().await;
                if count > 0 {
                    tracing::trace!(count, "drained queue");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
