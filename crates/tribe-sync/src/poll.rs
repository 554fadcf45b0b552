use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use tribe_api::ChatApi;

use crate::controller::ChatController;
use crate::logging::{SyncEvent, SyncLog};

/// Running poll task. Dropping the handle cancels it.
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Cancel and wait for the task to exit. An in-flight poll is abandoned
    /// before it can write to the store.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<A: ChatApi> ChatController<A> {
    /// Poll every `poll_interval` until the handle is stopped or the
    /// controller shuts down. Ticks never overlap: a slow poll delays the
    /// next one.
    pub fn spawn_polling(self: &Arc<Self>) -> PollHandle {
        let controller = Arc::clone(self);
        let cancel = self.cancel.child_token();
        let token = cancel.clone();
        let period = self.config.poll_period();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            controller.logger.log(SyncLog {
                component: "poller",
                event: SyncEvent::PollStarted {
                    interval_ms: period.as_millis() as u64,
                },
            });

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    // Errors are already logged by poll_once.
                    _ = controller.poll_once() => {}
                }
            }

            controller.logger.log(SyncLog {
                component: "poller",
                event: SyncEvent::PollStopped,
            });
        });

        PollHandle {
            cancel,
            task: Some(task),
        }
    }

    /// Initialize, then start polling whether or not initialization succeeded.
    pub async fn run(self: Arc<Self>) -> PollHandle {
        // Failures were already alerted; stale data stays visible.
        let _ = self.initialize().await;
        self.spawn_polling()
    }
}
