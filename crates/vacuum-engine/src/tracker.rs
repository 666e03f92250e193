//! In-flight job counter gating run completion

use tokio::sync::watch;

/// Counts jobs that were enqueued but whose completion callback has not finished
///
/// Backed by a watch channel so the orchestrator can wait for zero without
/// polling. The count never goes negative.
#[derive(Debug)]
pub struct InFlight {
    count: watch::Sender<usize>,
}

impl InFlight {
    /// Create a tracker with nothing in flight
    pub fn new() -> Self {
        let (count, _rx) = watch::channel(0);
        Self { count }
    }

    /// Number of jobs currently in flight
    pub fn current(&self) -> usize {
        *self.count.borrow()
    }

    /// Whether no job is queued or executing
    pub fn is_idle(&self) -> bool {
        self.current() == 0
    }

    /// Count one more job; called once per enqueue
    pub fn increment(&self) {
        self.count.send_modify(|count| *count += 1);
    }

    /// Count one job as done; called once per completion callback
    pub fn decrement(&self) {
        self.count.send_modify(|count| {
            if *count == 0 {
                tracing::error!("In-flight counter decremented below zero");
            } else {
                *count -= 1;
            }
        });
    }

    /// Wait until no job is in flight
    ///
    /// Returns immediately when the counter is already zero.
    pub async fn wait_idle(&self) {
        let mut rx = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}
