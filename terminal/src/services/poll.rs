//! # Polling Timers
//!
//! Background pollers are plain tokio tasks driven by an interval. The owner
//! holds a [`PollHandle`]; dropping it (or calling [`PollHandle::cancel`])
//! aborts every task it tracks.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Cancels its timers on drop.
#[derive(Debug, Default)]
pub struct PollHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl PollHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `tick` now and then every `period` until cancelled.
    ///
    /// A tick that overruns its period delays the next one instead of
    /// queueing a burst.
    pub fn every<F, Fut>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick().await;
            }
        });
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
