//! Async task lifecycle tracking

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::task::JoinHandle;

static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// Number of tracked tasks still running
pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Spawn an instrumented async task with lifecycle tracking
///
/// ```rust,ignore
/// spawn_tracked("swap_execution", async move {
///     execute(plan).await
/// });
/// ```
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();

    tracing::debug!(task = %name, task_id, "Task spawned");

    tokio::spawn(async move {
        let result = future.await;
        let duration = start.elapsed();

        tracing::debug!(
            task = %name,
            task_id,
            duration_ms = duration.as_millis() as u64,
            "Task completed"
        );

        // Warn about long-running tasks
        if duration.as_secs() > 30 {
            tracing::warn!(
                task = %name,
                task_id,
                duration_ms = duration.as_millis() as u64,
                "Task took very long"
            );
        }

        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
        result
    })
}
