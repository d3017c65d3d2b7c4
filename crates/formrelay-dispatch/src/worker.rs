//! Connector Task Worker
//!
//! Background worker that executes connector tasks from the queue.
//! Handles retries with a fixed backoff and graceful shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify, Semaphore};
use tracing::{debug, error, info, instrument};

use crate::config::DispatchConfig;
use crate::queue::TaskReceiver;
use crate::task::{ConnectorTask, TaskContext, TaskOutcome};
use crate::traits::TaskQueue;

/// Worker that executes queued connector tasks.
pub struct TaskWorker {
    receiver: Mutex<TaskReceiver>,
    queue: Arc<dyn TaskQueue>,
    context: TaskContext,
    concurrency: usize,
    shutdown: Arc<AtomicBool>,
    shutdown_signal: Arc<Notify>,
}

impl TaskWorker {
    /// Create a new worker.
    ///
    /// `queue` receives tasks that are due for a retry; it is normally the
    /// sending half of `receiver`.
    pub fn new(
        receiver: TaskReceiver,
        queue: Arc<dyn TaskQueue>,
        context: TaskContext,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            receiver: Mutex::new(receiver),
            queue,
            context,
            concurrency: config.worker_concurrency.max(1),
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_signal: Arc::new(Notify::new()),
        }
    }

    /// Start the worker. Returns once shutdown was requested and in-flight
    /// tasks have finished.
    #[instrument(skip(self))]
    pub async fn run(&self) {
        info!(
            target: "formrelay_task",
            concurrency = self.concurrency,
            "Starting connector task worker"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut receiver = self.receiver.lock().await;

        loop {
            if self.is_shutdown() {
                info!(target: "formrelay_task", "Worker shutdown requested, stopping receive loop");
                break;
            }

            let task = tokio::select! {
                () = self.shutdown_signal.notified() => continue,
                task = receiver.recv() => match task {
                    Some(task) => task,
                    None => {
                        info!(target: "formrelay_task", "Task queue closed");
                        break;
                    }
                },
            };

            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let context = self.context.clone();
            let queue = self.queue.clone();

            tokio::spawn(async move {
                let _permit = permit;
                process_task(context, queue, task).await;
            });
        }

        // Wait for in-flight tasks to complete
        info!(target: "formrelay_task", "Waiting for in-flight tasks to complete...");
        let _ = semaphore.acquire_many(self.concurrency as u32).await;
        info!(target: "formrelay_task", "Worker stopped");
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        info!(target: "formrelay_task", "Shutdown requested");
        self.shutdown.store(true, Ordering::Relaxed);
        self.shutdown_signal.notify_one();
    }

    /// Check if shutdown was requested.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

/// Execute a single task and schedule its retry if needed.
#[instrument(skip(context, queue, task), fields(task_id = %task.id, connector = %task.connector_type))]
async fn process_task(context: TaskContext, queue: Arc<dyn TaskQueue>, mut task: ConnectorTask) {
    match task.execute(&context).await {
        TaskOutcome::Retry { after } => {
            debug!(
                target: "formrelay_task",
                attempt = task.attempt,
                backoff_secs = after.as_secs(),
                "Scheduling connector task retry"
            );

            // The retry waits outside the worker slot.
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                let task_id = task.id;
                let submission_id = task.submission_id.clone();
                let connector_type = task.connector_type.clone();
                let attempts = task.attempt;
                if let Err(e) = queue.requeue(task).await {
                    error!(
                        target: "formrelay_task",
                        task_id = %task_id,
                        submission_id = %submission_id,
                        connector = %connector_type,
                        attempts,
                        error = %e,
                        "Connector job failed permanently"
                    );
                }
            });
        }
        outcome => {
            debug!(target: "formrelay_task", outcome = ?outcome, "Connector task finished");
        }
    }
}
