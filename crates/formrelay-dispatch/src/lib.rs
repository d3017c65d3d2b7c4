//! # Submission Dispatch
//!
//! Routes stored form submissions to connectors.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────────┐     ┌───────────────┐
//! │  FormSubmitted  │────►│ DispatchCoordinator │────►│   Connector   │  (sync)
//! └─────────────────┘     └──────────┬──────────┘     └───────────────┘
//!                                    │ (async)
//!                                    ▼
//!                         ┌─────────────────────┐     ┌───────────────┐
//!                         │      TaskQueue      │────►│  TaskWorker   │
//!                         └─────────────────────┘     └───────┬───────┘
//!                                    ▲                        │
//!                                    └────────────────────────┘
//!                                      (retry after backoff)
//! ```
//!
//! ## Features
//!
//! - **Extraction**: one config per enabled connector per blueprint field
//! - **Async or inline**: chosen per field by `async_processing`
//! - **Retries**: up to `max_attempts`, fixed backoff, transient failures only
//! - **Isolation**: inline connector panics are contained and reported
//!
//! ## Example
//!
//! ```ignore
//! let config = DispatchConfig::from_env()?;
//! let (queue, receiver) = InMemoryTaskQueue::channel(config.queue_capacity);
//! let queue: Arc<dyn TaskQueue> = Arc::new(queue);
//!
//! let worker = Arc::new(TaskWorker::new(
//!     receiver,
//!     queue.clone(),
//!     TaskContext::new(submissions.clone(), registry.clone()),
//!     &config,
//! ));
//! tokio::spawn({
//!     let worker = worker.clone();
//!     async move { worker.run().await }
//! });
//!
//! let coordinator = DispatchCoordinator::new(registry, blueprints, queue, config);
//! let report = coordinator.handle(&FormSubmitted::new(submission)).await;
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod memory;
pub mod queue;
pub mod task;
pub mod traits;
pub mod worker;

pub use config::DispatchConfig;
pub use coordinator::{DispatchCoordinator, DispatchEntry, DispatchReport, DispatchStatus};
pub use error::{ConfigError, DispatchError};
pub use event::FormSubmitted;
pub use memory::{InMemoryBlueprints, InMemorySubmissionStore};
pub use queue::{InMemoryTaskQueue, TaskReceiver};
pub use task::{ConnectorTask, TaskContext, TaskOutcome};
pub use traits::{BlueprintSource, ConnectorField, SubmissionStore, TaskQueue};
pub use worker::TaskWorker;
