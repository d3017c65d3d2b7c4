//! In-process task queue backed by a bounded tokio channel.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::DispatchError;
use crate::task::ConnectorTask;
use crate::traits::TaskQueue;

/// Receiving half, consumed by a [`TaskWorker`](crate::TaskWorker).
pub type TaskReceiver = mpsc::Receiver<ConnectorTask>;

/// Bounded queue. New tasks never wait; retries wait for a free slot.
#[derive(Debug, Clone)]
pub struct InMemoryTaskQueue {
    sender: mpsc::Sender<ConnectorTask>,
}

impl InMemoryTaskQueue {
    /// Create a queue and its receiving half.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, TaskReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Free slots left in the queue.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.sender.capacity()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task: ConnectorTask) -> Result<(), DispatchError> {
        self.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::QueueClosed,
        })
    }

    async fn requeue(&self, task: ConnectorTask) -> Result<(), DispatchError> {
        self.sender
            .send(task)
            .await
            .map_err(|_| DispatchError::QueueClosed)
    }
}
