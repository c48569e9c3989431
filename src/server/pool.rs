//! Fixed-size pool of long-lived workers fed from one bounded queue.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::server::shutdown::Shutdown;

/// An opaque unit of work, run to completion by one worker.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    Closed,

    #[error("worker queue is full")]
    Full,
}

pub struct WorkerPool {
    sender: mpsc::Sender<Task>,
    receiver: Arc<Mutex<mpsc::Receiver<Task>>>,
    shutdown: Shutdown,
    workers: Vec<JoinHandle<()>>,
    capacity: usize,
}

impl WorkerPool {
    /// Spawns `size` workers sharing a queue of at most `capacity` waiting tasks.
    ///
    /// # Panics
    ///
    /// Panics if `size` or `capacity` is zero.
    pub fn new(size: usize, capacity: usize) -> Self {
        assert!(size > 0, "worker pool needs at least one worker");
        assert!(capacity > 0, "worker queue needs a capacity of at least one");

        let (sender, receiver) = mpsc::channel::<Task>(capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let shutdown = Shutdown::new();

        let workers = (0..size)
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let stop = shutdown.subscribe();
                tokio::spawn(worker_loop(id, receiver, stop))
            })
            .collect();

        info!(workers = size, capacity, "worker pool started");

        Self {
            sender,
            receiver,
            shutdown,
            workers,
            capacity,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queues a task, waiting for room when the queue is full.
    pub async fn dispatch<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.sender
            .send(Box::pin(task))
            .await
            .map_err(|_| PoolError::Closed)
    }

    /// Queues a task only if there is room right now.
    pub fn try_dispatch<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.sender.try_send(Box::pin(task)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PoolError::Full,
            mpsc::error::TrySendError::Closed(_) => PoolError::Closed,
        })
    }

    /// Signals every worker to stop and refuses further tasks. In-flight and
    /// queued tasks are dropped without being polled again.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        self.receiver.lock().await.close();
        debug!("worker pool shutdown signalled");
    }

    /// Waits for every worker to exit.
    pub async fn join(self) {
        for worker in self.workers {
            let _ = worker.await;
        }
        info!("worker pool stopped");
    }
}

async fn worker_loop(
    id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Task>>>,
    mut stop: tokio::sync::broadcast::Receiver<()>,
) {
    loop {
        let task = tokio::select! {
            biased;
            _ = stop.recv() => break,
            task = async { receiver.lock().await.recv().await } => task,
        };

        let Some(task) = task else { break };

        tokio::select! {
            biased;
            _ = stop.recv() => {
                debug!(worker = id, "dropping in-flight task");
                break;
            }
            _ = task => {}
        }
    }
    debug!(worker = id, "worker exiting");
}
