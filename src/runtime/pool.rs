use std::io;

use super::queue::{QueueClosed, ShutdownPolicy, WorkQueue};

/// Number of workers used for concurrent command execution.
pub const POOL_SIZE: usize = 4;

/// Fixed set of workers sharing one FIFO. Queued work is drained on shutdown.
pub struct ThreadPool {
    queue: WorkQueue,
    size: usize,
}

impl ThreadPool {
    pub fn new(size: usize) -> io::Result<Self> {
        let size = size.max(1);
        Ok(Self {
            queue: WorkQueue::start("pool", size, ShutdownPolicy::Drain)?,
            size,
        })
    }

    /// Fire-and-forget: no handle to the job's result is returned.
    pub fn enqueue<F>(&self, job: F) -> Result<(), QueueClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Box::new(job))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}
