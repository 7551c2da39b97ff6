use std::{io, thread, time::Duration};

use log::debug;

use super::queue::{QueueClosed, ShutdownPolicy, WorkQueue};

/// Single background worker running deferred actions in arrival order.
///
/// A delayed action sleeps on the worker thread, so it holds up every
/// action queued behind it. On shutdown the action in progress finishes and
/// anything still queued is abandoned.
pub struct TaskScheduler {
    queue: WorkQueue,
}

impl TaskScheduler {
    pub fn start() -> io::Result<Self> {
        Ok(Self {
            queue: WorkQueue::start("scheduler", 1, ShutdownPolicy::Abandon)?,
        })
    }

    pub fn submit<F>(&self, action: F) -> Result<(), QueueClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Box::new(action))
    }

    /// Queues `action` to run after `delay` has elapsed on the worker thread.
    pub fn schedule<F>(&self, delay: Duration, action: F) -> Result<(), QueueClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("scheduler: queued action with {:?} delay", delay);
        self.submit(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            action();
        })
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    pub fn stop(&self) {
        self.queue.stop();
    }

    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}
