use std::{
    collections::VecDeque,
    io,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
};

use log::{debug, error, info};
use thiserror::Error;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// What workers do with jobs still queued once a stop is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Exit as soon as the stop flag is seen; unpopped jobs are dropped.
    Abandon,
    /// Keep popping until the queue is empty, then exit.
    Drain,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("work queue has shut down")]
pub struct QueueClosed;

struct QueueState {
    jobs: VecDeque<Job>,
    stopping: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
    policy: ShutdownPolicy,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Jobs never run under this lock, so poisoning cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_job(&self) -> Option<Job> {
        let mut state = self.lock();
        loop {
            let exit = match self.policy {
                ShutdownPolicy::Abandon => state.stopping,
                ShutdownPolicy::Drain => state.stopping && state.jobs.is_empty(),
            };
            if exit {
                return None;
            }
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// A FIFO of jobs consumed by a fixed set of worker threads.
pub struct WorkQueue {
    name: &'static str,
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkQueue {
    pub fn start(name: &'static str, workers: usize, policy: ShutdownPolicy) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                stopping: false,
            }),
            available: Condvar::new(),
            policy,
        });

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("{}-{}", name, id))
                .spawn(move || worker_loop(name, id, &shared))?;
            handles.push(handle);
        }
        info!("{}: started {} worker(s), {:?} on shutdown", name, workers, policy);

        Ok(Self {
            name,
            shared,
            workers: Mutex::new(handles),
        })
    }

    /// Appends a job and returns immediately.
    pub fn push(&self, job: Job) -> Result<(), QueueClosed> {
        {
            let mut state = self.shared.lock();
            if state.stopping {
                return Err(QueueClosed);
            }
            state.jobs.push_back(job);
            debug!("{}: queued job, {} pending", self.name, state.jobs.len());
        }
        self.shared.available.notify_one();
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    pub fn is_stopping(&self) -> bool {
        self.shared.lock().stopping
    }

    /// Requests a stop and wakes every worker without waiting for them.
    pub fn stop(&self) {
        self.shared.lock().stopping = true;
        self.shared.available.notify_all();
    }

    /// Stops the queue and joins all workers. Jobs still queued after the
    /// workers exit are dropped. Safe to call more than once.
    pub fn shutdown(&self) {
        self.stop();
        let handles: Vec<_> = {
            let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            workers.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                error!("{}: worker thread terminated abnormally", self.name);
            }
        }

        let abandoned = {
            let mut state = self.shared.lock();
            let count = state.jobs.len();
            state.jobs.clear();
            count
        };
        if abandoned > 0 {
            info!("{}: abandoned {} queued job(s)", self.name, abandoned);
        }
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(name: &str, id: usize, shared: &Shared) {
    while let Some(job) = shared.next_job() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("{}-{}: job panicked, worker continues", name, id);
        }
    }
    debug!("{}-{}: exiting", name, id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_jobs_run_in_fifo_order_on_single_worker() {
        let queue = WorkQueue::start("test", 1, ShutdownPolicy::Drain).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..10 {
            let order = Arc::clone(&order);
            queue
                .push(Box::new(move || order.lock().unwrap().push(i)))
                .unwrap();
        }
        queue.shutdown();

        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_drain_policy_finishes_backlog() {
        let queue = WorkQueue::start("drain", 2, ShutdownPolicy::Drain).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let done = Arc::clone(&done);
            queue
                .push(Box::new(move || {
                    thread::sleep(Duration::from_millis(2));
                    done.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }
        queue.shutdown();

        assert_eq!(done.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_abandon_policy_drops_unpopped_jobs() {
        let queue = WorkQueue::start("abandon", 1, ShutdownPolicy::Abandon).unwrap();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let ran = Arc::new(AtomicUsize::new(0));

        queue
            .push(Box::new(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            }))
            .unwrap();
        started_rx.recv().unwrap();

        for _ in 0..3 {
            let ran = Arc::clone(&ran);
            queue
                .push(Box::new(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        queue.stop();
        release_tx.send(()).unwrap();
        queue.shutdown();

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_push_after_stop_is_rejected() {
        let queue = WorkQueue::start("closed", 1, ShutdownPolicy::Drain).unwrap();
        queue.shutdown();
        assert_eq!(queue.push(Box::new(|| {})), Err(QueueClosed));
        assert!(queue.is_stopping());
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let queue = WorkQueue::start("panics", 1, ShutdownPolicy::Drain).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        queue.push(Box::new(|| panic!("boom"))).unwrap();
        let counter = Arc::clone(&done);
        queue
            .push(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        queue.shutdown();

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
