//! Background execution: the deferred-task scheduler and the metered
//! worker pool, both built on one producer/consumer queue.

mod metrics;
mod pool;
mod queue;
mod scheduler;

pub use metrics::Metrics;
pub use pool::{ThreadPool, POOL_SIZE};
pub use queue::{Job, QueueClosed, ShutdownPolicy, WorkQueue};
pub use scheduler::TaskScheduler;
