//! Worker pool plus result queue for replicated runs.
//!
//! Each job runs on a dedicated `rayon` pool and sends its result over a
//! bounded `crossbeam-channel` sized to the number of jobs, so a send never
//! blocks. The caller waits until all jobs finished and then drains exactly
//! one result per job, in job order.

use crossbeam_channel::bounded;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::CalibrationError;

/// A fixed-size pool for running replicas concurrently.
#[derive(Debug)]
pub struct ReplicaPool {
    pool: ThreadPool,
}

impl ReplicaPool {
    /// Build a pool with `workers` threads, or one per available core.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Pool`] if the threads cannot be spawned.
    pub fn new(workers: Option<usize>) -> Result<Self, CalibrationError> {
        let threads = workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from));
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("echo-replica-{index}"))
            .build()?;
        debug!(threads, "Replica pool started");
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `job(0..jobs)` concurrently and collect every result in job order.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::MissingResults`] if fewer results than
    /// jobs reach the queue.
    ///
    /// # Panics
    ///
    /// A panicking job is not caught: the pool finishes the other jobs and
    /// then resumes the panic on the caller.
    pub fn run_all<T, F>(&self, jobs: usize, job: F) -> Result<Vec<T>, CalibrationError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let (sender, receiver) = bounded::<(usize, T)>(jobs);
        let job = &job;
        self.pool.scope(|scope| {
            for index in 0..jobs {
                let sender = sender.clone();
                scope.spawn(move |_| {
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = sender.send((index, job(index)));
                });
            }
        });
        drop(sender);

        let mut slots: Vec<Option<T>> = (0..jobs).map(|_| None).collect();
        let mut received = 0_usize;
        for (index, result) in receiver.iter() {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(result);
                received = received.saturating_add(1);
            }
        }
        slots
            .into_iter()
            .collect::<Option<Vec<T>>>()
            .ok_or(CalibrationError::MissingResults {
                expected: jobs,
                received,
            })
    }
}
