use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use snafu::ResultExt;

use crate::error::{Result, SpawnSnafu};
use crate::FetchRequest;

/// A fetch ready to run: calls the provider and posts the result.
pub type FetchJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs fetch jobs off the interaction thread.
///
/// An executor only decides *where* a job runs. Jobs never touch the window themselves; they post
/// to the delivery channel.
pub trait Executor {
    fn execute(&self, request: &FetchRequest, job: FetchJob) -> Result<()>;
}

/// Spawns one named thread per fetch.
///
/// A provider stuck on I/O only holds up its own (by then likely stale) request.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadExecutor;

impl Executor for ThreadExecutor {
    fn execute(&self, request: &FetchRequest, job: FetchJob) -> Result<()> {
        thread::Builder::new()
            .name(format!("pagewin-fetch-{}", request.token.generation))
            .spawn(job)
            .context(SpawnSnafu)?;
        Ok(())
    }
}

/// Holds jobs until the caller runs them, in any order.
///
/// Useful to drive completions deterministically, e.g. to deliver an older fetch after a newer
/// one.
#[derive(Clone, Default)]
pub struct QueueExecutor {
    jobs: Arc<Mutex<VecDeque<(FetchRequest, FetchJob)>>>,
}

impl QueueExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Requests of queued jobs, oldest first.
    pub fn pending_requests(&self) -> Vec<FetchRequest> {
        self.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Runs the oldest queued job. Returns `false` if the queue was empty.
    pub fn run_oldest(&self) -> bool {
        let next = self.lock().pop_front();
        Self::run(next)
    }

    /// Runs the most recently queued job. Returns `false` if the queue was empty.
    pub fn run_newest(&self) -> bool {
        let next = self.lock().pop_back();
        Self::run(next)
    }

    /// Runs every queued job in submission order, returning how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_oldest() {
            ran += 1;
        }
        ran
    }

    /// Drops queued jobs without running them.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn run(next: Option<(FetchRequest, FetchJob)>) -> bool {
        // The lock is released before the job runs, so jobs may enqueue more work.
        match next {
            Some((_, job)) => {
                job();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(FetchRequest, FetchJob)>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for QueueExecutor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QueueExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Executor for QueueExecutor {
    fn execute(&self, request: &FetchRequest, job: FetchJob) -> Result<()> {
        self.lock().push_back((request.clone(), job));
        Ok(())
    }
}
