use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use snafu::IntoError;

use crate::error::{ProviderSnafu, WorkerPanickedSnafu};
use crate::{BoxError, FetchRequest, FetchResult};

/// Records produced by one provider call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fetched<T> {
    /// Records for `from..from + records.len()`, in order.
    pub records: Vec<T>,
    /// No records exist past the end of this range.
    pub end_of_data: bool,
}

impl<T> Fetched<T> {
    pub fn new(records: Vec<T>, end_of_data: bool) -> Self {
        Self {
            records,
            end_of_data,
        }
    }
}

/// The backing store behind a [`crate::WindowAdapter`].
///
/// `fetch` runs on a worker thread and may block on I/O. It can be abandoned: its result may be
/// discarded if a newer request was issued meanwhile, so it must not leave shared state half
/// updated. `total_count` and `release` are called on the interaction thread.
pub trait DataProvider: Send + Sync + 'static {
    type Record: Send + 'static;

    /// Returns the records for `request.from..request.from + request.size`.
    ///
    /// Fewer records are only allowed when the data set ends inside the range (report it through
    /// `end_of_data`). A short `Prev` result would leave a gap above the window, which is a fatal
    /// contract violation on delivery.
    fn fetch(&self, request: &FetchRequest) -> Result<Fetched<Self::Record>, BoxError>;

    /// Authoritative number of records, used when jumping to the end.
    fn total_count(&self) -> Result<usize, BoxError>;

    /// Called once for every record the adapter stops holding: evicted, overwritten, removed,
    /// discarded as stale or dropped with the adapter.
    fn release(&self, record: Self::Record) {
        drop(record);
    }
}

impl<P: DataProvider> DataProvider for Arc<P> {
    type Record = P::Record;

    fn fetch(&self, request: &FetchRequest) -> Result<Fetched<Self::Record>, BoxError> {
        (**self).fetch(request)
    }

    fn total_count(&self) -> Result<usize, BoxError> {
        (**self).total_count()
    }

    fn release(&self, record: Self::Record) {
        (**self).release(record)
    }
}

/// Runs one provider call and turns every outcome, panics included, into a deliverable result.
pub(crate) fn run_fetch<P: DataProvider>(
    provider: &P,
    request: &FetchRequest,
) -> FetchResult<P::Record> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.fetch(request)));
    match outcome {
        Ok(Ok(fetched)) => FetchResult::complete(request, fetched.records, fetched.end_of_data),
        Ok(Err(source)) => {
            let error = ProviderSnafu.into_error(source);
            wwarn!(generation = request.token.generation, %error, "fetch failed");
            FetchResult::failed(request, error)
        }
        Err(payload) => {
            let error = WorkerPanickedSnafu {
                message: panic_message(payload.as_ref()),
            }
            .build();
            wwarn!(generation = request.token.generation, %error, "fetch panicked");
            FetchResult::failed(request, error)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A provider over an in-memory list shared with the rest of the application.
///
/// Every fetch clones the requested slice, like building rows from a query per chunk. Mutating
/// the list does not touch any window; call `trigger_reload` on the adapter afterwards.
pub struct VecProvider<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T: Clone + Send + Sync + 'static> VecProvider<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Creates a provider sharing `rows` with the caller.
    pub fn from_shared(rows: Arc<RwLock<Vec<T>>>) -> Self {
        Self { rows }
    }

    pub fn shared(&self) -> Arc<RwLock<Vec<T>>> {
        Arc::clone(&self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, row: T) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
    }

    pub fn remove(&self, index: usize) -> Option<T> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        (index < rows.len()).then(|| rows.remove(index))
    }

    pub fn replace(&self, rows: Vec<T>) {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = rows;
    }
}

impl<T: Clone + Send + Sync + 'static> DataProvider for VecProvider<T> {
    type Record = T;

    fn fetch(&self, request: &FetchRequest) -> Result<Fetched<T>, BoxError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let start = request.from.min(rows.len());
        let end = request.from.saturating_add(request.size).min(rows.len());
        Ok(Fetched::new(rows[start..end].to_vec(), end == rows.len()))
    }

    fn total_count(&self) -> Result<usize, BoxError> {
        Ok(self.len())
    }
}
