use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pagewin::{LoadKind, LoadRequest, RequestToken};

use crate::Error;

/// A load tagged with its generation, as handed to a data provider.
///
/// The cancel flag is cooperative: it is raised once a newer request supersedes this one.
/// Providers may poll [`FetchRequest::is_cancelled`] to stop early, but are free to run to
/// completion; a superseded result is discarded on delivery either way.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub kind: LoadKind,
    pub from: usize,
    pub size: usize,
    cancel: Arc<AtomicBool>,
}

impl FetchRequest {
    pub fn new(token: RequestToken, load: LoadRequest) -> Self {
        Self {
            token,
            kind: load.kind,
            from: load.from,
            size: load.size,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn load(&self) -> LoadRequest {
        LoadRequest::new(self.kind, self.from, self.size)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    pub(crate) fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }
}

/// Outcome of a fetch, as seen by the interaction thread.
#[derive(Clone, Debug)]
pub enum FetchStatus {
    Complete,
    /// The provider failed; the result carries no records and the window is left untouched.
    Failed(Arc<Error>),
}

/// Records fetched for a [`FetchRequest`], travelling back to the interaction thread.
///
/// Once posted, the worker no longer owns the records.
#[derive(Clone, Debug)]
pub struct FetchResult<T> {
    pub token: RequestToken,
    pub kind: LoadKind,
    pub from: usize,
    pub records: Vec<T>,
    pub end_of_data: bool,
    pub status: FetchStatus,
}

impl<T> FetchResult<T> {
    pub fn complete(request: &FetchRequest, records: Vec<T>, end_of_data: bool) -> Self {
        Self {
            token: request.token,
            kind: request.kind,
            from: request.from,
            records,
            end_of_data,
            status: FetchStatus::Complete,
        }
    }

    pub fn failed(request: &FetchRequest, error: Error) -> Self {
        Self {
            token: request.token,
            kind: request.kind,
            from: request.from,
            records: Vec::new(),
            end_of_data: false,
            status: FetchStatus::Failed(Arc::new(error)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FetchStatus::Failed(_))
    }
}
