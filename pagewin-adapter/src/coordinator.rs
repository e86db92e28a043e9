use std::sync::Arc;

use pagewin::{LoadRequest, RequestToken};

use crate::delivery::Poster;
use crate::options::OnRequestCallback;
use crate::provider::run_fetch;
use crate::{DataProvider, Executor, FetchRequest, FetchResult};

/// Issues fetches, one at a time, and decides which delivered results are still wanted.
///
/// Every request gets a fresh [`RequestToken`]. A new request supersedes the one in flight: the
/// old request's cancel flag is raised and its result, should it still arrive, no longer matches
/// [`Self::is_current`].
pub struct FetchCoordinator<P: DataProvider> {
    provider: Arc<P>,
    executor: Box<dyn Executor>,
    poster: Poster<P::Record>,
    on_request: Option<OnRequestCallback>,
    latest: RequestToken,
    in_flight: Option<FetchRequest>,
}

impl<P: DataProvider> FetchCoordinator<P> {
    pub fn new(
        provider: Arc<P>,
        executor: Box<dyn Executor>,
        poster: Poster<P::Record>,
        on_request: Option<OnRequestCallback>,
    ) -> Self {
        Self {
            provider,
            executor,
            poster,
            on_request,
            latest: RequestToken::default(),
            in_flight: None,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// The most recently issued token (generation 0 before the first request).
    pub fn latest(&self) -> RequestToken {
        self.latest
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The load currently in flight, if any.
    pub fn in_flight(&self) -> Option<LoadRequest> {
        self.in_flight.as_ref().map(FetchRequest::load)
    }

    /// Issues `load` under a new token, superseding whatever is in flight.
    pub fn request(&mut self, load: LoadRequest) -> RequestToken {
        self.cancel();
        self.latest = self.latest.next();
        let request = FetchRequest::new(self.latest, load);

        wdebug!(
            generation = request.token.generation,
            kind = ?request.kind,
            from = request.from,
            size = request.size,
            "fetch requested"
        );
        if let Some(on_request) = &self.on_request {
            on_request(&request);
        }

        let provider = Arc::clone(&self.provider);
        let poster = self.poster.clone();
        let job_request = request.clone();
        let job = Box::new(move || {
            let result = run_fetch(provider.as_ref(), &job_request);
            // The adapter is gone; nobody is left to apply or release these records.
            if let Err(result) = poster.post(result) {
                for record in result.records {
                    provider.release(record);
                }
            }
        });

        if let Err(error) = self.executor.execute(&request, job) {
            wwarn!(generation = request.token.generation, %error, "fetch dispatch failed");
            // Delivered like any other failure so the in-flight state clears on the next pump.
            let _ = self.poster.post(FetchResult::failed(&request, error));
        }

        self.in_flight = Some(request);
        self.latest
    }

    /// Whether a result carrying `token` should be applied.
    ///
    /// Only the in-flight request is current. Once its result was taken via [`Self::complete`],
    /// a duplicate delivery of the same token is stale.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.in_flight.as_ref().is_some_and(|r| r.token == token)
    }

    /// Marks the in-flight request as delivered.
    pub fn complete(&mut self, token: RequestToken) {
        if self.is_current(token) {
            self.in_flight = None;
        }
    }

    /// Abandons the in-flight request, if any. Its result will be discarded on delivery.
    pub fn cancel(&mut self) {
        if let Some(request) = self.in_flight.take() {
            wtrace!(generation = request.token.generation, "fetch cancelled");
            request.cancel();
        }
    }
}

impl<P: DataProvider> Drop for FetchCoordinator<P> {
    fn drop(&mut self) {
        self.cancel();
    }
}
