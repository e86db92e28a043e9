use std::sync::Arc;

use pagewin::{RequestToken, WindowOptions};

use crate::{Error, FetchRequest, Waker};

/// Fired on the interaction thread right before a fetch is dispatched.
pub type OnRequestCallback = Arc<dyn Fn(&FetchRequest) + Send + Sync>;

/// Fired after a result was applied: `(token, from, records delivered)`.
pub type OnProvidedCallback = Arc<dyn Fn(RequestToken, usize, usize) + Send + Sync>;

/// Fired when the current fetch failed. The window was left unchanged.
pub type OnFailedCallback = Arc<dyn Fn(RequestToken, &Error) + Send + Sync>;

/// Configuration for [`crate::WindowAdapter`].
///
/// Hooks are stored in `Arc`s so the options stay cheap to clone.
#[derive(Clone, Default)]
pub struct AdapterOptions {
    pub window: WindowOptions,
    pub on_request: Option<OnRequestCallback>,
    pub on_provided: Option<OnProvidedCallback>,
    pub on_failed: Option<OnFailedCallback>,
    /// Called from the fetch worker after posting a result, so a host event loop can schedule a
    /// [`crate::WindowAdapter::pump`].
    pub waker: Option<Waker>,
}

impl AdapterOptions {
    pub fn new(window: WindowOptions) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: WindowOptions) -> Self {
        self.window = window;
        self
    }

    pub fn with_on_request(
        mut self,
        on_request: Option<impl Fn(&FetchRequest) + Send + Sync + 'static>,
    ) -> Self {
        self.on_request = on_request.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_provided(
        mut self,
        on_provided: Option<impl Fn(RequestToken, usize, usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_provided = on_provided.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_failed(
        mut self,
        on_failed: Option<impl Fn(RequestToken, &Error) + Send + Sync + 'static>,
    ) -> Self {
        self.on_failed = on_failed.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_waker(mut self, waker: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.waker = waker.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("window", &self.window)
            .field("on_request", &self.on_request.is_some())
            .field("on_provided", &self.on_provided.is_some())
            .field("on_failed", &self.on_failed.is_some())
            .field("waker", &self.waker.is_some())
            .finish()
    }
}
