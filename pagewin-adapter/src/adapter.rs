use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pagewin::{Entry, LoadKind, LoadRequest, RequestToken, Window, WindowState};
use snafu::{ResultExt, ensure};

use crate::coordinator::FetchCoordinator;
use crate::delivery::{self, Inbox};
use crate::error::{CapacitySnafu, ProviderSnafu, Result};
use crate::options::{OnFailedCallback, OnProvidedCallback};
use crate::{
    AdapterOptions, DataProvider, Executor, FetchResult, FetchStatus, ScrollAnchor,
    ThreadExecutor, Viewport,
};

/// A snapshot of an adapter's bookkeeping, for debugging and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdapterState {
    pub window: WindowState,
    /// Generation of the most recently issued request.
    pub generation: u64,
    pub fetching: bool,
}

/// The object a list renderer talks to.
///
/// It answers count/record/identity queries from the materialized [`Window`] and, while
/// positions are rendered, asks its [`DataProvider`] for more records in the background.
///
/// Threading:
/// - The adapter lives on one interaction thread; it is neither `Send` nor `Sync`.
/// - Fetches run on an [`Executor`]. Their results are only applied in [`Self::pump`], so the
///   window is never touched by a worker.
///
/// A typical frame:
/// 1. `pump(&mut viewport)` to apply finished fetches.
/// 2. For each rendered position: `record_at(pos)` and `on_render_edge(pos, &viewport)`.
pub struct WindowAdapter<P: DataProvider> {
    window: Window<P::Record>,
    coordinator: FetchCoordinator<P>,
    inbox: Inbox<P::Record>,
    on_provided: Option<OnProvidedCallback>,
    on_failed: Option<OnFailedCallback>,
    _not_send: PhantomData<*const ()>,
}

impl<P: DataProvider> WindowAdapter<P> {
    /// Creates an adapter fetching on a [`ThreadExecutor`].
    ///
    /// Panics if the window options are invalid; see [`Self::try_new`].
    #[track_caller]
    pub fn new(provider: P, options: AdapterOptions) -> Self {
        options.window.assert_valid();
        match Self::with_executor(provider, options, ThreadExecutor) {
            Ok(adapter) => adapter,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_new(provider: P, options: AdapterOptions) -> Result<Self> {
        Self::with_executor(provider, options, ThreadExecutor)
    }

    pub fn with_executor(
        provider: P,
        options: AdapterOptions,
        executor: impl Executor + 'static,
    ) -> Result<Self> {
        let window_options = options.window;
        ensure!(
            window_options.is_valid(),
            CapacitySnafu {
                chunk_size: window_options.chunk_size,
                max_window_size: window_options.max_window_size,
                look_behind: window_options.look_behind,
            }
        );

        let (poster, inbox) = delivery::channel(options.waker);
        let coordinator = FetchCoordinator::new(
            Arc::new(provider),
            Box::new(executor),
            poster,
            options.on_request,
        );
        Ok(Self {
            window: Window::new(window_options),
            coordinator,
            inbox,
            on_provided: options.on_provided,
            on_failed: options.on_failed,
            _not_send: PhantomData,
        })
    }

    pub fn provider(&self) -> &P {
        self.coordinator.provider().as_ref()
    }

    pub fn window(&self) -> &Window<P::Record> {
        &self.window
    }

    /// Number of renderable positions. Counts the placeholder while uninitialized.
    pub fn materialized_count(&self) -> usize {
        self.window.materialized_count()
    }

    /// The entry at `position`, or `None` outside `0..materialized_count()`.
    pub fn record_at(&self, position: usize) -> Option<Entry<'_, P::Record>> {
        self.window.get(position)
    }

    /// `top_offset + position`. Stable while the window slides, not across a reload.
    pub fn stable_id_at(&self, position: usize) -> u64 {
        self.window.stable_id(position)
    }

    pub fn is_initialized(&self) -> bool {
        self.window.is_initialized()
    }

    pub fn top_offset(&self) -> usize {
        self.window.top_offset()
    }

    pub fn total_count(&self) -> Option<usize> {
        self.window.total_count()
    }

    pub fn is_fetching(&self) -> bool {
        self.coordinator.is_fetching()
    }

    pub fn generation(&self) -> RequestToken {
        self.coordinator.latest()
    }

    pub fn state(&self) -> AdapterState {
        AdapterState {
            window: self.window.state(),
            generation: self.coordinator.latest().generation,
            fetching: self.coordinator.is_fetching(),
        }
    }

    /// Call for every position the renderer draws.
    ///
    /// Issues an `Init` load while the placeholder is shown, a `Prev` load when the first position
    /// is drawn with records above the window, and a `Next` load when the last position is drawn
    /// and more records may follow. A load identical to the one in flight is not reissued.
    ///
    /// Returns the token of the issued request, if any.
    pub fn on_render_edge(
        &mut self,
        position: usize,
        viewport: &impl Viewport,
    ) -> Option<RequestToken> {
        let load = self
            .window
            .edge_request(position, viewport.first_visible())?;
        if self.coordinator.in_flight() == Some(load) {
            return None;
        }
        Some(self.coordinator.request(load))
    }

    /// Re-queries the data set around the first visible position, e.g. after the backing data
    /// changed. The total count becomes unknown until the end is reached again.
    pub fn trigger_reload(&mut self, viewport: &impl Viewport) -> RequestToken {
        self.window.set_total_count(None);
        let load = self
            .window
            .anchored_request(LoadKind::Reload, viewport.first_visible());
        self.coordinator.request(load)
    }

    /// Moves the window's anchor to the start of the data set.
    ///
    /// Nothing is fetched; follow with [`Self::trigger_reload`] (with the viewport at the top).
    pub fn jump_to_start(&mut self) {
        self.coordinator.cancel();
        self.window.set_top_offset(0);
    }

    /// Moves the window's anchor so a reload shows the last chunk of the data set.
    ///
    /// Queries the provider for the authoritative total count (on this thread) and returns the
    /// new top offset. Like [`Self::jump_to_start`], follow with a reload.
    pub fn jump_to_end(&mut self) -> Result<usize> {
        let total = self.provider().total_count().context(ProviderSnafu)?;
        let options = self.window.options();
        let top = total
            .saturating_add(options.look_behind)
            .saturating_sub(options.chunk_size);

        self.coordinator.cancel();
        self.window.set_total_count(Some(total));
        self.window.set_top_offset(top);
        wdebug!(total, top_offset = top, "jumped to end");
        Ok(top)
    }

    /// Applies every result delivered so far. Returns how many current results were handled
    /// (applied or failed); stale results are released and not counted.
    pub fn pump(&mut self, viewport: &mut impl Viewport) -> usize {
        let mut handled = 0;
        while let Some(result) = self.inbox.try_recv() {
            handled += usize::from(self.deliver(result, viewport));
        }
        handled
    }

    /// Like [`Self::pump`], but waits up to `timeout` for the in-flight fetch to be delivered.
    ///
    /// Returns early once a current result was handled, or immediately when nothing is in
    /// flight. A `timeout` too large to form a deadline (e.g. `Duration::MAX`) waits without one.
    pub fn pump_timeout(&mut self, viewport: &mut impl Viewport, timeout: Duration) -> usize {
        let deadline = Instant::now().checked_add(timeout);
        let mut handled = self.pump(viewport);
        while handled == 0 && self.coordinator.is_fetching() {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    self.inbox.recv_timeout(remaining)
                }
                None => self.inbox.recv(),
            };
            let Some(result) = received else {
                break;
            };
            handled += usize::from(self.deliver(result, viewport));
        }
        handled + self.pump(viewport)
    }

    fn deliver(&mut self, result: FetchResult<P::Record>, viewport: &mut impl Viewport) -> bool {
        let token = result.token;
        if !self.coordinator.is_current(token) {
            wtrace!(
                generation = token.generation,
                latest = self.coordinator.latest().generation,
                records = result.records.len(),
                "stale result discarded"
            );
            self.release_all(result.records);
            return false;
        }
        self.coordinator.complete(token);

        if let FetchStatus::Failed(error) = &result.status {
            wdebug!(
                generation = token.generation,
                %error,
                "failed result delivered; window unchanged"
            );
            if let Some(on_failed) = &self.on_failed {
                on_failed(token, &**error);
            }
            return true;
        }

        let from = result.from;
        let count = result.records.len();
        let anchor = ScrollAnchor::capture(&*viewport);
        let applied = self
            .window
            .apply(result.kind, from, result.records, result.end_of_data);
        let top_shift = applied.top_shift();
        self.release_all(applied.into_released());

        viewport.data_changed();
        viewport.scroll_to(anchor.shifted(
            top_shift,
            self.window.top_offset(),
            self.window.materialized_count(),
        ));

        wtrace!(
            generation = token.generation,
            from,
            count,
            top_offset = self.window.top_offset(),
            len = self.window.len(),
            "result applied"
        );
        if let Some(on_provided) = &self.on_provided {
            on_provided(token, from, count);
        }
        true
    }

    fn release_all(&self, records: impl IntoIterator<Item = P::Record>) {
        let provider = self.coordinator.provider();
        for record in records {
            provider.release(record);
        }
    }

    /// Replaces the record at `position` and hands the previous one back (it is not released).
    pub fn set_item(&mut self, position: usize, record: P::Record) -> Option<P::Record> {
        self.window.set(position, record)
    }

    /// Inserts `record` before `position` (`position == len` appends).
    ///
    /// The bottom edge moves, so an in-flight `Next` fetch is abandoned. Hands the record back
    /// when the window is uninitialized or `position` is out of range.
    pub fn insert_item(&mut self, position: usize, record: P::Record) -> Result<(), P::Record> {
        self.window.insert(position, record)?;
        self.abandon_misaligned_fetch();
        Ok(())
    }

    /// Removes and releases the record at `position`. Returns `false` when out of range.
    pub fn remove_item(&mut self, position: usize) -> bool {
        let Some(record) = self.window.remove(position) else {
            return false;
        };
        self.abandon_misaligned_fetch();
        self.provider().release(record);
        true
    }

    /// Cancels the in-flight fetch if an edit moved the edge its result attaches to.
    ///
    /// Edits keep `top_offset`, so `Prev` results still end at the top edge and `Init`/`Reload`
    /// results replace the window anyway. Only `Next` targets the old bottom edge.
    fn abandon_misaligned_fetch(&mut self) {
        let Some(load) = self.coordinator.in_flight() else {
            return;
        };
        if load.kind == LoadKind::Next {
            wtrace!(from = load.from, "edit moved the bottom edge; next fetch abandoned");
            self.coordinator.cancel();
        }
    }

    pub fn swap_items(&mut self, a: usize, b: usize) -> bool {
        self.window.swap(a, b)
    }

    pub fn find_position(&self, predicate: impl FnMut(&P::Record) -> bool) -> Option<usize> {
        self.window.position(predicate)
    }

    pub fn find_stable_id(&self, predicate: impl FnMut(&P::Record) -> bool) -> Option<u64> {
        self.find_position(predicate)
            .map(|position| self.window.stable_id(position))
    }

    /// The load currently in flight, if any.
    pub fn in_flight(&self) -> Option<LoadRequest> {
        self.coordinator.in_flight()
    }
}

impl<P: DataProvider> Drop for WindowAdapter<P> {
    fn drop(&mut self) {
        self.coordinator.cancel();
        // Jobs that finish later get their result handed back and release it themselves.
        self.inbox.close();
        let records = self.window.clear();
        self.release_all(records);
        while let Some(result) = self.inbox.try_recv() {
            self.release_all(result.records);
        }
    }
}

impl<P: DataProvider> core::fmt::Debug for WindowAdapter<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowAdapter")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
