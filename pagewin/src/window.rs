use alloc::vec::Vec;
use core::mem;

use crate::plan::{Plan, plan};
use crate::{Entry, LoadKind, LoadRequest, Placement, WindowOptions, WindowState};

/// Records that left the window as a result of [`Window::apply`].
///
/// The caller owns these and is expected to release them (e.g. through its data provider).
#[derive(Debug)]
pub struct Applied<T> {
    pub placement: Placement,
    /// Residents that were evicted or overwritten.
    pub evicted: Vec<T>,
    /// Incoming records that never entered the window (clamped growth or overlap).
    pub discarded: Vec<T>,
    pub previous_top: usize,
    pub top_offset: usize,
}

impl<T> Applied<T> {
    /// Signed change of the top offset. Positive when the window slid forward.
    pub fn top_shift(&self) -> isize {
        self.top_offset as isize - self.previous_top as isize
    }

    /// Every record that should be released, evicted first.
    pub fn into_released(self) -> impl Iterator<Item = T> {
        self.evicted.into_iter().chain(self.discarded)
    }
}

/// A bounded, sliding window over a logically unbounded sequence of records.
///
/// This type only does bookkeeping and arithmetic:
/// - It never fetches anything; callers hand it ranges of records via [`Window::apply`].
/// - It never releases anything; records leaving the window are returned to the caller.
///
/// A fresh window shows a single placeholder entry until the first range is applied.
#[derive(Clone, Debug)]
pub struct Window<T> {
    options: WindowOptions,
    items: Vec<T>,
    top_offset: usize,
    total_count: Option<usize>,
    initialized: bool,
}

impl<T> Window<T> {
    /// Creates an empty window showing the placeholder.
    ///
    /// Panics if `options` is not valid (see [`WindowOptions::is_valid`]).
    #[track_caller]
    pub fn new(options: WindowOptions) -> Self {
        options.assert_valid();
        Self {
            options,
            items: Vec::new(),
            top_offset: 0,
            total_count: None,
            initialized: false,
        }
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Whether at least one range has been applied (the placeholder is gone).
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of renderable positions, counting the placeholder while uninitialized.
    pub fn materialized_count(&self) -> usize {
        if self.initialized { self.items.len() } else { 1 }
    }

    /// Number of materialized records (never counts the placeholder).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn top_offset(&self) -> usize {
        self.top_offset
    }

    /// Moves the logical anchor without touching the records.
    ///
    /// Stable ids are only meaningful again after the next replacing load.
    pub fn set_top_offset(&mut self, top_offset: usize) {
        self.top_offset = top_offset;
    }

    pub fn bottom_offset(&self) -> usize {
        self.top_offset.saturating_add(self.items.len())
    }

    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    pub fn set_total_count(&mut self, total_count: Option<usize>) {
        self.total_count = total_count;
    }

    pub fn records(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<Entry<'_, T>> {
        if !self.initialized {
            return (position == 0).then_some(Entry::Placeholder);
        }
        self.items.get(position).map(Entry::Record)
    }

    /// Identity of a position: its logical index. Stable while the window slides, not across a
    /// replacing load.
    pub fn stable_id(&self, position: usize) -> u64 {
        (self.top_offset as u64).saturating_add(position as u64)
    }

    pub fn state(&self) -> WindowState {
        WindowState {
            top_offset: self.top_offset,
            len: self.items.len(),
            total_count: self.total_count,
            initialized: self.initialized,
        }
    }

    /// The initial/reload request anchored at `first_visible` (a position in the current
    /// window), pulled back by the look-behind margin.
    pub fn anchored_request(&self, kind: LoadKind, first_visible: usize) -> LoadRequest {
        let from = self
            .top_offset
            .saturating_add(first_visible)
            .saturating_sub(self.options.look_behind);
        LoadRequest::new(kind, from, self.options.chunk_size)
    }

    /// Decides whether rendering `position` should load more records.
    ///
    /// - Uninitialized: an `Init` load anchored at `first_visible`.
    /// - First position with records above the window: a `Prev` load of up to one chunk.
    /// - Last position with (possibly) more records below: a `Next` load of one chunk.
    pub fn edge_request(&self, position: usize, first_visible: usize) -> Option<LoadRequest> {
        if !self.initialized {
            return Some(self.anchored_request(LoadKind::Init, first_visible));
        }

        if position == 0 && self.top_offset > 0 {
            let size = self.top_offset.min(self.options.chunk_size);
            return Some(LoadRequest::new(
                LoadKind::Prev,
                self.top_offset - size,
                size,
            ));
        }

        let len = self.items.len();
        if len > 0 && position == len - 1 && self.state().has_more_below() {
            return Some(LoadRequest::new(
                LoadKind::Next,
                self.bottom_offset(),
                self.options.chunk_size,
            ));
        }

        None
    }

    /// Computes the placement of `incoming` records without applying it.
    pub fn plan(&self, kind: LoadKind, from: usize, incoming: usize) -> Option<Plan> {
        plan(
            self.top_offset,
            self.items.len(),
            kind,
            from,
            incoming,
            self.options.max_window_size,
        )
    }

    /// Places `records` (starting at logical index `from`) into the window.
    ///
    /// When `end_of_data` is set, the total count becomes the bottom of the updated window.
    ///
    /// Panics when the range is malformed for this window; see [`crate::plan::plan`].
    #[track_caller]
    pub fn apply(
        &mut self,
        kind: LoadKind,
        from: usize,
        records: Vec<T>,
        end_of_data: bool,
    ) -> Applied<T> {
        let incoming = records.len();
        let Some(plan) = self.plan(kind, from, incoming) else {
            wwarn!(
                ?kind,
                from,
                incoming,
                top_offset = self.top_offset,
                len = self.items.len(),
                "Window::apply: range does not fit the window"
            );
            panic!(
                "malformed {kind:?} range for window (from={from}, len={incoming}, top_offset={}, window_len={})",
                self.top_offset,
                self.items.len()
            );
        };

        let previous_top = self.top_offset;
        let (taken, discarded) = split_taken(records, &plan);
        let evicted = match plan.placement {
            Placement::Replace => mem::replace(&mut self.items, taken),
            Placement::Append => {
                let evicted: Vec<T> = self.items.drain(..plan.evict_top).collect();
                self.items.extend(taken);
                evicted
            }
            Placement::Prepend => {
                let keep = self.items.len() - plan.evict_bottom;
                let evicted = self.items.split_off(keep);
                let mut next = taken;
                next.append(&mut self.items);
                self.items = next;
                evicted
            }
            Placement::Overwrite => {
                let mut evicted = Vec::with_capacity(taken.len());
                for (slot, record) in self.items[plan.overwrite_at..].iter_mut().zip(taken) {
                    evicted.push(mem::replace(slot, record));
                }
                evicted
            }
            Placement::Unchanged => Vec::new(),
        };

        self.top_offset = plan.new_top;
        self.initialized = true;
        debug_assert_eq!(self.items.len(), plan.new_len);

        if end_of_data {
            self.total_count = Some(self.bottom_offset());
        }

        wtrace!(
            ?kind,
            from,
            incoming,
            placement = ?plan.placement,
            top_offset = self.top_offset,
            len = self.items.len(),
            evicted = evicted.len(),
            "Window::apply"
        );

        Applied {
            placement: plan.placement,
            evicted,
            discarded,
            previous_top,
            top_offset: self.top_offset,
        }
    }

    /// Replaces the record at `position`, returning the previous one.
    pub fn set(&mut self, position: usize, record: T) -> Option<T> {
        if !self.initialized {
            return None;
        }
        let slot = self.items.get_mut(position)?;
        Some(mem::replace(slot, record))
    }

    /// Inserts a record before `position` (`position == len` appends). A known total count grows
    /// by one.
    ///
    /// Hands the record back when the window is uninitialized or `position` is out of range.
    pub fn insert(&mut self, position: usize, record: T) -> Result<(), T> {
        if !self.initialized || position > self.items.len() {
            return Err(record);
        }
        self.items.insert(position, record);
        if let Some(total) = self.total_count.as_mut() {
            *total += 1;
        }
        Ok(())
    }

    /// Removes the record at `position`. A known total count shrinks by one.
    pub fn remove(&mut self, position: usize) -> Option<T> {
        if !self.initialized || position >= self.items.len() {
            return None;
        }
        let record = self.items.remove(position);
        if let Some(total) = self.total_count.as_mut() {
            *total = total.saturating_sub(1);
        }
        Some(record)
    }

    /// Swaps two materialized records. Returns `false` if either position is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        let len = self.items.len();
        if !self.initialized || a >= len || b >= len {
            return false;
        }
        self.items.swap(a, b);
        true
    }

    pub fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(|r| predicate(r))
    }

    /// Takes every record out and returns to the placeholder state.
    pub fn clear(&mut self) -> Vec<T> {
        self.initialized = false;
        self.total_count = None;
        mem::take(&mut self.items)
    }
}

fn split_taken<T>(mut records: Vec<T>, plan: &Plan) -> (Vec<T>, Vec<T>) {
    let mut discarded = records.split_off(plan.take.end);
    let taken = records.split_off(plan.take.start);
    if !records.is_empty() {
        records.append(&mut discarded);
        discarded = records;
    }
    (taken, discarded)
}
