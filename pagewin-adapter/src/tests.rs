use crate::*;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Default)]
struct Stats {
    fetched: AtomicUsize,
    released: Mutex<Vec<usize>>,
    fail: AtomicBool,
    panic: AtomicBool,
}

impl Stats {
    fn fetched(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    fn released(&self) -> Vec<usize> {
        self.released.lock().unwrap().clone()
    }

    fn released_count(&self) -> usize {
        self.released.lock().unwrap().len()
    }
}

/// Rows are their own logical index.
struct Rows {
    rows: VecProvider<usize>,
    stats: Arc<Stats>,
}

impl Rows {
    fn new(count: usize) -> Self {
        Self {
            rows: VecProvider::new((0..count).collect()),
            stats: Arc::new(Stats::default()),
        }
    }
}

impl DataProvider for Rows {
    type Record = usize;

    fn fetch(&self, request: &FetchRequest) -> Result<Fetched<usize>, BoxError> {
        if self.stats.panic.load(Ordering::SeqCst) {
            panic!("boom");
        }
        if self.stats.fail.load(Ordering::SeqCst) {
            return Err("backend offline".into());
        }
        let fetched = self.rows.fetch(request)?;
        self.stats
            .fetched
            .fetch_add(fetched.records.len(), Ordering::SeqCst);
        Ok(fetched)
    }

    fn total_count(&self) -> Result<usize, BoxError> {
        self.rows.total_count()
    }

    fn release(&self, record: usize) {
        self.stats.released.lock().unwrap().push(record);
    }
}

fn range(from: usize, len: usize) -> Vec<usize> {
    (from..from + len).collect()
}

fn opts() -> WindowOptions {
    WindowOptions::new(20, 100)
}

fn queued_with(
    count: usize,
    options: AdapterOptions,
) -> (WindowAdapter<Rows>, QueueExecutor, Arc<Stats>) {
    let rows = Rows::new(count);
    let stats = Arc::clone(&rows.stats);
    let queue = QueueExecutor::new();
    let adapter = WindowAdapter::with_executor(rows, options, queue.clone()).unwrap();
    (adapter, queue, stats)
}

fn queued(
    count: usize,
    options: WindowOptions,
) -> (WindowAdapter<Rows>, QueueExecutor, Arc<Stats>) {
    queued_with(count, AdapterOptions::new(options))
}

fn settle(
    adapter: &mut WindowAdapter<Rows>,
    queue: &QueueExecutor,
    view: &mut HeadlessViewport,
) -> usize {
    queue.run_all();
    adapter.pump(view)
}

#[test]
fn placeholder_until_init_is_delivered() {
    let (mut a, q, stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    assert!(!a.is_initialized());
    assert_eq!(a.materialized_count(), 1);
    assert_eq!(a.record_at(0), Some(Entry::Placeholder));
    assert_eq!(a.record_at(1), None);

    let token = a.on_render_edge(0, &view).unwrap();
    assert_eq!(token.generation, 1);
    assert_eq!(a.in_flight(), Some(LoadRequest::new(LoadKind::Init, 0, 20)));
    // Rendering the placeholder again must not restart the same fetch.
    assert_eq!(a.on_render_edge(0, &view), None);
    assert_eq!(q.pending(), 1);

    // Nothing is applied before the interaction thread pumps.
    q.run_all();
    assert!(!a.is_initialized());

    assert_eq!(a.pump(&mut view), 1);
    assert!(a.is_initialized());
    assert!(!a.is_fetching());
    assert_eq!(a.materialized_count(), 20);
    assert_eq!(a.record_at(0), Some(Entry::Record(&0)));
    assert_eq!(a.record_at(20), None);
    assert_eq!(a.stable_id_at(5), 5);
    assert_eq!(view.changes, 1);
    assert_eq!(stats.released_count(), 0);
}

#[test]
fn only_the_latest_request_is_applied() {
    let (mut a, q, stats) = queued(1000, opts());

    let g1 = a.on_render_edge(0, &HeadlessViewport::new()).unwrap();
    let g2 = a.trigger_reload(&HeadlessViewport::at(10));
    let g3 = a.trigger_reload(&HeadlessViewport::at(18));
    assert_eq!([g1.generation, g2.generation, g3.generation], [1, 2, 3]);
    assert_eq!(a.generation(), g3);

    // Deliver 3, then 1; 2 never completes.
    assert!(q.run_newest());
    assert!(q.run_oldest());
    q.clear();

    let mut view = HeadlessViewport::new();
    assert_eq!(a.pump(&mut view), 1);
    assert_eq!(a.top_offset(), 12);
    assert_eq!(a.window().records(), range(12, 20).as_slice());
    // The stale Init records were released, not applied.
    assert_eq!(stats.released(), range(0, 20));
    assert!(!a.is_fetching());
}

#[test]
fn a_result_is_applied_at_most_once() {
    let (poster, inbox) = delivery::channel::<usize>(None);
    let queue = QueueExecutor::new();
    let mut c = FetchCoordinator::new(
        Arc::new(Rows::new(100)),
        Box::new(queue.clone()),
        poster,
        None,
    );

    let token = c.request(LoadRequest::new(LoadKind::Init, 0, 20));
    assert!(c.is_fetching());
    queue.run_all();

    let first = inbox.try_recv().unwrap();
    let duplicate = first.clone();
    assert_eq!(first.token, token);
    assert!(c.is_current(first.token));
    c.complete(first.token);

    assert!(!c.is_current(duplicate.token));
    assert!(!c.is_fetching());
}

#[test]
fn reload_releases_every_resident_once() {
    let (mut a, q, stats) = queued(50, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    assert_eq!(
        a.on_render_edge(19, &view).map(|_| a.in_flight()),
        Some(Some(LoadRequest::new(LoadKind::Next, 20, 20)))
    );
    settle(&mut a, &q, &mut view);
    a.on_render_edge(39, &view).unwrap();
    settle(&mut a, &q, &mut view);

    assert_eq!(a.window().len(), 50);
    assert_eq!(a.total_count(), Some(50));
    assert_eq!(a.on_render_edge(49, &view), None);
    assert_eq!(stats.released_count(), 0);

    view.scroll_to(ScrollAnchor::new(16, 0));
    a.trigger_reload(&view);
    assert_eq!(a.total_count(), None);
    assert_eq!(a.in_flight(), Some(LoadRequest::new(LoadKind::Reload, 10, 20)));
    assert_eq!(settle(&mut a, &q, &mut view), 1);

    assert_eq!(stats.released(), range(0, 50));
    assert_eq!(a.top_offset(), 10);
    assert_eq!(a.window().records(), range(10, 20).as_slice());
    // Record 16 is still the first visible one.
    assert_eq!(view.anchor, ScrollAnchor::new(6, 0));
    assert_eq!(a.total_count(), None);
}

#[test]
fn failed_fetch_leaves_window_unchanged_and_allows_retry() {
    let failures = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&failures);
    let options = AdapterOptions::new(opts()).with_on_failed(Some(
        move |token: RequestToken, error: &Error| {
            seen.lock().unwrap().push((token.generation, error.to_string()));
        },
    ));
    let (mut a, q, stats) = queued_with(1000, options);
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    let before = a.state();

    stats.fail.store(true, Ordering::SeqCst);
    a.on_render_edge(19, &view).unwrap();
    assert_eq!(settle(&mut a, &q, &mut view), 1);

    assert!(!a.is_fetching());
    assert_eq!(a.state().window, before.window);
    assert_eq!(view.changes, 1);
    {
        let failures = failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 2);
        assert!(failures[0].1.contains("backend offline"));
    }

    stats.fail.store(false, Ordering::SeqCst);
    let retry = a.on_render_edge(19, &view).unwrap();
    assert_eq!(retry.generation, 3);
    settle(&mut a, &q, &mut view);
    assert_eq!(a.window().len(), 40);
}

#[test]
fn provider_panic_is_delivered_as_failure() {
    let panicked = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&panicked);
    let options = AdapterOptions::new(opts()).with_on_failed(Some(
        move |_: RequestToken, error: &Error| {
            seen.store(
                matches!(error, Error::WorkerPanicked { message } if message == "boom"),
                Ordering::SeqCst,
            );
        },
    ));
    let (mut a, q, stats) = queued_with(100, options);
    let mut view = HeadlessViewport::new();

    stats.panic.store(true, Ordering::SeqCst);
    a.on_render_edge(0, &view).unwrap();
    assert_eq!(settle(&mut a, &q, &mut view), 1);

    assert!(panicked.load(Ordering::SeqCst));
    assert!(!a.is_initialized());
    assert_eq!(a.materialized_count(), 1);
    assert!(!a.is_fetching());
}

#[test]
fn chunk_must_fit_window_for_fallible_construction() {
    let result = WindowAdapter::try_new(
        Rows::new(10),
        AdapterOptions::new(WindowOptions::new(100, 100)),
    );
    assert!(matches!(
        result,
        Err(Error::Capacity {
            chunk_size: 100,
            max_window_size: 100,
            ..
        })
    ));
}

#[test]
#[should_panic(expected = "invalid window options")]
fn chunk_must_fit_window_for_panicking_construction() {
    let _ = WindowAdapter::new(Rows::new(10), AdapterOptions::new(WindowOptions::new(0, 100)));
}

#[test]
fn jump_to_end_then_reload_shows_the_last_chunk() {
    let (mut a, q, stats) = queued(1000, WindowOptions::new(30, 120));
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);

    assert_eq!(a.jump_to_end().unwrap(), 980);
    assert_eq!(a.total_count(), Some(1000));

    a.trigger_reload(&view);
    assert_eq!(a.in_flight(), Some(LoadRequest::new(LoadKind::Reload, 970, 30)));
    settle(&mut a, &q, &mut view);
    assert_eq!(a.top_offset(), 970);
    assert_eq!(a.record_at(29), Some(Entry::Record(&999)));
    assert_eq!(a.total_count(), Some(1000));
    assert_eq!(a.on_render_edge(29, &view), None);

    a.jump_to_start();
    assert_eq!(a.top_offset(), 0);
    view.scroll_to(ScrollAnchor::new(0, 0));
    a.trigger_reload(&view);
    settle(&mut a, &q, &mut view);
    assert_eq!(a.top_offset(), 0);
    assert_eq!(a.window().records(), range(0, 30).as_slice());
    assert_eq!(stats.released_count(), 60);
}

#[test]
fn jump_to_end_on_short_data_clamps_to_zero() {
    let (mut a, _q, _stats) = queued(10, WindowOptions::new(30, 120));
    assert_eq!(a.jump_to_end().unwrap(), 0);
    assert_eq!(a.total_count(), Some(10));
}

#[test]
fn jump_cancels_in_flight_fetch() {
    let (mut a, q, stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    a.on_render_edge(19, &view).unwrap();
    a.jump_to_start();
    assert!(!a.is_fetching());

    assert_eq!(settle(&mut a, &q, &mut view), 0);
    assert_eq!(a.window().len(), 20);
    assert_eq!(stats.released(), range(20, 20));
}

#[test]
fn prepend_keeps_the_first_visible_record_in_place() {
    let (mut a, q, _stats) = queued(100, opts());
    let mut view = HeadlessViewport::new();

    assert_eq!(a.jump_to_end().unwrap(), 86);
    a.trigger_reload(&view);
    settle(&mut a, &q, &mut view);
    assert_eq!(a.top_offset(), 80);
    assert_eq!(a.total_count(), Some(100));
    // The look-behind rows sit above the row the jump targeted.
    assert_eq!(view.anchor, ScrollAnchor::new(6, 0));

    view.scroll_to(ScrollAnchor::new(0, -5));
    assert_eq!(
        a.on_render_edge(0, &view).map(|_| a.in_flight()),
        Some(Some(LoadRequest::new(LoadKind::Prev, 60, 20)))
    );
    settle(&mut a, &q, &mut view);
    assert_eq!(a.top_offset(), 60);
    assert_eq!(a.window().len(), 40);
    assert_eq!(view.anchor, ScrollAnchor::new(20, -5));
    assert_eq!(a.record_at(20), Some(Entry::Record(&80)));
}

#[test]
fn anchor_shift_clamps_at_the_top_of_the_data() {
    let anchor = ScrollAnchor::new(2, -7);
    assert_eq!(anchor.shifted(-3, 10, 50), ScrollAnchor::new(5, -7));
    assert_eq!(anchor.shifted(4, 3, 50), ScrollAnchor::new(0, -7));
    assert_eq!(anchor.shifted(4, 0, 50), ScrollAnchor::new(0, 0));
    assert_eq!(anchor.shifted(-100, 0, 50), ScrollAnchor::new(49, -7));
}

#[test]
fn edge_render_does_not_reissue_in_flight_next() {
    let (mut a, q, _stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);

    assert!(a.on_render_edge(19, &view).is_some());
    assert_eq!(a.on_render_edge(19, &view), None);
    assert_eq!(a.on_render_edge(10, &view), None);
    assert_eq!(q.pending(), 1);
}

#[test]
fn hooks_observe_requests_and_deliveries() {
    let requests = Arc::new(Mutex::new(Vec::<FetchRequest>::new()));
    let provided = Arc::new(Mutex::new(Vec::new()));
    let wakes = Arc::new(AtomicUsize::new(0));
    let (r, p, w) = (Arc::clone(&requests), Arc::clone(&provided), Arc::clone(&wakes));
    let options = AdapterOptions::new(opts())
        .with_on_request(Some(move |request: &FetchRequest| {
            r.lock().unwrap().push(request.clone());
        }))
        .with_on_provided(Some(move |token: RequestToken, from, count| {
            p.lock().unwrap().push((token.generation, from, count));
        }))
        .with_waker(Some(move || {
            w.fetch_add(1, Ordering::SeqCst);
        }));
    let (mut a, q, _stats) = queued_with(1000, options);
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    // The request hook runs before the fetch is even dispatched.
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert_eq!(q.pending(), 1);

    a.trigger_reload(&HeadlessViewport::at(9));
    {
        let requests = requests.lock().unwrap();
        assert!(requests[0].is_cancelled());
        assert!(!requests[1].is_cancelled());
        assert_eq!(requests[1].load(), LoadRequest::new(LoadKind::Reload, 3, 20));
    }

    settle(&mut a, &q, &mut view);
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
    assert_eq!(*provided.lock().unwrap(), vec![(2, 3, 20)]);
}

#[test]
fn insert_abandons_in_flight_next_fetch() {
    let (mut a, q, stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    a.on_render_edge(19, &view).unwrap();

    a.insert_item(5, 999).unwrap();
    assert!(!a.is_fetching());
    assert_eq!(settle(&mut a, &q, &mut view), 0);
    assert_eq!(a.window().len(), 21);
    assert_eq!(a.record_at(5), Some(Entry::Record(&999)));
    assert_eq!(stats.released(), range(20, 20));
}

#[test]
fn remove_keeps_a_pending_reload_in_flight() {
    let (mut a, q, stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    view.scroll_to(ScrollAnchor::new(15, 0));
    let reload = a.trigger_reload(&view);
    assert_eq!(a.in_flight(), Some(LoadRequest::new(LoadKind::Reload, 9, 20)));

    assert!(a.remove_item(3));
    assert!(a.is_fetching());
    assert_eq!(a.generation(), reload);

    assert_eq!(settle(&mut a, &q, &mut view), 1);
    assert_eq!(a.top_offset(), 9);
    assert_eq!(a.window().records(), range(9, 20).as_slice());
    // The removed record plus the 19 residents the reload replaced.
    assert_eq!(stats.released_count(), 20);
}

#[test]
fn insert_keeps_a_pending_prev_in_flight() {
    let (mut a, q, _stats) = queued(100, opts());
    let mut view = HeadlessViewport::new();

    a.jump_to_end().unwrap();
    a.trigger_reload(&view);
    settle(&mut a, &q, &mut view);
    assert_eq!(a.top_offset(), 80);

    view.scroll_to(ScrollAnchor::new(0, 0));
    a.on_render_edge(0, &view).unwrap();
    assert_eq!(a.in_flight(), Some(LoadRequest::new(LoadKind::Prev, 60, 20)));

    a.insert_item(5, 999).unwrap();
    assert!(a.is_fetching());

    assert_eq!(settle(&mut a, &q, &mut view), 1);
    assert_eq!(a.top_offset(), 60);
    assert_eq!(a.window().len(), 41);
    assert_eq!(a.record_at(19), Some(Entry::Record(&79)));
    assert_eq!(a.record_at(20), Some(Entry::Record(&80)));
    assert_eq!(a.record_at(25), Some(Entry::Record(&999)));
}

#[test]
fn item_edits_track_total_and_release_removed_records() {
    let (mut a, q, stats) = queued(20, opts());
    let mut view = HeadlessViewport::new();

    // Nothing to edit while the placeholder is shown.
    assert_eq!(a.set_item(0, 7), None);
    assert_eq!(a.insert_item(0, 7), Err(7));
    assert!(!a.remove_item(0));
    assert!(!a.swap_items(0, 0));

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    assert_eq!(a.total_count(), Some(20));

    assert_eq!(a.set_item(3, 300), Some(3));
    assert_eq!(stats.released_count(), 0);

    a.insert_item(0, 1000).unwrap();
    assert_eq!(a.total_count(), Some(21));
    assert_eq!(a.record_at(4), Some(Entry::Record(&300)));

    assert!(a.remove_item(0));
    assert_eq!(stats.released(), vec![1000]);
    assert_eq!(a.total_count(), Some(20));
    assert!(!a.remove_item(99));

    assert!(a.swap_items(0, 1));
    assert_eq!(a.record_at(0), Some(Entry::Record(&1)));
    assert!(!a.swap_items(0, 20));

    assert_eq!(a.find_position(|r| *r == 300), Some(3));
    assert_eq!(a.find_stable_id(|r| *r == 300), Some(3));
    assert_eq!(a.find_position(|r| *r == 12345), None);
}

#[test]
fn drop_releases_window_and_undelivered_results() {
    let (mut a, q, stats) = queued(1000, opts());
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    settle(&mut a, &q, &mut view);
    a.on_render_edge(19, &view).unwrap();
    // Posted but never pumped.
    q.run_all();
    drop(a);

    assert_eq!(stats.fetched(), 40);
    assert_eq!(stats.released_count(), 40);
}

#[test]
fn jobs_finishing_after_drop_release_their_records() {
    let (mut a, q, stats) = queued(1000, opts());
    a.on_render_edge(0, &HeadlessViewport::new()).unwrap();
    drop(a);

    assert_eq!(q.run_all(), 1);
    assert_eq!(stats.fetched(), 20);
    assert_eq!(stats.released(), range(0, 20));
}

#[test]
fn dropping_an_uninitialized_adapter_releases_nothing() {
    let (a, _q, stats) = queued(1000, opts());
    drop(a);
    assert_eq!(stats.released_count(), 0);
}

#[test]
fn thread_executor_delivers_through_pump_timeout() {
    let provider = VecProvider::new((0..500).collect::<Vec<usize>>());
    let mut a = WindowAdapter::new(provider, AdapterOptions::new(opts()));
    let mut view = HeadlessViewport::new();

    a.on_render_edge(0, &view).unwrap();
    assert_eq!(a.pump_timeout(&mut view, Duration::from_secs(5)), 1);
    assert!(a.is_initialized());
    assert_eq!(a.window().records(), range(0, 20).as_slice());

    // Supersede a Next with a reload; only the reload may land.
    a.on_render_edge(19, &view).unwrap();
    let latest = a.trigger_reload(&view);
    for _ in 0..10 {
        if !a.is_fetching() {
            break;
        }
        a.pump_timeout(&mut view, Duration::from_secs(5));
    }
    assert!(!a.is_fetching());
    assert_eq!(a.generation(), latest);
    assert_eq!(a.top_offset(), 0);
    assert_eq!(a.window().records(), range(0, 20).as_slice());
}

#[test]
fn pump_timeout_without_deadline_waits_for_delivery() {
    let provider = VecProvider::new((0..50).collect::<Vec<usize>>());
    let mut a = WindowAdapter::new(provider, AdapterOptions::new(opts()));
    let mut view = HeadlessViewport::new();

    // Nothing in flight: returns at once.
    assert_eq!(a.pump_timeout(&mut view, Duration::MAX), 0);

    a.on_render_edge(0, &view).unwrap();
    assert_eq!(a.pump_timeout(&mut view, Duration::MAX), 1);
    assert_eq!(a.window().records(), range(0, 20).as_slice());
}

#[test]
fn closed_inbox_hands_later_posts_back() {
    let (poster, inbox) = delivery::channel::<usize>(None);
    let request = FetchRequest::new(
        RequestToken::new(1),
        LoadRequest::new(LoadKind::Init, 0, 2),
    );

    assert!(poster.post(FetchResult::complete(&request, vec![0, 1], false)).is_ok());
    inbox.close();
    let refused = poster
        .post(FetchResult::complete(&request, vec![2, 3], false))
        .unwrap_err();
    assert_eq!(refused.records, vec![2, 3]);

    // Results posted before closing are still drained.
    assert_eq!(inbox.try_recv().map(|r| r.records), Some(vec![0, 1]));
    assert!(inbox.try_recv().is_none());
}

#[test]
fn vec_provider_reports_end_of_data() {
    let provider = VecProvider::new(range(0, 25));
    let request = |from, size| {
        FetchRequest::new(
            RequestToken::new(1),
            LoadRequest::new(LoadKind::Next, from, size),
        )
    };

    let fetched = provider.fetch(&request(0, 20)).unwrap();
    assert_eq!(fetched, Fetched::new(range(0, 20), false));
    let fetched = provider.fetch(&request(20, 20)).unwrap();
    assert_eq!(fetched, Fetched::new(range(20, 5), true));
    let fetched = provider.fetch(&request(40, 20)).unwrap();
    assert_eq!(fetched, Fetched::new(Vec::new(), true));

    provider.push(25);
    assert_eq!(provider.total_count().unwrap(), 26);
    assert_eq!(provider.remove(0), Some(0));
    assert_eq!(provider.remove(100), None);
    provider.replace(Vec::new());
    assert!(provider.is_empty());
}

#[test]
fn property_random_interaction_releases_every_fetched_record_once() {
    for seed in [1u64, 2, 3, 7, 42, 1337] {
        let (mut a, q, stats) = queued(500, opts());
        let mut view = HeadlessViewport::new();
        let mut rng = Lcg::new(seed);

        for _ in 0..300 {
            let count = a.materialized_count().max(1);
            match rng.gen_range_usize(0, 7) {
                0 => {
                    let _ = a.on_render_edge(count - 1, &view);
                }
                1 => {
                    let _ = a.on_render_edge(0, &view);
                }
                2 => {
                    if rng.gen_bool() {
                        q.run_newest();
                    } else {
                        q.run_oldest();
                    }
                }
                3 | 4 => {
                    a.pump(&mut view);
                }
                5 => {
                    if rng.gen_range_usize(0, 8) == 0 {
                        a.trigger_reload(&view);
                    }
                }
                _ => {
                    let position = rng.gen_range_usize(0, count);
                    view.scroll_to(ScrollAnchor::new(position, 0));
                }
            }

            assert!(a.window().len() <= 100, "seed={seed}");
            for (i, r) in a.window().records().iter().enumerate() {
                assert_eq!(*r, a.top_offset() + i, "seed={seed} position={i}");
            }
        }

        q.run_all();
        a.pump(&mut view);
        drop(a);
        assert_eq!(stats.released_count(), stats.fetched(), "seed={seed}");
    }
}
