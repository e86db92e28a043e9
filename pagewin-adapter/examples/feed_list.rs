// Example: a list over a slow feed store, scrolled by a headless "renderer".
use std::thread;
use std::time::Duration;

use pagewin_adapter::{
    AdapterOptions, BoxError, DataProvider, Entry, FetchRequest, Fetched, HeadlessViewport,
    RequestToken, ScrollAnchor, VecProvider, Viewport, WindowAdapter, WindowOptions,
};

/// Pretends every chunk is a database query taking a few milliseconds.
struct SlowFeed {
    rows: VecProvider<String>,
}

impl DataProvider for SlowFeed {
    type Record = String;

    fn fetch(&self, request: &FetchRequest) -> Result<Fetched<String>, BoxError> {
        for _ in 0..5 {
            if request.is_cancelled() {
                return Ok(Fetched::default());
            }
            thread::sleep(Duration::from_millis(2));
        }
        self.rows.fetch(request)
    }

    fn total_count(&self) -> Result<usize, BoxError> {
        self.rows.total_count()
    }
}

fn render(adapter: &mut WindowAdapter<SlowFeed>, view: &HeadlessViewport, rows: usize) {
    let first = view.first_visible();
    let last = (first + rows).min(adapter.materialized_count());
    for position in first..last {
        match adapter.record_at(position) {
            Some(Entry::Record(title)) if position == first => {
                println!("  top row #{}: {title}", adapter.stable_id_at(position));
            }
            Some(Entry::Placeholder) => println!("  loading..."),
            _ => {}
        }
        let _ = adapter.on_render_edge(position, view);
    }
}

fn main() {
    let titles = (0..500).map(|i| format!("feed item {i}")).collect();
    let feed = SlowFeed {
        rows: VecProvider::new(titles),
    };
    let options = AdapterOptions::new(WindowOptions::new(30, 120)).with_on_provided(Some(
        |token: RequestToken, from, count| {
            println!("provided #{} from={from} count={count}", token.generation);
        },
    ));
    let mut adapter = WindowAdapter::new(feed, options);
    let mut view = HeadlessViewport::new();

    // Scroll down a screen at a time.
    for _ in 0..12 {
        adapter.pump_timeout(&mut view, Duration::from_millis(200));
        render(&mut adapter, &view, 10);
        let next = (view.first_visible() + 10).min(adapter.materialized_count().saturating_sub(1));
        view.scroll_to(ScrollAnchor::new(next, 0));
    }
    adapter.pump_timeout(&mut view, Duration::from_millis(200));
    println!("after scrolling: {:?}", adapter.state());

    match adapter.jump_to_end() {
        Ok(top) => println!("jumped to {top}"),
        Err(error) => println!("jump failed: {error}"),
    }
    view.scroll_to(ScrollAnchor::new(0, 0));
    adapter.trigger_reload(&view);
    adapter.pump_timeout(&mut view, Duration::from_millis(200));
    render(&mut adapter, &view, 3);
    println!("at the end: {:?}", adapter.state());
}
