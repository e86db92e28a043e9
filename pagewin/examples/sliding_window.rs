// Example: drive a window by hand and watch it slide.
use pagewin::{LoadKind, Window, WindowOptions};

fn main() {
    let mut w: Window<u32> = Window::new(WindowOptions::new(20, 60));
    println!("fresh: count={} first={:?}", w.materialized_count(), w.get(0));

    let applied = w.apply(LoadKind::Init, 0, (0..20).collect(), false);
    println!("init: placement={:?} state={:?}", applied.placement, w.state());

    // Keep rendering the last row until the window has slid well past its capacity.
    while let Some(load) = w.edge_request(w.len() - 1, 0) {
        if load.from >= 100 {
            break;
        }
        let records = (load.from as u32..load.end() as u32).collect();
        let applied = w.apply(load.kind, load.from, records, false);
        println!(
            "{:?} from={} -> top={} len={} evicted={}",
            load.kind,
            load.from,
            w.top_offset(),
            w.len(),
            applied.evicted.len()
        );
    }

    // Rendering the first row loads the chunk above the window.
    if let Some(load) = w.edge_request(0, 0) {
        let records = (load.from as u32..load.end() as u32).collect();
        let applied = w.apply(load.kind, load.from, records, false);
        println!(
            "{:?} from={} -> top={} len={} evicted from bottom={}",
            load.kind,
            load.from,
            w.top_offset(),
            w.len(),
            applied.evicted.len()
        );
    }
}
