use renderwave::RenderWaveOptions;
use renderwave_adapter::{Controller, Easing, ScrollHandle};

fn main() {
    // Example: controller driving reveal and tween scrolling without holding any UI objects.
    //
    // An adapter would:
    // - request a scroll (e.g. in response to a "scroll to index" command)
    // - call tick(now_ms) in a frame loop
    // - apply the returned offset to the real scroll container (if any)
    // - render the rendered range, with placeholders for unrevealed items
    let mut c = Controller::new(RenderWaveOptions::new(10_000, 32).with_batch_size(50))
        .with_easing(Easing::SmoothStep);
    c.on_viewport_size(640);
    c.mount(0);

    // Deferred until index 120 has been revealed.
    let started = c.request_scroll_to_index(120, 0);
    println!("started immediately: {started:?}");

    let mut now_ms = 0u64;
    while now_ms < 2_000 {
        now_ms += 16;
        let outcome = c.tick(now_ms);
        if let Some(off) = outcome.scroll_offset {
            if now_ms % 80 == 0 {
                println!(
                    "t={now_ms} off={off} range={:?}",
                    c.engine().visible_range()
                );
            }
        }
        if outcome.revealed {
            println!("t={now_ms} revealed={}", c.engine().revealed_count());
        }
        if c.pending_scroll_index().is_none() && !c.is_animating() {
            break;
        }
    }

    println!(
        "done: off={:?} visible={:?}",
        c.engine().viewport().map(|v| v.scroll_offset),
        c.visible_indexes().len()
    );
}
