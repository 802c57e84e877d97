// Example: driving the reveal schedule from a simulated host loop.
//
// The host polls timers, reports paint opportunities, and renders placeholders for items that
// are in the window but not revealed yet.
use renderwave::{RenderWave, RenderWaveOptions, RevealPhase};

fn main() {
    let options = RenderWaveOptions::new(200, 40)
        .with_batch_size(25)
        .with_reveal_interval_ms(60)
        .with_on_change(Some(|rw: &RenderWave| {
            println!("on_change: revealed={}", rw.revealed_count());
        }));
    let mut rw = RenderWave::new(options);
    rw.attach(400);
    rw.mount(0);

    // A 16ms frame clock.
    let mut now = 0u64;
    while rw.reveal_phase() != RevealPhase::Complete {
        now += 16;
        rw.on_timer(now);
        if rw.wants_frame() && rw.on_frame(now) {
            let placeholders = rw.visible_range().len() - rw.visible_indexes().len();
            println!("t={now}ms revealed={} placeholders={placeholders}", rw.revealed_count());
        }
    }

    rw.unmount();
    println!("done at t={now}ms after {} ticks", rw.reveal().ticks());
}
