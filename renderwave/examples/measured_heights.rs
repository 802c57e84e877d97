// Example: measured heights, offset lookups, and batch snapping.
use renderwave::{AcceleratedPath, NavKey, RenderWave, RenderWaveOptions};

fn main() {
    let accelerator = AcceleratedPath::native();
    println!("accelerator loaded={}", accelerator.load());

    let mut rw = RenderWave::new(
        RenderWaveOptions::new(10_000, 30)
            .with_batch_size(10)
            .with_snap_to_batch(true)
            .with_accelerator(accelerator),
    );
    rw.attach(600);

    // Layout reports real heights for the first screen; the rest keep the default.
    let applied = rw.measure_many((0..20).map(|i| (i, 30 + (i as u32 % 4) * 10)));
    println!("applied delta={applied} total_height={}", rw.total_height());
    println!("offset_of(20)={} index_near(500)={}", rw.offset_of(20), rw.index_near(500));

    rw.apply_scroll_event(1_234, 0);
    if let Some(target) = rw.poll_snap(rw.options().snap_delay_ms) {
        println!("snap 1234 -> {target}");
        rw.scroll_to_offset(target);
    }

    let end = rw.target_for_key(NavKey::End, 0);
    println!("End -> {end}, max_scroll={}", rw.max_scroll());
    println!("accelerator status={:?}", rw.accelerator().status());
}
