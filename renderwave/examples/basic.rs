// Example: minimal usage, visible slice and scroll-to helper.
use renderwave::{RenderWave, RenderWaveOptions};

fn main() {
    let mut rw = RenderWave::new(RenderWaveOptions::new(1_000_000, 24));
    rw.attach(480);
    let frame = rw.apply_scroll_event(123_456, 0);

    let mut items = Vec::new();
    rw.collect_items(&mut items);
    println!("total_height={}", rw.total_height());
    println!("frame={frame:?}");
    println!("first_rendered={:?}", items.first());

    let off = rw.scroll_to_index(999_999);
    println!("after scroll_to_index: offset={off:?}");
}
