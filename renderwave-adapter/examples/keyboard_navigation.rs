// Example: keyboard navigation, end-of-list detection, and container markup.
use renderwave::RenderWaveOptions;
use renderwave_adapter::{Container, ContainerSlot, Controller, ScrollBehavior};

fn main() {
    let options = RenderWaveOptions::new(1_000, 40).with_keyboard_navigation(true);
    let mut c = Controller::new(options)
        .with_scroll_behavior(ScrollBehavior::Instant)
        .with_containers(Container::native("ul"), Container::default());
    c.set_on_end_reached(Some(|rw: &renderwave::RenderWave| {
        println!("end reached at total_height={}", rw.total_height());
    }));
    c.on_viewport_size(400);
    c.mount(0);

    println!("outer={:?}", c.describe_container(ContainerSlot::Outer));
    println!("inner={:?}", c.describe_container(ContainerSlot::Inner));

    for key in ["ArrowDown", "PageDown", "PageDown", "Tab", "End", "Home"] {
        match c.on_key(key, 0) {
            Some(off) => println!("{key} -> {off}"),
            None => println!("{key} ignored"),
        }
    }
}
