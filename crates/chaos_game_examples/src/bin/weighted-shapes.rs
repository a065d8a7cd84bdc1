use std::time::Duration;

use chaos_game::prelude::*;
use chaos_game_examples::{init_tracing, AsciiCanvas, CanvasConfig};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let extent = DVec2::new(1200.0, 600.0);

    let mut controller = Controller::new();
    {
        let shapes = controller.shapes_mut()?;
        for v in [(300.0, 40.0), (40.0, 560.0), (560.0, 560.0)] {
            shapes.current_mut().add_vertex(v);
        }

        // The square attracts three times as many picks as the triangle.
        let square = shapes.add_shape();
        for v in [(700.0, 100.0), (1100.0, 100.0), (1100.0, 500.0), (700.0, 500.0)] {
            square.add_vertex(v);
        }
        square.set_weight(3.0);
    }
    anyhow::ensure!(
        controller.state() == RunState::ReadyToStart,
        "shapes should be ready"
    );

    let selector = WeightedSelector::new(controller.shapes().as_slice())?;
    for i in 0..controller.shapes().len() {
        println!(
            "shape {} selection probability: {:.2}",
            i + 1,
            selector.probability(i).unwrap_or_default()
        );
    }

    controller.begin_start_point_selection()?;
    let (sink, rx) = ChannelSink::unbounded();
    controller.start(
        (600.0, 300.0),
        RunParams::new(40_000).with_delay(Duration::ZERO).with_seed(2025),
        sink,
    )?;

    let mut canvas = AsciiCanvas::new(CanvasConfig::new((100, 30), extent));
    canvas.mark_shapes(controller.shapes());
    let mut left = 0u64;
    while controller.poll() == RunState::Running {
        for event in drain(&rx) {
            if event.point().is_some_and(|p| p.x < 600.0) {
                left += 1;
            }
            canvas.apply(&event);
        }
        std::thread::sleep(Duration::from_millis(16));
    }
    for event in drain(&rx) {
        if event.point().is_some_and(|p| p.x < 600.0) {
            left += 1;
        }
        canvas.apply(&event);
    }

    println!("{}", canvas.render());
    println!(
        "{:?}: {} of {} points landed on the triangle side",
        controller.state(),
        left,
        canvas.counter()
    );

    controller.reset();
    Ok(())
}
