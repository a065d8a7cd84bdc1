use std::time::Duration;

use chaos_game::prelude::*;
use chaos_game_examples::{init_tracing, AsciiCanvas, CanvasConfig};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let extent = DVec2::new(800.0, 600.0);

    // One triangle, the classic Sierpinski attractor.
    let mut shapes = ShapeSet::new();
    for v in [(400.0, 20.0), (20.0, 580.0), (780.0, 580.0)] {
        shapes.current_mut().add_vertex(v);
    }

    let params = RunParams::new(20_000).with_delay(Duration::ZERO);
    let (sink, rx) = ChannelSink::unbounded();
    let handle = start(SessionInputs::new(&shapes, (400.0, 300.0), params), sink)?;

    // Play the UI thread: drain whatever arrived each "frame".
    let mut canvas = AsciiCanvas::new(CanvasConfig::new((80, 30), extent));
    canvas.mark_shapes(&shapes);
    let status = loop {
        let mut finished = None;
        for event in drain(&rx) {
            finished = finished.or(canvas.apply(&event));
        }
        if let Some(status) = finished {
            break status;
        }
        std::thread::sleep(Duration::from_millis(16));
    };
    let joined = handle.join();
    anyhow::ensure!(
        joined == Some(status),
        "worker ended with {joined:?} after reporting {status:?}"
    );

    println!("{}", canvas.render());
    tracing::info!("Session finished: {status:?}");
    Ok(())
}
