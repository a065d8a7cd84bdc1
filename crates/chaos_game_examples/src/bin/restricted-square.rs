use std::time::Duration;

use chaos_game::prelude::*;
use chaos_game_examples::{init_tracing, AsciiCanvas, CanvasConfig};
use glam::DVec2;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let extent = DVec2::new(600.0, 600.0);

    // With an unrestricted pick a square fills uniformly; forbidding the previous
    // vertex produces a self-similar pattern.
    let square = Shape::from_vertices([(20.0, 20.0), (580.0, 20.0), (580.0, 580.0), (20.0, 580.0)]);
    let shapes = ShapeSet::from_shapes(vec![square]);

    let mut canvas = AsciiCanvas::new(CanvasConfig::new((60, 30), extent));
    canvas.mark_shapes(&shapes);
    let sink = FnSink::new(move |event| {
        if canvas.apply(&event).is_some() {
            println!("{}", canvas.render());
        }
    });

    let params = RunParams::new(30_000)
        .with_delay(Duration::ZERO)
        .with_vertex_rule(VertexRule::DifferentThanPrevious)
        .with_seed(7);
    let handle = start(SessionInputs::new(&shapes, (300.0, 300.0), params), sink)?;
    let status = handle.join();

    println!("Session finished: {status:?}");
    Ok(())
}
