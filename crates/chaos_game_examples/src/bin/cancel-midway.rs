use std::time::Instant;

use chaos_game::prelude::*;
use chaos_game_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let shapes = ShapeSet::from_shapes(vec![Shape::from_vertices([
        (0.0, 0.0),
        (100.0, 0.0),
        (50.0, 100.0),
    ])]);

    // A slow run: one point every 200 ms.
    let params = RunParams::new(1_000).with_delay_ms(200);
    let (sink, rx) = ChannelSink::unbounded();
    let handle = start(SessionInputs::new(&shapes, (10.0, 10.0), params), sink)?;

    let mut received = 0;
    while received < 5 {
        let event = rx.recv()?;
        if let SessionEvent::Point { point, iteration } = event {
            println!("#{iteration}: ({:.3}, {:.3})", point.x, point.y);
            received += 1;
        }
    }

    let requested = Instant::now();
    handle.cancel();
    let status = handle.join();
    println!(
        "status {:?} observed {:?} after cancel",
        status,
        requested.elapsed()
    );

    let trailing: Vec<SessionEvent> = rx.try_iter().collect();
    anyhow::ensure!(
        trailing.iter().all(|e| e.point().is_none()),
        "no points may follow cancellation"
    );
    println!("trailing events: {trailing:?}");
    Ok(())
}
