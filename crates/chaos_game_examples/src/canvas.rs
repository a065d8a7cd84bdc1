//! Character-cell canvas standing in for a GUI renderer in the examples.
use std::fmt::Write as _;

use chaos_game::prelude::{SessionEvent, SessionStatus, ShapeSet, Vertex};
use glam::DVec2;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}

/// Maps screen coordinates onto a grid of character cells.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Grid size in cells (columns, rows).
    pub cells: (usize, usize),
    /// Screen-space size covered by the grid, with its origin at (0, 0).
    pub extent: DVec2,
}

impl CanvasConfig {
    pub fn new(cells: (usize, usize), extent: DVec2) -> Self {
        Self { cells, extent }
    }
}

/// Accumulates plotted points and shape vertices; renders them as text.
pub struct AsciiCanvas {
    config: CanvasConfig,
    hits: Vec<u32>,
    markers: Vec<Option<char>>,
    counter: u64,
    status: Option<SessionStatus>,
}

impl AsciiCanvas {
    pub fn new(config: CanvasConfig) -> Self {
        let len = config.cells.0 * config.cells.1;
        Self {
            config,
            hits: vec![0; len],
            markers: vec![None; len],
            counter: 0,
            status: None,
        }
    }

    /// Marks every shape's vertices with a digit naming the shape.
    pub fn mark_shapes(&mut self, shapes: &ShapeSet) {
        for (i, shape) in shapes.iter().enumerate() {
            let marker = char::from_digit((i % 10) as u32 + 1, 10).unwrap_or('#');
            for &v in shape.vertices() {
                if let Some(cell) = self.cell(v) {
                    self.markers[cell] = Some(marker);
                }
            }
        }
    }

    /// Applies one session event, returning the terminal status when it arrives.
    pub fn apply(&mut self, event: &SessionEvent) -> Option<SessionStatus> {
        match *event {
            SessionEvent::Point { point, iteration } => {
                if let Some(cell) = self.cell(point) {
                    self.hits[cell] = self.hits[cell].saturating_add(1);
                }
                self.counter = iteration;
                None
            }
            SessionEvent::Finished { status } => {
                self.status = Some(status);
                Some(status)
            }
            _ => None,
        }
    }

    /// Iteration index of the last applied point.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.status
    }

    pub fn render(&self) -> String {
        let (cols, rows) = self.config.cells;
        let mut out = String::with_capacity((cols + 1) * rows + 32);
        let _ = writeln!(out, "Iterations: {}", self.counter);
        for row in 0..rows {
            for col in 0..cols {
                let idx = row * cols + col;
                let ch = match (self.markers[idx], self.hits[idx]) {
                    (Some(m), _) => m,
                    (None, 0) => ' ',
                    (None, 1..=2) => '.',
                    (None, 3..=8) => ':',
                    (None, _) => '#',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn cell(&self, p: Vertex) -> Option<usize> {
        let (cols, rows) = self.config.cells;
        let u = p.x / self.config.extent.x;
        let v = p.y / self.config.extent.y;
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let col = (u * cols as f64) as usize;
        let row = (v * rows as f64) as usize;
        Some(row.min(rows - 1) * cols + col.min(cols - 1))
    }
}
