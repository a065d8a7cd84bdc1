//! The chaos-game loop.
//!
//! [`GenerationSession`] owns everything a run mutates: the current point, the
//! iteration counter and the previously picked vertex. The RNG, cancellation token and
//! sink are lent to [`GenerationSession::run`], so the loop can be driven on the
//! calling thread (tests, benchmarks) or moved onto a worker by
//! [`crate::session::start`].
use rand::RngCore;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::{RenderSink, SessionEvent};
use crate::selection::{pick_vertex_with_rule, WeightedSelector};
use crate::session::{CancellationToken, RunParams, SessionInputs, SessionStatus};
use crate::shape::{Shape, Vertex};

/// Midpoint between the current point and the chosen vertex.
#[inline]
pub fn midpoint(current: Vertex, vertex: Vertex) -> Vertex {
    Vertex::new((current.x + vertex.x) / 2.0, (current.y + vertex.y) / 2.0)
}

/// State of one run, validated and ready to generate.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    shapes: Vec<Shape>,
    selector: WeightedSelector,
    params: RunParams,
    current: Vertex,
    iteration: u64,
    previous: Option<(usize, usize)>,
}

impl GenerationSession {
    /// Validates `inputs` and prepares the weighted lookup.
    ///
    /// Fails with [`Error::NotReady`] if a shape has fewer than two vertices,
    /// [`Error::InvalidConfig`] for bad run parameters and [`Error::InvalidWeight`]
    /// for a weight that is not strictly positive.
    pub fn new(inputs: SessionInputs) -> Result<Self> {
        let SessionInputs {
            shapes,
            start,
            params,
        } = inputs;

        if shapes.is_empty() {
            return Err(Error::InvalidConfig("no shapes to generate from".into()));
        }
        if let Some((shape, s)) = shapes.iter().enumerate().find(|(_, s)| !s.is_eligible()) {
            return Err(Error::NotReady {
                shape,
                vertices: s.len(),
            });
        }
        params.validate(shapes.len())?;
        let selector = WeightedSelector::new(&shapes)?;

        Ok(Self {
            shapes,
            selector,
            params,
            current: start,
            iteration: 1,
            previous: None,
        })
    }

    pub fn current(&self) -> Vertex {
        self.current
    }

    /// Index of the most recently produced point; the start point is 1.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Advances by one point: picks a shape by weight, a vertex of it uniformly, and
    /// moves halfway towards that vertex.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Vertex {
        let shape_idx = self.selector.sample(rng);
        let shape = &self.shapes[shape_idx];
        let previous = self
            .previous
            .filter(|&(s, _)| s == shape_idx)
            .map(|(_, v)| v);
        let vertex_idx = pick_vertex_with_rule(shape, self.params.vertex_rule, previous, rng);

        self.current = midpoint(self.current, shape.vertices()[vertex_idx]);
        self.iteration += 1;
        self.previous = Some((shape_idx, vertex_idx));
        self.current
    }

    /// Runs to completion or cancellation, then reports the status to `sink`
    /// exactly once.
    pub fn run<S>(
        mut self,
        rng: &mut dyn RngCore,
        token: &CancellationToken,
        sink: &mut S,
    ) -> SessionStatus
    where
        S: RenderSink + ?Sized,
    {
        info!(
            "Drawing {} points from ({}, {}) over {} shape(s)",
            self.params.iterations,
            self.current.x,
            self.current.y,
            self.shapes.len()
        );

        let status = self.generate(rng, token, sink);
        sink.send(SessionEvent::Finished { status });

        match status {
            SessionStatus::Completed => info!("Finished drawing {} points", self.iteration),
            SessionStatus::Cancelled => {
                info!("Cancelled after {} points", self.iteration)
            }
        }
        status
    }

    fn generate<S>(
        &mut self,
        rng: &mut dyn RngCore,
        token: &CancellationToken,
        sink: &mut S,
    ) -> SessionStatus
    where
        S: RenderSink + ?Sized,
    {
        if token.is_cancelled() {
            // Nothing emitted yet; the start point counts as not reached.
            self.iteration = 0;
            return SessionStatus::Cancelled;
        }
        sink.send(SessionEvent::Point {
            point: self.current,
            iteration: self.iteration,
        });

        while self.iteration < self.params.iterations {
            if token.wait(self.params.delay) {
                debug!("Cancellation observed at iteration {}", self.iteration);
                return SessionStatus::Cancelled;
            }
            let point = self.step(rng);
            sink.send(SessionEvent::Point {
                point,
                iteration: self.iteration,
            });
        }
        SessionStatus::Completed
    }
}
