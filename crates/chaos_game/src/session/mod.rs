//! Generation sessions: one run of the chaos game from a start point to a terminal status.
//!
//! [`start`] validates the inputs on the calling thread, then moves the
//! [`GenerationSession`] onto a dedicated worker thread. The worker owns the current
//! point, counter and RNG; only [`crate::events::SessionEvent`]s leave it, through the
//! [`crate::events::RenderSink`] handed to [`start`]. The returned [`SessionHandle`]
//! cancels cooperatively: the worker observes the request at its next delay wait,
//! which is interrupted immediately.
use std::thread::{self, JoinHandle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Result;
use crate::events::RenderSink;
use crate::rng::session_rng;
use crate::shape::{Shape, ShapeSet, Vertex};

pub mod cancel;
pub mod params;
pub mod runner;

pub use cancel::CancellationToken;
pub use params::{RunParams, DEFAULT_DELAY, DEFAULT_ITERATIONS};
pub use runner::{midpoint, GenerationSession};

/// Name given to worker threads.
pub const WORKER_THREAD_NAME: &str = "chaos-game-worker";

/// Terminal status of a session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The iteration target was reached.
    Completed,
    /// The session was cancelled before reaching its target.
    Cancelled,
}

/// Everything a session needs, captured when it starts.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct SessionInputs {
    /// Immutable copy of the shapes; later edits to the source set are not observed.
    pub shapes: Vec<Shape>,
    /// The first emitted point.
    pub start: Vertex,
    pub params: RunParams,
}

impl SessionInputs {
    /// Snapshots `shapes` for a run starting at `start`.
    pub fn new(shapes: &ShapeSet, start: impl Into<Vertex>, params: RunParams) -> Self {
        Self::from_shapes(shapes.snapshot(), start, params)
    }

    pub fn from_shapes(shapes: Vec<Shape>, start: impl Into<Vertex>, params: RunParams) -> Self {
        Self {
            shapes,
            start: start.into(),
            params,
        }
    }
}

/// Validates `inputs` and runs the session on a new worker thread.
///
/// Validation errors are returned before any thread is spawned. `sink` receives every
/// point and then exactly one [`crate::events::SessionEvent::Finished`].
pub fn start<S>(inputs: SessionInputs, sink: S) -> Result<SessionHandle>
where
    S: RenderSink + Send + 'static,
{
    let session = GenerationSession::new(inputs)?;
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let seed = session.params().seed;

    let worker = thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || {
            let mut sink = sink;
            let mut rng = session_rng(seed);
            session.run(&mut rng, &worker_token, &mut sink)
        })?;

    Ok(SessionHandle {
        token,
        worker: Some(worker),
    })
}

/// Control handle for a running session.
///
/// Dropping the handle cancels the session without waiting for the worker.
#[must_use = "dropping a SessionHandle cancels the session"]
#[derive(Debug)]
pub struct SessionHandle {
    token: CancellationToken,
    worker: Option<JoinHandle<SessionStatus>>,
}

impl SessionHandle {
    /// Requests cancellation. A no-op once the session has finished.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.token.cancel();
        }
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Blocks until the worker exits and returns its status.
    ///
    /// Returns `None` if the worker panicked (e.g. inside a sink).
    pub fn join(mut self) -> Option<SessionStatus> {
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(status) => Some(status),
            Err(_) => {
                error!("Generation worker panicked");
                None
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.cancel();
        }
    }
}
