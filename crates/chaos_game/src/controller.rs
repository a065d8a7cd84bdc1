//! Run lifecycle for a single canvas.
//!
//! [`Controller`] owns the editable [`ShapeSet`] and at most one live session, and
//! enforces the state machine
//! `Editing -> ReadyToStart -> AwaitingStartPoint -> Running -> Completed | Cancelled`,
//! returning to `Editing` only through [`Controller::reset`]. Shapes can only be edited
//! in `Editing`/`ReadyToStart`.
//!
//! The controller is meant to live on the UI thread. It never blocks on the worker
//! except in [`Controller::reset`] and on drop; call [`Controller::poll`] each UI tick
//! to pick up a finished session.
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::RenderSink;
use crate::session::{self, RunParams, SessionHandle, SessionInputs, SessionStatus};
use crate::shape::{ShapeSet, Vertex};

/// Lifecycle state as seen by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Shapes are editable but not every shape has two vertices yet.
    Editing,
    /// Shapes are editable and generation may start.
    ReadyToStart,
    /// Waiting for the collaborator to supply the start point.
    AwaitingStartPoint,
    /// A session is generating points.
    Running,
    /// The last session reached its iteration target.
    Completed,
    /// The last session was cancelled.
    Cancelled,
}

impl RunState {
    /// States in which shapes, vertices and weights may change.
    pub fn is_editable(self) -> bool {
        matches!(self, RunState::Editing | RunState::ReadyToStart)
    }

    /// Terminal states; only [`Controller::reset`] leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Editing,
    AwaitingStartPoint,
    Running,
    Finished(SessionStatus),
}

/// Owns the shape set and the active session for one canvas.
#[derive(Debug)]
pub struct Controller {
    shapes: ShapeSet,
    phase: Phase,
    session: Option<SessionHandle>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::with_shapes(ShapeSet::new())
    }

    pub fn with_shapes(shapes: ShapeSet) -> Self {
        Self {
            shapes,
            phase: Phase::Editing,
            session: None,
        }
    }

    /// Current lifecycle state. Does not observe worker completion; see [`Controller::poll`].
    pub fn state(&self) -> RunState {
        match self.phase {
            Phase::Editing if self.shapes.is_ready() => RunState::ReadyToStart,
            Phase::Editing => RunState::Editing,
            Phase::AwaitingStartPoint => RunState::AwaitingStartPoint,
            Phase::Running => RunState::Running,
            Phase::Finished(SessionStatus::Completed) => RunState::Completed,
            Phase::Finished(SessionStatus::Cancelled) => RunState::Cancelled,
        }
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Mutable access to the shapes, only while editing.
    pub fn shapes_mut(&mut self) -> Result<&mut ShapeSet> {
        if !self.state().is_editable() {
            return Err(Error::Locked("shapes cannot be edited outside the editing state"));
        }
        Ok(&mut self.shapes)
    }

    /// True when a start action should be offered to the user.
    pub fn can_start(&self) -> bool {
        matches!(
            self.state(),
            RunState::ReadyToStart | RunState::AwaitingStartPoint
        )
    }

    /// `ReadyToStart -> AwaitingStartPoint`.
    pub fn begin_start_point_selection(&mut self) -> Result<()> {
        match self.state() {
            RunState::ReadyToStart => {
                info!("{} shape(s) selected", self.shapes.len());
                self.phase = Phase::AwaitingStartPoint;
                Ok(())
            }
            RunState::AwaitingStartPoint => Ok(()),
            RunState::Editing => Err(self.not_ready()),
            RunState::Running => Err(Error::AlreadyRunning),
            RunState::Completed | RunState::Cancelled => {
                Err(Error::Locked("reset is required before starting again"))
            }
        }
    }

    /// `AwaitingStartPoint -> ReadyToStart`. No-op in other states.
    pub fn abort_start_point_selection(&mut self) {
        if self.phase == Phase::AwaitingStartPoint {
            self.phase = Phase::Editing;
        }
    }

    /// Starts a session from `start` with the current shapes.
    ///
    /// Allowed from `ReadyToStart` and `AwaitingStartPoint`. On error no session is
    /// created; a rejected start from `AwaitingStartPoint` falls back to editing so
    /// the offending shape can be fixed.
    pub fn start<S>(
        &mut self,
        start: impl Into<Vertex>,
        params: RunParams,
        sink: S,
    ) -> Result<&SessionHandle>
    where
        S: RenderSink + Send + 'static,
    {
        match self.state() {
            RunState::Running => return Err(Error::AlreadyRunning),
            RunState::Completed | RunState::Cancelled => {
                return Err(Error::Locked("reset is required before starting again"))
            }
            RunState::Editing => return Err(self.not_ready()),
            RunState::ReadyToStart | RunState::AwaitingStartPoint => {}
        }

        let handle = match session::start(SessionInputs::new(&self.shapes, start, params), sink)
        {
            Ok(handle) => handle,
            Err(err) => {
                debug!("Start rejected: {err}");
                self.phase = Phase::Editing;
                return Err(err);
            }
        };
        self.phase = Phase::Running;
        Ok(&*self.session.insert(handle))
    }

    /// Requests cancellation of the running session. No-op in other states.
    pub fn cancel(&self) {
        if let Some(handle) = &self.session {
            info!("Cancelling generation");
            handle.cancel();
        }
    }

    /// Picks up a finished worker, moving `Running` to `Completed` or `Cancelled`.
    pub fn poll(&mut self) -> RunState {
        if self.phase == Phase::Running
            && self.session.as_ref().is_some_and(SessionHandle::is_finished)
        {
            self.finish_session();
        }
        self.state()
    }

    /// Blocks until the running session ends. Returns the resulting state.
    pub fn wait(&mut self) -> RunState {
        if self.phase == Phase::Running {
            self.finish_session();
        }
        self.state()
    }

    /// Cancels and joins any session and clears the shapes back to a single empty shape.
    pub fn reset(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.cancel();
            handle.join();
        }
        self.shapes.reset();
        self.phase = Phase::Editing;
        debug!("Canvas reset");
    }

    fn finish_session(&mut self) {
        let status = self
            .session
            .take()
            .and_then(SessionHandle::join)
            .unwrap_or(SessionStatus::Cancelled);
        self.phase = Phase::Finished(status);
    }

    fn not_ready(&self) -> Error {
        match self.shapes.first_unready() {
            Some((shape, vertices)) => Error::NotReady { shape, vertices },
            None => Error::Locked("shapes are not ready"),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.cancel();
            handle.join();
        }
    }
}
