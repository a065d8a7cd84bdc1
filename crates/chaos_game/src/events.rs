//! Event types and sinks for observing generation sessions.
//!
//! A running session reports every plotted point and its terminal status as a
//! [`SessionEvent`] through a [`RenderSink`]. The sink runs on the worker thread,
//! so implementations that feed a UI should forward events rather than touch
//! UI-owned state; [`ChannelSink`] does that over a `crossbeam_channel` queue that
//! the UI drains in order.
use crossbeam_channel::{Receiver, Sender};
use tracing::warn;

use crate::session::SessionStatus;
use crate::shape::Vertex;

/// Describes events emitted by a generation session.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// A point was generated.
    Point {
        /// Position in screen coordinates.
        point: Vertex,
        /// 1-based iteration index; the start point is iteration 1.
        iteration: u64,
    },

    /// Emitted exactly once when the session ends.
    Finished {
        /// Why the session ended.
        status: SessionStatus,
    },
}

impl SessionEvent {
    /// The point carried by a [`SessionEvent::Point`].
    pub fn point(&self) -> Option<Vertex> {
        match self {
            SessionEvent::Point { point, .. } => Some(*point),
            _ => None,
        }
    }

    /// The status carried by a [`SessionEvent::Finished`].
    pub fn status(&self) -> Option<SessionStatus> {
        match self {
            SessionEvent::Finished { status } => Some(*status),
            _ => None,
        }
    }
}

/// Receiver of session output. Called from the worker thread in generation order.
pub trait RenderSink {
    fn send(&mut self, event: SessionEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SessionEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op sink.
impl RenderSink for () {
    #[inline]
    fn send(&mut self, _event: SessionEvent) {}
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        (**self).send(event);
    }
}

/// A sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SessionEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SessionEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> RenderSink for FnSink<F>
where
    F: FnMut(SessionEvent),
{
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        (self.f)(event);
    }
}

/// A sink that collects all events in a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<SessionEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<SessionEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Points received so far, in emission order.
    pub fn points(&self) -> Vec<Vertex> {
        self.events.iter().filter_map(SessionEvent::point).collect()
    }

    /// The terminal status, if the session has finished.
    pub fn status(&self) -> Option<SessionStatus> {
        self.events.iter().find_map(SessionEvent::status)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl RenderSink for VecSink {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: RenderSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: RenderSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: RenderSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RenderSink> RenderSink for MultiSink<S> {
    fn send(&mut self, event: SessionEvent) {
        for sink in &mut self.sinks {
            sink.send(event);
        }
    }
}

/// Sink that forwards events over a channel to the thread owning the renderer.
///
/// The channel is always unbounded: `send` never blocks the worker, so a
/// cancelled session stops even when the receiver is not being drained.
pub struct ChannelSink {
    tx: Sender<SessionEvent>,
    disconnected: bool,
}

impl ChannelSink {
    /// Creates an unbounded channel and returns the sink with its receiving end.
    pub fn unbounded() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = Self {
            tx,
            disconnected: false,
        };
        (sink, rx)
    }
}

impl RenderSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        if self.tx.send(event).is_err() && !self.disconnected {
            warn!("Render channel closed; dropping further session events");
            self.disconnected = true;
        }
    }
}

/// Drains every event currently queued on `rx` without blocking, in arrival order.
///
/// Intended for a UI tick: call once per frame and apply the returned events.
pub fn drain(rx: &Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, iteration: u64) -> SessionEvent {
        SessionEvent::Point {
            point: Vertex::new(x, x),
            iteration,
        }
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(point(3.0, 1).point(), Some(Vertex::new(3.0, 3.0)));
        assert_eq!(point(3.0, 1).status(), None);
        let done = SessionEvent::Finished {
            status: SessionStatus::Completed,
        };
        assert_eq!(done.status(), Some(SessionStatus::Completed));
        assert_eq!(done.point(), None);
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(3);
        assert!(sink.is_empty());
        sink.send_many([
            point(1.0, 1),
            point(2.0, 2),
            SessionEvent::Finished {
                status: SessionStatus::Cancelled,
            },
        ]);
        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.points(),
            vec![Vertex::new(1.0, 1.0), Vertex::new(2.0, 2.0)]
        );
        assert_eq!(sink.status(), Some(SessionStatus::Cancelled));
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(point(1.0, 1));
        assert_eq!(multi.len(), 2);
        for sink in multi.into_inner() {
            assert_eq!(sink.as_slice(), &[point(1.0, 1)]);
        }
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(point(0.0, 1));
        sink.send(point(0.0, 2));
        assert_eq!(count, 2);
    }

    #[test]
    fn channel_sink_preserves_order() {
        let (mut sink, rx) = ChannelSink::unbounded();
        for i in 1..=5 {
            sink.send(point(i as f64, i));
        }
        let received = drain(&rx);
        let iterations: Vec<u64> = received
            .iter()
            .map(|e| match e {
                SessionEvent::Point { iteration, .. } => *iteration,
                _ => 0,
            })
            .collect();
        assert_eq!(iterations, vec![1, 2, 3, 4, 5]);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn channel_sink_tolerates_dropped_receiver() {
        let (mut sink, rx) = ChannelSink::unbounded();
        drop(rx);
        sink.send(point(1.0, 1));
        sink.send(point(2.0, 2));
        assert!(sink.disconnected);
    }

    #[test]
    fn boxed_sinks_forward() {
        let mut boxed: Box<dyn RenderSink> = Box::new(VecSink::new());
        boxed.send(point(1.0, 1));
        let mut unit: Box<()> = Box::new(());
        unit.send(point(1.0, 1));
    }
}
