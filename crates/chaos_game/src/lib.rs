#![forbid(unsafe_code)]
//! chaos_game: chaos-game (IFS) point generation with weighted shapes.
//!
//! Modules:
//! - shape: vertex stacks and shape sets edited before a run
//! - selection: weighted shape lookup and vertex picking
//! - session: the generation loop, its worker thread and cancellation
//! - events: session output and render sinks
//! - controller: run lifecycle state machine for one canvas
//!
//! For examples and docs, see README and the `chaos_game_examples` crate.
pub mod controller;
pub mod error;
pub mod events;
pub mod rng;
pub mod selection;
pub mod session;
pub mod shape;

/// Convenient re-exports for common types. Import with `use chaos_game::prelude::*;`.
pub mod prelude {
    pub use crate::controller::{Controller, RunState};
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        drain, ChannelSink, FnSink, MultiSink, RenderSink, SessionEvent, VecSink,
    };
    pub use crate::selection::{pick_vertex, pick_vertex_with_rule, VertexRule, WeightedSelector};
    pub use crate::session::{
        midpoint, start, CancellationToken, GenerationSession, RunParams, SessionHandle,
        SessionInputs, SessionStatus,
    };
    pub use crate::shape::{Shape, ShapeSet, Undo, Vertex, MIN_VERTEX_DISTANCE};
}
