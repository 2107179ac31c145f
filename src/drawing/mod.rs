//! Drag-to-connect interaction for the editor.
//!
//! The gesture is an explicit `Idle`/`Drawing` state with a pure [`transition`] function,
//! so it can be driven and tested without any pointer-event framework. [`ConnectionDrawer`]
//! owns the state and applies the resulting effects to a [`FlowGraph`].

mod state;

pub use state::*;

use crate::block::Position;
use crate::error::GraphError;
use crate::graph::{Connection, ConnectionSource, FlowGraph};
use tracing::debug;

/// How a finished gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// A new connection was added to the graph.
    Committed(Connection),
    /// The target was not a valid destination; the graph was not touched.
    Rejected(GraphError),
    /// The gesture ended without a target; the graph was not touched.
    Discarded(DiscardReason),
}

impl DrawOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, DrawOutcome::Committed(_))
    }
}

#[derive(Debug, Default)]
pub struct ConnectionDrawer {
    state: DrawingState,
}

impl ConnectionDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn preview(&self) -> Option<PreviewLine> {
        self.state.preview()
    }

    pub fn start(&mut self, source: ConnectionSource, origin: Position) {
        debug!(source = %source, "connection drawing started");
        self.dispatch(DrawEvent::Start { source, origin });
    }

    /// Moves the preview endpoint. Returns the line to render while drawing.
    pub fn pointer_moved(&mut self, pointer: Position) -> Option<PreviewLine> {
        match self.dispatch(DrawEvent::Move { pointer }) {
            DrawEffect::Preview(line) => Some(line),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.dispatch(DrawEvent::Cancel);
    }

    /// Finishes the gesture over `target` (or over empty canvas).
    ///
    /// The drawer is back in `Idle` before the graph is consulted, so no outcome of
    /// validation or of the commit can leave a gesture in progress. Committing an
    /// output that is already connected replaces that connection.
    pub fn end(&mut self, graph: &mut FlowGraph, target: Option<&str>) -> DrawOutcome {
        let effect = self.dispatch(DrawEvent::End {
            target: target.map(str::to_string),
        });
        match effect {
            DrawEffect::Commit { source, target } => {
                if let Err(e) = graph.check_connection(&source, &target) {
                    debug!(source = %source, target = %target, reason = %e, "connection rejected");
                    return DrawOutcome::Rejected(e);
                }
                match graph.reconnect(source, &target) {
                    Ok(connection) => DrawOutcome::Committed(connection),
                    Err(e) => DrawOutcome::Rejected(e),
                }
            }
            DrawEffect::Discard(reason) => DrawOutcome::Discarded(reason),
            DrawEffect::None | DrawEffect::Preview(_) => {
                DrawOutcome::Discarded(DiscardReason::NotDrawing)
            }
        }
    }

    fn dispatch(&mut self, event: DrawEvent) -> DrawEffect {
        let (next, effect) = transition(&self.state, event);
        self.state = next;
        effect
    }
}
