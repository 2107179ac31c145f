use crate::block::Position;
use crate::graph::ConnectionSource;

/// The single piece of state behind a drag-to-connect gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    #[default]
    Idle,
    Drawing {
        source: ConnectionSource,
        origin: Position,
        pointer: Position,
    },
}

impl DrawingState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawingState::Drawing { .. })
    }

    /// The transient line from the output anchor to the pointer while drawing.
    pub fn preview(&self) -> Option<PreviewLine> {
        match self {
            DrawingState::Idle => None,
            DrawingState::Drawing { origin, pointer, .. } => Some(PreviewLine {
                from: *origin,
                to: *pointer,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLine {
    pub from: Position,
    pub to: Position,
}

/// Pointer gestures, already resolved to block anchors by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Pressed on an output anchor.
    Start {
        source: ConnectionSource,
        origin: Position,
    },
    Move { pointer: Position },
    /// Released over a block's input anchor, or over empty canvas when `target` is `None`.
    End { target: Option<String> },
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    EmptyCanvas,
    SameBlock,
    NotDrawing,
    Cancelled,
}

/// What the driver has to do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEffect {
    None,
    Preview(PreviewLine),
    /// Validate against the graph and, if valid, create the connection.
    Commit {
        source: ConnectionSource,
        target: String,
    },
    Discard(DiscardReason),
}

/// Pure transition function. Any `End` or `Cancel` event lands in `Idle`.
pub fn transition(state: &DrawingState, event: DrawEvent) -> (DrawingState, DrawEffect) {
    match (state, event) {
        (_, DrawEvent::Start { source, origin }) => (
            DrawingState::Drawing {
                source,
                origin,
                pointer: origin,
            },
            DrawEffect::None,
        ),

        (DrawingState::Drawing { source, origin, .. }, DrawEvent::Move { pointer }) => {
            let next = DrawingState::Drawing {
                source: source.clone(),
                origin: *origin,
                pointer,
            };
            let effect = DrawEffect::Preview(PreviewLine {
                from: *origin,
                to: pointer,
            });
            (next, effect)
        }
        (DrawingState::Idle, DrawEvent::Move { .. }) => (DrawingState::Idle, DrawEffect::None),

        (DrawingState::Drawing { source, .. }, DrawEvent::End { target }) => {
            let effect = match target {
                None => DrawEffect::Discard(DiscardReason::EmptyCanvas),
                Some(target) if target == source.block_id() => {
                    DrawEffect::Discard(DiscardReason::SameBlock)
                }
                Some(target) => DrawEffect::Commit {
                    source: source.clone(),
                    target,
                },
            };
            (DrawingState::Idle, effect)
        }
        (DrawingState::Idle, DrawEvent::End { .. }) => (
            DrawingState::Idle,
            DrawEffect::Discard(DiscardReason::NotDrawing),
        ),

        (DrawingState::Drawing { .. }, DrawEvent::Cancel) => (
            DrawingState::Idle,
            DrawEffect::Discard(DiscardReason::Cancelled),
        ),
        (DrawingState::Idle, DrawEvent::Cancel) => (DrawingState::Idle, DrawEffect::None),
    }
}
