//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the chatflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = RuntimeDocument::load("path/to/bot.json")?;
//! let engine = FlowEngine::new(document)?;
//!
//! let mut session = Session::new();
//! let reply = engine.respond(&mut session, UserAction::message("hi"));
//! println!("Reply: {:?}", reply.responses);
//! # Ok(())
//! # }
//! ```

// Blocks
pub use crate::block::{Block, BlockKind, Position, QuickReply, RawBlock, UserInputMatcher};

// Editing
pub use crate::drawing::{ConnectionDrawer, DrawOutcome};
pub use crate::flow::{EditorDocument, IntoFlow};
pub use crate::graph::{Connection, ConnectionSource, FlowGraph, GraphEvent};

// Publishing and running
pub use crate::document::RuntimeDocument;
pub use crate::engine::{EngineConfig, FlowEngine, Reply, Response, Session, UserAction};
pub use crate::serializer::{FlowSerializer, deserialize_flow, serialize_flow};

// Error types
pub use crate::error::{BlockError, ConversionError, DocumentError, GraphError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
