//! # Chatflow - Conversation Graph Editor Core and Runtime Engine
//!
//! **Chatflow** models chatbot conversations as directed graphs of typed blocks. Authors
//! build the graph in an editor by wiring blocks together; a published, self-contained
//! document is then executed by a stateless engine for each incoming user message.
//!
//! ## Core Workflow
//!
//! 1.  **Build the graph**: Add blocks to a `FlowGraph` and wire them together, either
//!     directly or through the drag-to-connect `ConnectionDrawer`. Graphs saved by other
//!     tools can be brought in through the `IntoFlow` trait.
//! 2.  **Publish**: Use `FlowSerializer::builder` to bake every block's outgoing edges
//!     into a `RuntimeDocument`, and store it as JSON or as a binary artifact.
//! 3.  **Run**: Build a `FlowEngine` from the document and feed it user messages or
//!     quick-reply selections. Each call returns the ordered responses to send back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // 1. Build a tiny conversation: "hello" -> greeting text.
//!     let mut graph = FlowGraph::new();
//!     graph.add_block(Block::user_input("greet", UserInputMatcher::keywords(vec![vec!["hello"]])))?;
//!     graph.add_block(Block::text("reply", "Hi there!"))?;
//!     graph.connect(ConnectionSource::primary("greet"), "reply")?;
//!
//!     // 2. Publish it.
//!     let document = FlowSerializer::builder(&graph)
//!         .with_name("Greeter")
//!         .build()
//!         .serialize();
//!     document.save("greeter.bin")?;
//!
//!     // 3. Run it.
//!     let engine = FlowEngine::new(document)?;
//!     let reply = engine.execute("Hello!");
//!     for response in &reply.responses {
//!         println!("-> {:?}", response);
//!     }
//!     println!("-> Reason: {}", reply.reason);
//!
//!     Ok(())
//! }
//! ```

pub mod block;
pub mod document;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod flow;
pub mod graph;
pub mod prelude;
pub mod serializer;
pub mod trace;
