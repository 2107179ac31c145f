use crate::error::ConversionError;
use crate::graph::FlowGraph;

/// A trait for custom editor formats that can be converted into a `FlowGraph`.
///
/// This is the extension point for loading graphs that were persisted by some other
/// tool. Implement it on your own structs to provide the translation layer; the
/// resulting graph has had every block and connection invariant checked.
///
/// # Example
///
/// ```rust,no_run
/// use chatflow::prelude::*;
/// use chatflow::error::ConversionError;
///
/// struct MyNode { id: String, reply: String }
/// struct MyBot { nodes: Vec<MyNode> }
///
/// impl IntoFlow for MyBot {
///     fn into_flow(self) -> std::result::Result<FlowGraph, ConversionError> {
///         let mut graph = FlowGraph::new();
///         for node in self.nodes {
///             graph.add_block(Block::text(node.id, node.reply))?;
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into an editable conversation graph.
    fn into_flow(self) -> Result<FlowGraph, ConversionError>;
}

impl IntoFlow for FlowGraph {
    fn into_flow(self) -> Result<FlowGraph, ConversionError> {
        Ok(self)
    }
}
