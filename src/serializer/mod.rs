//! Publishing: turning the editable graph into a runtime document.

use crate::block::Block;
use crate::document::{
    DEFAULT_NAME, DEFAULT_WELCOME_MESSAGE, Output, QuickReplyOutput, RuntimeBlock, RuntimeDocument,
};
use crate::error::GraphError;
use crate::graph::{Connection, ConnectionSource, FlowGraph};
use tracing::{info, instrument, warn};

pub struct FlowSerializer<'a> {
    graph: &'a FlowGraph,
    name: String,
    welcome_message: String,
}

pub struct FlowSerializerBuilder<'a> {
    graph: &'a FlowGraph,
    name: String,
    welcome_message: String,
}

impl<'a> FlowSerializerBuilder<'a> {
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self {
            graph,
            name: DEFAULT_NAME.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_welcome_message(mut self, welcome_message: &str) -> Self {
        self.welcome_message = welcome_message.to_string();
        self
    }

    pub fn build(self) -> FlowSerializer<'a> {
        FlowSerializer {
            graph: self.graph,
            name: self.name,
            welcome_message: self.welcome_message,
        }
    }
}

impl<'a> FlowSerializer<'a> {
    pub fn builder(graph: &'a FlowGraph) -> FlowSerializerBuilder<'a> {
        FlowSerializerBuilder::new(graph)
    }

    pub fn new(graph: &'a FlowGraph) -> Self {
        FlowSerializerBuilder::new(graph).build()
    }

    /// Bakes every block's outgoing edges into a self-contained document.
    ///
    /// This is a pure function of the graph: blocks keep their insertion order and
    /// outputs keep connection insertion order, so serializing an unchanged graph
    /// twice yields identical documents.
    #[instrument(level = "debug", skip(self), fields(name = %self.name))]
    pub fn serialize(&self) -> RuntimeDocument {
        let connections = self.graph.connections().as_slice();
        let blocks: Vec<RuntimeBlock> = self
            .graph
            .blocks()
            .iter()
            .map(|block| RuntimeBlock {
                block: block.clone(),
                outputs: primary_outputs(block, connections),
                quick_reply_outputs: quick_reply_outputs(block, connections),
            })
            .collect();

        info!(
            block_count = blocks.len(),
            connection_count = connections.len(),
            "flow serialized"
        );
        RuntimeDocument {
            name: self.name.clone(),
            welcome_message: self.welcome_message.clone(),
            blocks,
        }
    }
}

fn primary_outputs(block: &Block, connections: &[Connection]) -> Vec<Output> {
    connections
        .iter()
        .filter(|c| matches!(&c.from, ConnectionSource::Primary(id) if *id == block.id))
        .map(|c| Output {
            to_block_id: c.to.clone(),
        })
        .collect()
}

fn quick_reply_outputs(block: &Block, connections: &[Connection]) -> Option<Vec<QuickReplyOutput>> {
    if block.quick_replies().is_empty() {
        return None;
    }
    let branches = connections
        .iter()
        .filter_map(|c| match &c.from {
            ConnectionSource::QuickReply { block_id, index } if *block_id == block.id => {
                Some(QuickReplyOutput {
                    quick_reply_index: *index,
                    to_block_id: c.to.clone(),
                })
            }
            _ => None,
        })
        .collect();
    Some(branches)
}

/// Serializes a graph with the default document name and welcome message.
pub fn serialize_flow(graph: &FlowGraph) -> RuntimeDocument {
    FlowSerializer::new(graph).serialize()
}

/// Rebuilds an editable graph from a runtime document.
///
/// Outputs that point at blocks missing from the document are dropped, since the
/// graph does not admit dangling connections.
pub fn deserialize_flow(document: &RuntimeDocument) -> Result<FlowGraph, GraphError> {
    let blocks = document.blocks.iter().map(|b| b.block.clone()).collect();
    let known = |id: &str| document.blocks.iter().any(|b| b.id() == id);

    let mut connections = Vec::new();
    for runtime_block in &document.blocks {
        let primary = runtime_block
            .outputs
            .iter()
            .map(|o| (ConnectionSource::primary(runtime_block.id()), &o.to_block_id));
        let branches = runtime_block
            .quick_reply_outputs
            .iter()
            .flatten()
            .map(|o| {
                (
                    ConnectionSource::quick_reply(runtime_block.id(), o.quick_reply_index),
                    &o.to_block_id,
                )
            });

        for (source, target) in primary.chain(branches) {
            if !known(target) {
                warn!(source = %source, target = %target, "dropping dangling output");
                continue;
            }
            let id = format!("conn-{}", connections.len() + 1);
            connections.push(Connection::new(id, source, target.clone()));
        }
    }

    FlowGraph::from_parts(blocks, connections)
}
