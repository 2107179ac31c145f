//! The editable conversation graph: blocks, the connections between them, and the
//! change events a rendering layer listens to.

pub mod connection;
pub mod events;
pub mod store;

pub use connection::*;
pub use events::*;
pub use store::*;

use crate::block::{Block, Position};
use crate::error::GraphError;
use ahash::AHashMap;
use tracing::debug;

/// Offset applied to a duplicated block so it does not cover the original on the canvas.
const DUPLICATE_OFFSET: f64 = 40.0;

/// Blocks plus their connection graph, owned by a single editor session.
///
/// Every mutation either applies completely or returns an error without touching the
/// graph. Subscribers are notified synchronously once the mutation has been applied.
#[derive(Debug, Default)]
pub struct FlowGraph {
    blocks: Vec<Block>,
    index: AHashMap<String, usize>,
    connections: ConnectionGraph,
    events: EventBus,
    next_connection_id: u64,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from stored blocks and connections, checking every invariant.
    /// No events are published.
    pub fn from_parts(blocks: Vec<Block>, connections: Vec<Connection>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for block in blocks {
            graph.insert_block(block)?;
        }
        for connection in connections {
            graph.check_endpoints(&connection.from, &connection.to)?;
            graph.connections.add_connection(connection)?;
        }
        Ok(graph)
    }

    // --- Queries ---

    /// Blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.index.get(block_id).map(|&i| &self.blocks[i])
    }

    pub fn contains_block(&self, block_id: &str) -> bool {
        self.index.contains_key(block_id)
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    pub fn get_block_connections(&self, block_id: &str) -> BlockConnections<'_> {
        self.connections.get_block_connections(block_id)
    }

    /// Whether a connection from `from` to `to` could be committed right now.
    pub fn is_valid_connection(&self, from: &ConnectionSource, to: &str) -> bool {
        self.check_connection(from, to).is_ok()
    }

    /// Like [`is_valid_connection`](Self::is_valid_connection), but says why not.
    pub fn check_connection(&self, from: &ConnectionSource, to: &str) -> Result<(), GraphError> {
        self.connections.check_connection(from, to)?;
        self.check_endpoints(from, to)
    }

    // --- Subscriptions ---

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) + Send + 'static,
    {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // --- Block mutations ---

    pub fn add_block(&mut self, block: Block) -> Result<(), GraphError> {
        let block_id = block.id.clone();
        self.insert_block(block)?;
        self.events.publish(&GraphEvent::BlockAdded(block_id));
        Ok(())
    }

    /// Replaces a block's content. Quick-reply branches whose reply no longer exists are removed.
    pub fn update_block(&mut self, block: Block) -> Result<(), GraphError> {
        let &slot = self
            .index
            .get(&block.id)
            .ok_or_else(|| GraphError::UnknownBlock {
                block_id: block.id.clone(),
            })?;
        let block_id = block.id.clone();
        let reply_count = block.quick_replies().len();
        self.blocks[slot] = block;
        let dropped = self
            .connections
            .remove_stale_quick_reply_branches(&block_id, reply_count);
        debug!(block_id = %block_id, dropped = dropped.len(), "block updated");

        self.events
            .publish_all(dropped.into_iter().map(GraphEvent::ConnectionDeleted));
        self.events.publish(&GraphEvent::BlockUpdated(block_id));
        Ok(())
    }

    pub fn move_block(&mut self, block_id: &str, position: Position) -> Result<(), GraphError> {
        let &slot = self.index.get(block_id).ok_or_else(|| GraphError::UnknownBlock {
            block_id: block_id.to_string(),
        })?;
        self.blocks[slot].position = position;
        self.events
            .publish(&GraphEvent::BlockUpdated(block_id.to_string()));
        Ok(())
    }

    /// Removes a block together with every connection incident to it.
    pub fn remove_block(&mut self, block_id: &str) -> Result<Block, GraphError> {
        let &slot = self.index.get(block_id).ok_or_else(|| GraphError::UnknownBlock {
            block_id: block_id.to_string(),
        })?;
        let dropped = self.connections.remove_block_connections(block_id);
        let removed = self.blocks.remove(slot);
        self.reindex();
        debug!(block_id = %block_id, cascaded = dropped.len(), "block removed");

        self.events
            .publish_all(dropped.into_iter().map(GraphEvent::ConnectionDeleted));
        self.events
            .publish(&GraphEvent::BlockRemoved(block_id.to_string()));
        Ok(removed)
    }

    /// Copies a block under a fresh id, offset on the canvas and without connections.
    /// Returns the new id.
    pub fn duplicate_block(&mut self, block_id: &str) -> Result<String, GraphError> {
        let original = self.block(block_id).ok_or_else(|| GraphError::UnknownBlock {
            block_id: block_id.to_string(),
        })?;
        let mut copy = original.clone();
        copy.id = self.fresh_id(&format!("{}-dup", block_id), |g, id| g.contains_block(id));
        copy.position = copy.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        let new_id = copy.id.clone();
        self.add_block(copy)?;
        Ok(new_id)
    }

    pub fn select_block(&mut self, block_id: &str) -> Result<(), GraphError> {
        if !self.contains_block(block_id) {
            return Err(GraphError::UnknownBlock {
                block_id: block_id.to_string(),
            });
        }
        self.events
            .publish(&GraphEvent::SelectBlock(block_id.to_string()));
        Ok(())
    }

    // --- Connection mutations ---

    /// Adds a caller-built connection.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        self.check_endpoints(&connection.from, &connection.to)?;
        let created = connection.clone();
        self.connections.add_connection(connection)?;
        self.events.publish(&GraphEvent::ConnectionCreated(created));
        Ok(())
    }

    /// Creates a connection with a generated id.
    pub fn connect(&mut self, from: ConnectionSource, to: &str) -> Result<Connection, GraphError> {
        self.check_connection(&from, to)?;
        let id = self.next_connection_id();
        let connection = Connection::new(id, from, to);
        self.add_connection(connection.clone())?;
        Ok(connection)
    }

    /// Points an output at a new target, removing whatever that output was connected to.
    ///
    /// The new connection is validated before anything is removed, so a rejected
    /// redraw leaves the old connection in place.
    pub fn reconnect(&mut self, from: ConnectionSource, to: &str) -> Result<Connection, GraphError> {
        self.check_connection(&from, to)?;
        let previous: Vec<String> = self
            .connections
            .outputs_of(&from)
            .map(|c| c.id.clone())
            .collect();
        for connection_id in previous {
            self.remove_connection(&connection_id);
        }
        self.connect(from, to)
    }

    /// Idempotent: removing an unknown id does nothing.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<Connection> {
        let removed = self.connections.remove_connection(connection_id)?;
        self.events
            .publish(&GraphEvent::ConnectionDeleted(removed.clone()));
        Some(removed)
    }

    /// Removes every connection incident to a block without removing the block.
    pub fn remove_block_connections(&mut self, block_id: &str) -> Vec<Connection> {
        let removed = self.connections.remove_block_connections(block_id);
        self.events
            .publish_all(removed.iter().cloned().map(GraphEvent::ConnectionDeleted));
        removed
    }

    pub fn update_connection_points(
        &mut self,
        connection_id: &str,
        from_point: Position,
        to_point: Position,
    ) -> bool {
        self.connections
            .update_connection_points(connection_id, from_point, to_point)
    }

    // --- Internals ---

    fn insert_block(&mut self, block: Block) -> Result<(), GraphError> {
        if self.index.contains_key(&block.id) {
            return Err(GraphError::DuplicateBlock { block_id: block.id });
        }
        debug!(block_id = %block.id, block_type = block.type_name(), "block added");
        self.index.insert(block.id.clone(), self.blocks.len());
        self.blocks.push(block);
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
    }

    /// Both endpoints must name existing blocks, and a branch must name an existing quick reply.
    fn check_endpoints(&self, from: &ConnectionSource, to: &str) -> Result<(), GraphError> {
        let source = self.block(from.block_id()).ok_or_else(|| GraphError::UnknownBlock {
            block_id: from.block_id().to_string(),
        })?;
        if let Some(index) = from.quick_reply_index() {
            if index >= source.quick_replies().len() {
                return Err(GraphError::UnknownQuickReply {
                    block_id: source.id.clone(),
                    index,
                });
            }
        }
        if !self.contains_block(to) {
            return Err(GraphError::UnknownBlock {
                block_id: to.to_string(),
            });
        }
        Ok(())
    }

    fn next_connection_id(&mut self) -> String {
        loop {
            self.next_connection_id += 1;
            let id = format!("conn-{}", self.next_connection_id);
            if self.connections.get(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_id<F>(&self, base: &str, taken: F) -> String
    where
        F: Fn(&Self, &str) -> bool,
    {
        if !taken(self, base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken(self, candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
