use super::connection::{Connection, ConnectionSource};
use crate::block::Position;
use crate::error::GraphError;
use tracing::debug;

/// Incoming and outgoing connections of one block.
#[derive(Debug, Default)]
pub struct BlockConnections<'a> {
    pub incoming: Vec<&'a Connection>,
    pub outgoing: Vec<&'a Connection>,
}

/// The in-memory edge set. Connections are kept in insertion order, which is the
/// order every query and the serializer report them in.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    connections: Vec<Connection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the edge-set invariants for a prospective connection: no edge back into
    /// the block that owns the output (branches included) and no repeated `(from, to)` pair.
    pub fn check_connection(&self, from: &ConnectionSource, to: &str) -> Result<(), GraphError> {
        if from.block_id() == to {
            return Err(GraphError::SelfConnection {
                block_id: to.to_string(),
            });
        }
        if self.connections.iter().any(|c| &c.from == from && c.to == to) {
            return Err(GraphError::DuplicateConnection {
                from: from.encode(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_valid_connection(&self, from: &ConnectionSource, to: &str) -> bool {
        self.check_connection(from, to).is_ok()
    }

    /// Appends a connection. Never replaces an existing one.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        self.check_connection(&connection.from, &connection.to)?;
        if self.get(&connection.id).is_some() {
            return Err(GraphError::DuplicateConnectionId {
                connection_id: connection.id,
            });
        }
        debug!(id = %connection.id, from = %connection.from, to = %connection.to, "connection added");
        self.connections.push(connection);
        Ok(())
    }

    /// Removes a connection by id. Removing an absent id is a no-op.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<Connection> {
        let position = self.connections.iter().position(|c| c.id == connection_id)?;
        let removed = self.connections.remove(position);
        debug!(id = %removed.id, "connection removed");
        Some(removed)
    }

    /// Removes every connection that starts or ends at the block, including its
    /// quick-reply branches, and returns them in insertion order.
    pub fn remove_block_connections(&mut self, block_id: &str) -> Vec<Connection> {
        self.remove_where(|c| c.touches(block_id))
    }

    /// Removes the quick-reply branches of a block whose index is `>= reply_count`.
    pub fn remove_stale_quick_reply_branches(
        &mut self,
        block_id: &str,
        reply_count: usize,
    ) -> Vec<Connection> {
        self.remove_where(|c| {
            c.from.block_id() == block_id
                && c.from.quick_reply_index().is_some_and(|index| index >= reply_count)
        })
    }

    fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Connection>
    where
        F: FnMut(&Connection) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| predicate(c));
        self.connections = kept;
        removed
    }

    pub fn get_block_connections(&self, block_id: &str) -> BlockConnections<'_> {
        BlockConnections {
            incoming: self.connections.iter().filter(|c| c.to == block_id).collect(),
            outgoing: self
                .connections
                .iter()
                .filter(|c| c.from.block_id() == block_id)
                .collect(),
        }
    }

    /// The first connection leaving the given output, if any.
    pub fn output_of(&self, source: &ConnectionSource) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.from == source)
    }

    pub fn outputs_of<'a>(
        &'a self,
        source: &'a ConnectionSource,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.from == source)
    }

    pub fn update_connection_points(
        &mut self,
        connection_id: &str,
        from_point: Position,
        to_point: Position,
    ) -> bool {
        match self.connections.iter_mut().find(|c| c.id == connection_id) {
            Some(connection) => {
                connection.from_point = Some(from_point);
                connection.to_point = Some(to_point);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }

    pub fn as_slice(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConnectionGraph {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.connections.iter()
    }
}
