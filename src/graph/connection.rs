use crate::block::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the editor's legacy string encoding of quick-reply branch sources.
pub const QUICK_REPLY_SEPARATOR: &str = "-qr-";

/// Where a connection starts: a block's primary output, or the branch taken when
/// one specific quick reply of a text response block is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionSource {
    Primary(String),
    QuickReply { block_id: String, index: usize },
}

impl ConnectionSource {
    pub fn primary(block_id: impl Into<String>) -> Self {
        ConnectionSource::Primary(block_id.into())
    }

    pub fn quick_reply(block_id: impl Into<String>, index: usize) -> Self {
        ConnectionSource::QuickReply {
            block_id: block_id.into(),
            index,
        }
    }

    /// The block that owns this output.
    pub fn block_id(&self) -> &str {
        match self {
            ConnectionSource::Primary(block_id) => block_id,
            ConnectionSource::QuickReply { block_id, .. } => block_id,
        }
    }

    pub fn quick_reply_index(&self) -> Option<usize> {
        match self {
            ConnectionSource::Primary(_) => None,
            ConnectionSource::QuickReply { index, .. } => Some(*index),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, ConnectionSource::Primary(_))
    }

    /// Encodes the source as the editor's single-string key (`<parentId>-qr-<index>` for branches).
    pub fn encode(&self) -> String {
        match self {
            ConnectionSource::Primary(block_id) => block_id.clone(),
            ConnectionSource::QuickReply { block_id, index } => {
                format!("{}{}{}", block_id, QUICK_REPLY_SEPARATOR, index)
            }
        }
    }

    /// Parses the editor's single-string key. Anything that is not `<parentId>-qr-<number>`
    /// is a primary output.
    pub fn decode(key: &str) -> Self {
        if let Some((parent, index)) = key.rsplit_once(QUICK_REPLY_SEPARATOR) {
            if let (false, Ok(index)) = (parent.is_empty(), index.parse::<usize>()) {
                return ConnectionSource::quick_reply(parent, index);
            }
        }
        ConnectionSource::Primary(key.to_string())
    }
}

impl fmt::Display for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionSource::Primary(block_id) => write!(f, "{}", block_id),
            ConnectionSource::QuickReply { block_id, index } => {
                write!(f, "{}[quick reply {}]", block_id, index)
            }
        }
    }
}

/// A directed edge from a block output to another block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from: ConnectionSource,
    pub to: String,
    /// Editor-only line endpoints.
    pub from_point: Option<Position>,
    pub to_point: Option<Position>,
}

impl Connection {
    pub fn new(id: impl Into<String>, from: ConnectionSource, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from,
            to: to.into(),
            from_point: None,
            to_point: None,
        }
    }

    /// Whether the connection starts or ends at the given block, including quick-reply branches.
    pub fn touches(&self, block_id: &str) -> bool {
        self.from.block_id() == block_id || self.to == block_id
    }
}
