use super::conversion::IntoFlow;
use crate::block::{Block, Position, RawBlock};
use crate::error::ConversionError;
use crate::graph::{Connection, ConnectionSource, FlowGraph};
use serde::{Deserialize, Serialize};

/// The graph exactly as the editor persists it.
///
/// Connections use plain string endpoints, and a quick-reply branch is stored as
/// `"<parentId>-qr-<index>"` in `fromBlockId`. That key is decoded once, on import,
/// into a [`ConnectionSource`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorDocument {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub connections: Vec<EditorConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConnection {
    pub id: String,
    pub from_block_id: String,
    pub to_block_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_point: Option<EditorPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_point: Option<EditorPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EditorPoint {
    pub x: f64,
    pub y: f64,
}

impl From<EditorPoint> for Position {
    fn from(point: EditorPoint) -> Self {
        Position::new(point.x, point.y)
    }
}

impl From<Position> for EditorPoint {
    fn from(position: Position) -> Self {
        EditorPoint {
            x: position.x,
            y: position.y,
        }
    }
}

impl EditorDocument {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Validation(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConversionError> {
        serde_json::to_string_pretty(self).map_err(|e| ConversionError::Validation(e.to_string()))
    }

    /// Captures a graph in the editor's persisted form.
    pub fn from_graph(graph: &FlowGraph) -> Self {
        let blocks = graph.blocks().iter().map(RawBlock::from).collect();
        let connections = graph
            .connections()
            .iter()
            .map(|c| EditorConnection {
                id: c.id.clone(),
                from_block_id: c.from.encode(),
                to_block_id: c.to.clone(),
                from_point: c.from_point.map(EditorPoint::from),
                to_point: c.to_point.map(EditorPoint::from),
            })
            .collect();
        Self {
            blocks,
            connections,
        }
    }
}

impl IntoFlow for EditorDocument {
    fn into_flow(self) -> Result<FlowGraph, ConversionError> {
        let blocks = self
            .blocks
            .into_iter()
            .map(Block::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let connections = self
            .connections
            .into_iter()
            .map(|raw| {
                let mut connection = Connection::new(
                    raw.id,
                    ConnectionSource::decode(&raw.from_block_id),
                    raw.to_block_id,
                );
                connection.from_point = raw.from_point.map(Position::from);
                connection.to_point = raw.to_point.map(Position::from);
                connection
            })
            .collect();

        Ok(FlowGraph::from_parts(blocks, connections)?)
    }
}
