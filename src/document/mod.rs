//! The published, self-contained form of a conversation graph.
//!
//! A runtime document carries every block with its outgoing edges baked in, so a
//! deployed widget never needs the editor's connection graph. It can be stored as
//! JSON (the wire shape widgets read) or as a compact binary artifact. Both load
//! paths validate the document before handing it out.

pub mod artifact;
pub mod visualizer;
mod wire;

pub use wire::{WireBlock, WireDocument};

use crate::block::{Block, RawBlock};
use crate::error::{BlockError, DocumentError};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Published Bot";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! How can I help you today?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeDocument {
    pub name: String,
    pub welcome_message: String,
    pub blocks: Vec<RuntimeBlock>,
}

/// A block with its outgoing edges attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeBlock {
    pub block: Block,
    /// Primary successors, in connection insertion order. Normally at most one.
    pub outputs: Vec<Output>,
    /// Present only for text responses that have quick replies.
    pub quick_reply_outputs: Option<Vec<QuickReplyOutput>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub to_block_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyOutput {
    pub quick_reply_index: usize,
    pub to_block_id: String,
}

impl RuntimeBlock {
    pub fn id(&self) -> &str {
        &self.block.id
    }

    /// The block the walk continues with, if this block has a primary successor.
    pub fn primary_successor(&self) -> Option<&str> {
        self.outputs.first().map(|o| o.to_block_id.as_str())
    }

    /// The branch target for a quick reply. Never falls back to the primary output.
    pub fn quick_reply_target(&self, index: usize) -> Option<&str> {
        self.quick_reply_outputs
            .as_deref()?
            .iter()
            .find(|o| o.quick_reply_index == index)
            .map(|o| o.to_block_id.as_str())
    }

    fn validate(&self) -> Result<(), BlockError> {
        Block::try_from(RawBlock::from(&self.block))?;

        let Some(branches) = &self.quick_reply_outputs else {
            return Ok(());
        };
        let reply_count = self.block.quick_replies().len();
        if reply_count == 0 {
            return Err(BlockError::OrphanField {
                block_id: self.block.id.clone(),
                block_type: self.block.type_name().to_string(),
                field: "quickReplyOutputs",
            });
        }
        if let Some(branch) = branches.iter().find(|b| b.quick_reply_index >= reply_count) {
            return Err(BlockError::InvalidValue {
                block_id: self.block.id.clone(),
                field: "quickReplyOutputs",
                message: format!(
                    "quick reply index {} is out of range for {} replies",
                    branch.quick_reply_index, reply_count
                ),
            });
        }
        Ok(())
    }
}

impl RuntimeDocument {
    /// Checks that every block is structurally valid and that block ids are unique.
    ///
    /// Outputs pointing at blocks that are not in the document are allowed; the engine
    /// treats them as "no successor".
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = AHashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            block.validate()?;
            if !seen.insert(block.id()) {
                return Err(DocumentError::DuplicateBlock(block.id().to_string()));
            }
        }
        Ok(())
    }

    pub fn block(&self, block_id: &str) -> Option<&RuntimeBlock> {
        self.blocks.iter().find(|b| b.id() == block_id)
    }

    /// Parses and validates the JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let wire: WireDocument =
            serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))?;
        let document = Self::try_from(wire)?;
        document.validate()?;
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&WireDocument::from(self))
            .map_err(|e| DocumentError::Json(e.to_string()))
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, DocumentError> {
        serde_json::to_value(WireDocument::from(self)).map_err(|e| DocumentError::Json(e.to_string()))
    }
}
