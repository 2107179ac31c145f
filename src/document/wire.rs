use super::{Output, QuickReplyOutput, RuntimeBlock, RuntimeDocument};
use crate::block::{Block, RawBlock};
use crate::error::DocumentError;
use serde::{Deserialize, Serialize};

/// The JSON shape a deployed widget reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    pub name: String,
    #[serde(default)]
    pub welcome_message: String,
    pub blocks: Vec<WireBlock>,
}

/// One block entry: the block's own fields, flat, plus its baked-in outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBlock {
    #[serde(flatten)]
    pub block: RawBlock,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_reply_outputs: Option<Vec<QuickReplyOutput>>,
}

impl From<&RuntimeDocument> for WireDocument {
    fn from(document: &RuntimeDocument) -> Self {
        Self {
            name: document.name.clone(),
            welcome_message: document.welcome_message.clone(),
            blocks: document
                .blocks
                .iter()
                .map(|b| WireBlock {
                    block: RawBlock::from(&b.block),
                    outputs: b.outputs.clone(),
                    quick_reply_outputs: b.quick_reply_outputs.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<WireDocument> for RuntimeDocument {
    type Error = DocumentError;

    fn try_from(wire: WireDocument) -> Result<Self, Self::Error> {
        let blocks = wire
            .blocks
            .into_iter()
            .map(|b| {
                Ok(RuntimeBlock {
                    block: Block::try_from(b.block)?,
                    outputs: b.outputs,
                    quick_reply_outputs: b.quick_reply_outputs,
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;
        Ok(Self {
            name: wire.name,
            welcome_message: wire.welcome_message,
            blocks,
        })
    }
}
