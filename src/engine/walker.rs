use super::response::{Response, respond_to};
use crate::document::RuntimeBlock;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use tracing::{debug, warn};

/// How a walk ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WalkOutcome {
    /// The last block had no primary successor.
    Completed,
    /// A successor named a block that is not in the document.
    DanglingSuccessor { from: String, missing: String },
    /// The walk came back to a block it had already visited.
    Cycle { block_id: String },
    /// The configured step bound was reached.
    StepLimit { steps: usize },
    /// No user input block matched the message.
    NoMatch,
    /// The selected quick reply has no branch.
    NoBranch { block_id: String, index: usize },
}

impl WalkOutcome {
    /// Whether the walk reached its natural end.
    pub fn is_completed(&self) -> bool {
        matches!(self, WalkOutcome::Completed)
    }
}

pub(super) struct Walk {
    pub responses: Vec<Response>,
    pub path: Vec<String>,
    pub outcome: WalkOutcome,
    pub awaiting_quick_reply: Option<String>,
}

/// Follows primary successors from `start` until a block has none.
///
/// Successors are deterministic, so revisiting a block means the walk would never
/// end; it stops there and keeps the responses produced so far.
pub(super) struct Walker<'a> {
    blocks: &'a [RuntimeBlock],
    index: &'a AHashMap<String, usize>,
    max_steps: usize,
}

impl<'a> Walker<'a> {
    pub(super) fn new(
        blocks: &'a [RuntimeBlock],
        index: &'a AHashMap<String, usize>,
        max_steps: usize,
    ) -> Self {
        Self {
            blocks,
            index,
            max_steps,
        }
    }

    pub(super) fn walk(&self, start: &'a RuntimeBlock) -> Walk {
        let mut responses = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut awaiting_quick_reply = None;
        let mut current = start;

        let outcome = loop {
            if path.len() >= self.max_steps {
                warn!(steps = path.len(), "walk stopped at the step limit");
                break WalkOutcome::StepLimit { steps: path.len() };
            }
            if !visited.insert(current.id()) {
                warn!(block_id = %current.id(), "walk stopped on a cycle");
                break WalkOutcome::Cycle {
                    block_id: current.id().to_string(),
                };
            }

            debug!(block_id = %current.id(), block_type = current.block.type_name(), "visiting block");
            path.push(current.id().to_string());
            if let Some(response) = respond_to(&current.block) {
                responses.push(response);
            }
            if !current.block.quick_replies().is_empty() {
                awaiting_quick_reply = Some(current.id().to_string());
            }

            let Some(next_id) = current.primary_successor() else {
                break WalkOutcome::Completed;
            };
            match self.lookup(next_id) {
                Some(next) => current = next,
                None => {
                    warn!(from = %current.id(), missing = %next_id, "successor is not in the document");
                    break WalkOutcome::DanglingSuccessor {
                        from: current.id().to_string(),
                        missing: next_id.to_string(),
                    };
                }
            }
        };

        Walk {
            responses,
            path,
            outcome,
            awaiting_quick_reply,
        }
    }

    pub(super) fn lookup(&self, block_id: &str) -> Option<&'a RuntimeBlock> {
        self.index.get(block_id).map(|&i| &self.blocks[i])
    }
}
