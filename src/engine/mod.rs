//! Runs a published conversation against incoming user actions.
//!
//! A [`FlowEngine`] is built once from a validated [`RuntimeDocument`] and is read-only
//! afterwards, so it can be shared between any number of chat sessions. Each call
//! performs one bounded walk and returns a finished [`Reply`].
//!
//! Matching order: keyword and phrase blocks are tried first, in document order, and
//! the first match wins. `anything` blocks are only consulted when none of those
//! matched, again in document order.

mod response;
mod session;
mod walker;

pub use response::*;
pub use session::*;
pub use walker::WalkOutcome;

use crate::block::{BlockKind, UserInputMatcher, normalize_message};
use crate::document::{RuntimeBlock, RuntimeDocument};
use crate::error::DocumentError;
use crate::trace::TraceFormatter;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use walker::{Walk, Walker};

pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I did not understand that.";
pub const DEFAULT_MAX_STEPS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Sent when nothing matched or a selected branch does not exist.
    pub fallback_message: String,
    /// Upper bound on the number of blocks one walk may visit.
    pub max_steps: usize,
    /// Treat typed text equal to a pending quick reply's text or value as that selection.
    pub quick_reply_text_matching: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
            quick_reply_text_matching: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))
    }
}

/// What started a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Trigger {
    Matched { block_id: String },
    QuickReply { block_id: String, index: usize },
    Fallback,
}

/// The result of handling one user action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// The ordered responses to send back.
    pub responses: Vec<Response>,
    pub trigger: Trigger,
    /// Ids of the blocks the walk visited, in order.
    pub path: Vec<String>,
    pub outcome: WalkOutcome,
    /// The last visited block that offered quick replies.
    pub awaiting_quick_reply: Option<String>,
    /// A human-readable explanation of the walk.
    pub reason: String,
}

pub struct FlowEngine {
    document: RuntimeDocument,
    index: AHashMap<String, usize>,
    config: EngineConfig,
}

pub struct FlowEngineBuilder {
    document: RuntimeDocument,
    config: EngineConfig,
}

impl FlowEngineBuilder {
    pub fn new(document: RuntimeDocument) -> Self {
        Self {
            document,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fallback_message(mut self, message: &str) -> Self {
        self.config.fallback_message = message.to_string();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    pub fn with_quick_reply_text_matching(mut self, enabled: bool) -> Self {
        self.config.quick_reply_text_matching = enabled;
        self
    }

    /// Validates the document and indexes its blocks.
    pub fn build(self) -> Result<FlowEngine, DocumentError> {
        self.document.validate()?;
        let index = self
            .document
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id().to_string(), i))
            .collect();
        Ok(FlowEngine {
            document: self.document,
            index,
            config: self.config,
        })
    }
}

impl FlowEngine {
    pub fn builder(document: RuntimeDocument) -> FlowEngineBuilder {
        FlowEngineBuilder::new(document)
    }

    pub fn new(document: RuntimeDocument) -> Result<Self, DocumentError> {
        FlowEngineBuilder::new(document).build()
    }

    pub fn document(&self) -> &RuntimeDocument {
        &self.document
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn welcome_message(&self) -> &str {
        &self.document.welcome_message
    }

    /// Finds the user input block that accepts the message.
    pub fn find_matching_block(&self, message: &str) -> Option<&RuntimeBlock> {
        let normalized = normalize_message(message);
        let accepts = |b: &&RuntimeBlock, fallback: bool| {
            matcher_of(b).is_some_and(|m| m.is_fallback() == fallback && m.matches(&normalized))
        };

        self.document
            .blocks
            .iter()
            .find(|b| accepts(b, false))
            .or_else(|| self.document.blocks.iter().find(|b| accepts(b, true)))
    }

    /// Matches a free-text message and walks from the matched block.
    ///
    /// Stateless and deterministic: the same message always yields the same reply.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&self, message: &str) -> Reply {
        let Some(start) = self.find_matching_block(message) else {
            debug!("no user input block matched");
            return self.fallback(Trigger::Fallback, WalkOutcome::NoMatch);
        };
        let trigger = Trigger::Matched {
            block_id: start.id().to_string(),
        };
        let walk = self.walker().walk(start);
        self.reply(trigger, walk)
    }

    /// Follows the branch of quick reply `index` on `block_id`.
    ///
    /// Only the branch recorded for that exact reply is considered; the block's primary
    /// output is never taken. A missing branch yields the fallback response.
    #[instrument(level = "debug", skip(self))]
    pub fn select_quick_reply(&self, block_id: &str, index: usize) -> Reply {
        let trigger = Trigger::QuickReply {
            block_id: block_id.to_string(),
            index,
        };
        let walker = self.walker();
        let target = walker
            .lookup(block_id)
            .and_then(|parent| parent.quick_reply_target(index));
        match target.and_then(|id| walker.lookup(id)) {
            Some(start) => {
                let walk = walker.walk(start);
                self.reply(trigger, walk)
            }
            None => {
                warn!(block_id = %block_id, index, "quick reply has no branch");
                self.fallback(
                    trigger,
                    WalkOutcome::NoBranch {
                        block_id: block_id.to_string(),
                        index,
                    },
                )
            }
        }
    }

    /// Handles one turn of a conversation and updates the session.
    pub fn respond(&self, session: &mut Session, action: UserAction) -> Reply {
        let reply = match action {
            UserAction::QuickReply { block_id, index } => self.select_quick_reply(&block_id, index),
            UserAction::Message(text) => match self.typed_quick_reply(session, &text) {
                Some((block_id, index)) => self.select_quick_reply(&block_id, index),
                None => self.execute(&text),
            },
        };
        session.awaiting_quick_reply = reply.awaiting_quick_reply.clone();
        session.turns += 1;
        session.history.push(reply.path.clone());
        reply
    }

    /// Reads `text` as a 1-based pick from the quick replies the session is waiting on.
    ///
    /// Returns `None` when nothing is pending or the number is not one of the shown
    /// replies, so the text can be handled as a plain message instead.
    pub fn numbered_quick_reply(&self, session: &Session, text: &str) -> Option<UserAction> {
        let block_id = session.awaiting_quick_reply.as_deref()?;
        let reply_count = self.walker().lookup(block_id)?.block.quick_replies().len();
        let n = text.trim().parse::<usize>().ok()?;
        (1..=reply_count)
            .contains(&n)
            .then(|| UserAction::quick_reply(block_id, n - 1))
    }

    /// Resolves typed text to a pending quick reply, when enabled.
    fn typed_quick_reply(&self, session: &Session, text: &str) -> Option<(String, usize)> {
        if !self.config.quick_reply_text_matching {
            return None;
        }
        let block_id = session.awaiting_quick_reply.as_deref()?;
        let normalized = normalize_message(text);
        let index = self
            .walker()
            .lookup(block_id)?
            .block
            .quick_replies()
            .iter()
            .position(|r| r.is_named_by(&normalized))?;
        Some((block_id.to_string(), index))
    }

    fn walker(&self) -> Walker<'_> {
        Walker::new(&self.document.blocks, &self.index, self.config.max_steps)
    }

    fn reply(&self, trigger: Trigger, walk: Walk) -> Reply {
        let reason = TraceFormatter::format_walk(&trigger, &walk.path, &walk.outcome);
        Reply {
            responses: walk.responses,
            trigger,
            path: walk.path,
            outcome: walk.outcome,
            awaiting_quick_reply: walk.awaiting_quick_reply,
            reason,
        }
    }

    fn fallback(&self, trigger: Trigger, outcome: WalkOutcome) -> Reply {
        let reason = TraceFormatter::format_walk(&trigger, &[], &outcome);
        Reply {
            responses: vec![Response::text(self.config.fallback_message.clone())],
            trigger,
            path: Vec::new(),
            outcome,
            awaiting_quick_reply: None,
            reason,
        }
    }
}

fn matcher_of(block: &RuntimeBlock) -> Option<&UserInputMatcher> {
    match &block.block.kind {
        BlockKind::UserInput(matcher) => Some(matcher),
        _ => None,
    }
}
