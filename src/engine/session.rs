use serde::{Deserialize, Serialize};

/// What the user did on a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    /// Free text typed by the user.
    Message(String),
    /// A quick-reply button pressed on a text response block.
    QuickReply { block_id: String, index: usize },
}

impl UserAction {
    pub fn message(text: impl Into<String>) -> Self {
        UserAction::Message(text.into())
    }

    pub fn quick_reply(block_id: impl Into<String>, index: usize) -> Self {
        UserAction::QuickReply {
            block_id: block_id.into(),
            index,
        }
    }
}

/// Per-conversation state. Each chat session owns one; sessions never share it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The text response block whose quick replies were shown last, if any.
    pub awaiting_quick_reply: Option<String>,
    /// Number of turns handled so far.
    pub turns: usize,
    /// Ids of the blocks visited, turn by turn.
    pub history: Vec<Vec<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting_quick_reply(&self) -> bool {
        self.awaiting_quick_reply.is_some()
    }
}
