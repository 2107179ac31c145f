use thiserror::Error;

/// Errors raised by the connection graph when a mutation would break one of its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("A connection from '{from}' to '{to}' already exists")]
    DuplicateConnection { from: String, to: String },

    #[error("Block '{block_id}' cannot be connected to itself")]
    SelfConnection { block_id: String },

    #[error("Block '{block_id}' does not exist in the graph")]
    UnknownBlock { block_id: String },

    #[error("A block with id '{block_id}' already exists in the graph")]
    DuplicateBlock { block_id: String },

    #[error("Block '{block_id}' has no quick reply at index {index}")]
    UnknownQuickReply { block_id: String, index: usize },

    #[error("A connection with id '{connection_id}' already exists")]
    DuplicateConnectionId { connection_id: String },
}

/// Structural validation failures for a single block. Every variant names the offending block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("Block has an empty id")]
    EmptyId,

    #[error("Block '{block_id}' of type '{block_type}' is missing required field '{field}'")]
    MissingField {
        block_id: String,
        block_type: String,
        field: &'static str,
    },

    #[error("Block '{block_id}' of type '{block_type}' carries field '{field}' which does not belong to that type")]
    OrphanField {
        block_id: String,
        block_type: String,
        field: &'static str,
    },

    #[error("Block '{block_id}' has an invalid user input subType: '{sub_type}'")]
    InvalidSubType { block_id: String, sub_type: String },

    #[error("Block '{block_id}' has an invalid value for '{field}': {message}")]
    InvalidValue {
        block_id: String,
        field: &'static str,
        message: String,
    },
}

impl BlockError {
    /// The id of the block that failed validation, when it has one.
    pub fn block_id(&self) -> Option<&str> {
        match self {
            BlockError::EmptyId => None,
            BlockError::MissingField { block_id, .. }
            | BlockError::OrphanField { block_id, .. }
            | BlockError::InvalidSubType { block_id, .. }
            | BlockError::InvalidValue { block_id, .. } => Some(block_id),
        }
    }
}

/// Errors that can occur while loading, validating or storing a runtime document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Runtime document contains an invalid block: {0}")]
    InvalidBlock(#[from] BlockError),

    #[error("Runtime document contains block '{0}' more than once")]
    DuplicateBlock(String),

    #[error("Failed to parse runtime document JSON: {0}")]
    Json(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors that can occur when converting a custom editor format into a `FlowGraph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid editor data: {0}")]
    Validation(String),

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
