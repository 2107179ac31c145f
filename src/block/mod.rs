//! The closed set of block variants that make up a conversation graph.
//!
//! Every block exposes the same identity and position surface regardless of its variant.
//! The variant-specific payload lives in [`BlockKind`], so a block can never carry fields
//! that do not belong to its type. The loose, editor-facing JSON shape is handled by
//! [`RawBlock`], which is where structural validation happens.

mod matcher;
pub mod raw;

pub use matcher::*;
pub use raw::RawBlock;

use serde::{Deserialize, Serialize};

pub const USER_INPUT: &str = "userInput";
pub const TEXT_RESPONSE: &str = "textResponse";
pub const MEDIA_BLOCK: &str = "mediaBlock";
pub const TYPING_DELAY: &str = "typingDelay";
pub const CONVERSATIONAL_FORM: &str = "conversationalForm";
pub const JSON_API_INTEGRATION: &str = "jsonApiIntegration";
pub const LINK_STORY: &str = "linkStory";

/// Delay used when a typing delay block does not specify one.
pub const DEFAULT_DELAY_SECONDS: f64 = 1.0;

/// Editor canvas coordinates. Irrelevant to execution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A node in the conversation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub position: Position,
    pub kind: BlockKind,
}

/// The variant-specific payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    UserInput(UserInputMatcher),
    TextResponse(TextResponse),
    Media(MediaContent),
    TypingDelay { delay_seconds: f64 },
    ConversationalForm(ConversationalForm),
    JsonApiIntegration(JsonApiIntegration),
    LinkStory {
        story_id: String,
        story_name: Option<String>,
    },
    /// A block type this crate does not interpret. It is kept so that the graph
    /// survives a round trip, and it produces no response during execution.
    Unsupported { type_name: String },
}

impl BlockKind {
    /// The wire name of this variant (the `type` field of the JSON form).
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::UserInput(_) => USER_INPUT,
            BlockKind::TextResponse(_) => TEXT_RESPONSE,
            BlockKind::Media(_) => MEDIA_BLOCK,
            BlockKind::TypingDelay { .. } => TYPING_DELAY,
            BlockKind::ConversationalForm(_) => CONVERSATIONAL_FORM,
            BlockKind::JsonApiIntegration(_) => JSON_API_INTEGRATION,
            BlockKind::LinkStory { .. } => LINK_STORY,
            BlockKind::Unsupported { type_name } => type_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextResponse {
    pub content: String,
    pub alternate_responses: Vec<String>,
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl QuickReply {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            value: None,
        }
    }

    /// Whether the typed text names this reply, either by its label or by its value.
    pub fn is_named_by(&self, normalized: &str) -> bool {
        self.text.trim().to_lowercase() == normalized
            || self
                .value
                .as_deref()
                .is_some_and(|v| v.trim().to_lowercase() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Text,
    Image,
    Video,
    File,
    Audio,
    ImageSlider,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::File => "file",
            MediaType::Audio => "audio",
            MediaType::ImageSlider => "Image Slider",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(MediaType::Text),
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            "file" => Some(MediaType::File),
            "audio" => Some(MediaType::Audio),
            "Image Slider" | "imageSlider" => Some(MediaType::ImageSlider),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaContent {
    pub media_type: MediaType,
    /// The text of a `text` media block.
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_name: Option<String>,
    pub slides: Vec<ImageSlide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlide {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationalForm {
    pub form_id: String,
    pub form_name: Option<String>,
    pub form_fields: Vec<FormField>,
    pub welcome_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub prompt_phrase: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JsonApiIntegration {
    pub api_endpoint: String,
    pub request_type: String,
    pub api_headers: Vec<ApiHeader>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHeader {
    pub key: String,
    pub value: String,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            kind,
        }
    }

    /// Places the block on the editor canvas.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn user_input(id: impl Into<String>, matcher: UserInputMatcher) -> Self {
        Self::new(id, BlockKind::UserInput(matcher))
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::TextResponse(TextResponse {
                content: content.into(),
                ..TextResponse::default()
            }),
        )
    }

    pub fn text_with_replies<I, S>(id: impl Into<String>, content: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let block_id = id.into();
        let quick_replies = replies
            .into_iter()
            .enumerate()
            .map(|(i, text)| QuickReply::new(format!("{}-reply-{}", block_id, i), text))
            .collect();
        Self::new(
            block_id,
            BlockKind::TextResponse(TextResponse {
                content: content.into(),
                alternate_responses: Vec::new(),
                quick_replies,
            }),
        )
    }

    /// A zero delay is replaced by [`DEFAULT_DELAY_SECONDS`], as when loading a document.
    pub fn delay(id: impl Into<String>, delay_seconds: f64) -> Self {
        let delay_seconds = if delay_seconds == 0.0 {
            DEFAULT_DELAY_SECONDS
        } else {
            delay_seconds
        };
        Self::new(id, BlockKind::TypingDelay { delay_seconds })
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn sub_type(&self) -> Option<&'static str> {
        match &self.kind {
            BlockKind::UserInput(matcher) => Some(matcher.sub_type()),
            _ => None,
        }
    }

    /// The quick replies of a text response block; empty for every other variant.
    pub fn quick_replies(&self) -> &[QuickReply] {
        match &self.kind {
            BlockKind::TextResponse(text) => &text.quick_replies,
            _ => &[],
        }
    }

    pub fn is_user_input(&self) -> bool {
        matches!(self.kind, BlockKind::UserInput(_))
    }
}
