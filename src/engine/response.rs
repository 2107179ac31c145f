use crate::block::{Block, BlockKind, FormField, ImageSlide, QuickReply};
use serde::{Deserialize, Serialize};

/// Text emitted when a text response block has no content configured.
pub const EMPTY_TEXT_CONTENT: &str = "No message configured";

/// One typed item of the response sequence a channel renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    Text {
        content: String,
        #[serde(
            default,
            rename = "quickReplies",
            skip_serializing_if = "Vec::is_empty"
        )]
        quick_replies: Vec<QuickReply>,
    },
    Media { content: MediaPayload },
    Form { content: FormPayload },
    Delay { content: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPayload {
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slides: Vec<ImageSlide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPayload {
    pub form_id: String,
    #[serde(default)]
    pub form_name: Option<String>,
    pub fields: Vec<FormField>,
    pub welcome_message: Option<String>,
}

impl Response {
    pub fn text(content: impl Into<String>) -> Self {
        Response::Text {
            content: content.into(),
            quick_replies: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Response::Text { .. } => "text",
            Response::Media { .. } => "media",
            Response::Form { .. } => "form",
            Response::Delay { .. } => "delay",
        }
    }
}

/// Maps a block to what it says. A pure function of the block's content.
///
/// User input blocks only match, and block types without a runtime meaning say nothing;
/// in both cases the walk carries on to the successor.
pub fn respond_to(block: &Block) -> Option<Response> {
    match &block.kind {
        BlockKind::UserInput(_) => None,
        BlockKind::TextResponse(text) => {
            let content = if text.content.trim().is_empty() {
                EMPTY_TEXT_CONTENT.to_string()
            } else {
                text.content.clone()
            };
            Some(Response::Text {
                content,
                quick_replies: text.quick_replies.clone(),
            })
        }
        BlockKind::Media(media) => Some(Response::Media {
            content: MediaPayload {
                media_type: media.media_type.as_str().to_string(),
                content: media.content.clone(),
                media_url: media.media_url.clone(),
                media_name: media.media_name.clone(),
                slides: media.slides.clone(),
            },
        }),
        BlockKind::TypingDelay { delay_seconds } => Some(Response::Delay {
            content: *delay_seconds,
        }),
        BlockKind::ConversationalForm(form) => Some(Response::Form {
            content: FormPayload {
                form_id: form.form_id.clone(),
                form_name: form.form_name.clone(),
                fields: form.form_fields.clone(),
                welcome_message: form.welcome_message.clone(),
            },
        }),
        BlockKind::JsonApiIntegration(_)
        | BlockKind::LinkStory { .. }
        | BlockKind::Unsupported { .. } => None,
    }
}
