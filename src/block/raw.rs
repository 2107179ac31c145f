use super::*;
use crate::error::BlockError;
use serde::{Deserialize, Serialize};

/// The loose, JSON-facing shape of a block: an id, a `type` tag and every payload
/// field any variant may carry, all optional.
///
/// Converting a `RawBlock` into a [`Block`] is where structural validation happens:
/// required fields must be present and no field may appear on a type it does not
/// belong to. Converting back is infallible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,

    // userInput
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_groups: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase_text: Option<String>,

    // textResponse (and text mediaBlock content)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_responses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReply>>,

    // mediaBlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<ImageSlide>>,

    // typingDelay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<f64>,

    // conversationalForm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<Vec<FormField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,

    // jsonApiIntegration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_headers: Option<Vec<ApiHeader>>,

    // linkStory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_story_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_story_name: Option<String>,
}

type Owner = (&'static str, Option<&'static str>);

/// The block types (and, for user input, the subType) a payload field may appear on.
fn owners_of(field: &str) -> &'static [Owner] {
    match field {
        "subType" => &[(USER_INPUT, None)],
        "keywordGroups" => &[(USER_INPUT, Some(KEYWORD_GROUP))],
        "phraseText" => &[(USER_INPUT, Some(PHRASE))],
        // Text media blocks carry their text in `content` too.
        "content" => &[(TEXT_RESPONSE, None), (MEDIA_BLOCK, None)],
        "alternateResponses" | "quickReplies" => &[(TEXT_RESPONSE, None)],
        "mediaType" | "mediaUrl" | "mediaName" | "slides" => &[(MEDIA_BLOCK, None)],
        "delaySeconds" => &[(TYPING_DELAY, None)],
        "formId" | "formName" | "formFields" | "welcomeMessage" => &[(CONVERSATIONAL_FORM, None)],
        "apiEndpoint" | "requestType" | "apiHeaders" => &[(JSON_API_INTEGRATION, None)],
        _ => &[(LINK_STORY, None)],
    }
}

fn is_known_type(block_type: &str) -> bool {
    matches!(
        block_type,
        USER_INPUT
            | TEXT_RESPONSE
            | MEDIA_BLOCK
            | TYPING_DELAY
            | CONVERSATIONAL_FORM
            | JSON_API_INTEGRATION
            | LINK_STORY
    )
}

impl RawBlock {
    fn present_fields(&self) -> Vec<&'static str> {
        [
            ("subType", self.sub_type.is_some()),
            ("keywordGroups", self.keyword_groups.is_some()),
            ("phraseText", self.phrase_text.is_some()),
            ("content", self.content.is_some()),
            ("alternateResponses", self.alternate_responses.is_some()),
            ("quickReplies", self.quick_replies.is_some()),
            ("mediaType", self.media_type.is_some()),
            ("mediaUrl", self.media_url.is_some()),
            ("mediaName", self.media_name.is_some()),
            ("slides", self.slides.is_some()),
            ("delaySeconds", self.delay_seconds.is_some()),
            ("formId", self.form_id.is_some()),
            ("formName", self.form_name.is_some()),
            ("formFields", self.form_fields.is_some()),
            ("welcomeMessage", self.welcome_message.is_some()),
            ("apiEndpoint", self.api_endpoint.is_some()),
            ("requestType", self.request_type.is_some()),
            ("apiHeaders", self.api_headers.is_some()),
            ("linkStoryId", self.link_story_id.is_some()),
            ("linkStoryName", self.link_story_name.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    /// Rejects payload fields that do not belong to the declared type.
    ///
    /// Blocks of a type this crate does not interpret are not checked; their payload is dropped.
    fn check_orphan_fields(&self) -> Result<(), BlockError> {
        if !is_known_type(&self.block_type) {
            return Ok(());
        }
        for field in self.present_fields() {
            let owned = owners_of(field).iter().any(|(owner_type, owner_sub_type)| {
                *owner_type == self.block_type
                    && owner_sub_type.is_none_or(|sub| self.sub_type.as_deref() == Some(sub))
            });
            if !owned {
                return Err(BlockError::OrphanField {
                    block_id: self.id.clone(),
                    block_type: self.block_type.clone(),
                    field,
                });
            }
        }
        Ok(())
    }

    fn missing(&self, field: &'static str) -> BlockError {
        BlockError::MissingField {
            block_id: self.id.clone(),
            block_type: self.block_type.clone(),
            field,
        }
    }

    fn build_kind(self) -> Result<BlockKind, BlockError> {
        let kind = match self.block_type.as_str() {
            USER_INPUT => {
                let sub_type = self.sub_type.as_deref().ok_or_else(|| self.missing("subType"))?;
                let matcher = match sub_type {
                    KEYWORD_GROUP => UserInputMatcher::KeywordGroups(
                        self.keyword_groups
                            .clone()
                            .ok_or_else(|| self.missing("keywordGroups"))?,
                    ),
                    PHRASE => UserInputMatcher::Phrase(
                        self.phrase_text
                            .clone()
                            .ok_or_else(|| self.missing("phraseText"))?,
                    ),
                    ANYTHING => UserInputMatcher::Anything,
                    other => {
                        return Err(BlockError::InvalidSubType {
                            block_id: self.id.clone(),
                            sub_type: other.to_string(),
                        });
                    }
                };
                BlockKind::UserInput(matcher)
            }
            TEXT_RESPONSE => BlockKind::TextResponse(TextResponse {
                content: self.content.unwrap_or_default(),
                alternate_responses: self.alternate_responses.unwrap_or_default(),
                quick_replies: self.quick_replies.unwrap_or_default(),
            }),
            MEDIA_BLOCK => {
                let name = self.media_type.as_deref().ok_or_else(|| self.missing("mediaType"))?;
                let media_type = MediaType::parse(name).ok_or_else(|| BlockError::InvalidValue {
                    block_id: self.id.clone(),
                    field: "mediaType",
                    message: format!("unknown media type '{}'", name),
                })?;
                BlockKind::Media(MediaContent {
                    media_type,
                    content: self.content,
                    media_url: self.media_url,
                    media_name: self.media_name,
                    slides: self.slides.unwrap_or_default(),
                })
            }
            TYPING_DELAY => {
                // A zero delay counts as unset.
                let delay_seconds = self
                    .delay_seconds
                    .filter(|d| *d != 0.0)
                    .unwrap_or(DEFAULT_DELAY_SECONDS);
                if !delay_seconds.is_finite() || delay_seconds < 0.0 {
                    return Err(BlockError::InvalidValue {
                        block_id: self.id,
                        field: "delaySeconds",
                        message: format!("{} is not a non-negative number of seconds", delay_seconds),
                    });
                }
                BlockKind::TypingDelay { delay_seconds }
            }
            CONVERSATIONAL_FORM => {
                let form_id = self.form_id.clone().ok_or_else(|| self.missing("formId"))?;
                BlockKind::ConversationalForm(ConversationalForm {
                    form_id,
                    form_name: self.form_name,
                    form_fields: self.form_fields.unwrap_or_default(),
                    welcome_message: self.welcome_message,
                })
            }
            JSON_API_INTEGRATION => {
                let api_endpoint = self
                    .api_endpoint
                    .clone()
                    .ok_or_else(|| self.missing("apiEndpoint"))?;
                BlockKind::JsonApiIntegration(JsonApiIntegration {
                    api_endpoint,
                    request_type: self.request_type.unwrap_or_else(|| "GET".to_string()),
                    api_headers: self.api_headers.unwrap_or_default(),
                })
            }
            LINK_STORY => {
                let story_id = self
                    .link_story_id
                    .clone()
                    .ok_or_else(|| self.missing("linkStoryId"))?;
                BlockKind::LinkStory {
                    story_id,
                    story_name: self.link_story_name,
                }
            }
            "" => return Err(self.missing("type")),
            other => BlockKind::Unsupported {
                type_name: other.to_string(),
            },
        };
        Ok(kind)
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(BlockError::EmptyId);
        }
        raw.check_orphan_fields()?;
        let id = raw.id.clone();
        let position = Position::new(raw.x, raw.y);
        let kind = raw.build_kind()?;
        Ok(Block { id, position, kind })
    }
}

impl From<&Block> for RawBlock {
    fn from(block: &Block) -> Self {
        let mut raw = RawBlock {
            id: block.id.clone(),
            block_type: block.type_name().to_string(),
            x: block.position.x,
            y: block.position.y,
            ..RawBlock::default()
        };
        match &block.kind {
            BlockKind::UserInput(matcher) => {
                raw.sub_type = Some(matcher.sub_type().to_string());
                match matcher {
                    UserInputMatcher::KeywordGroups(groups) => {
                        raw.keyword_groups = Some(groups.clone())
                    }
                    UserInputMatcher::Phrase(phrase) => raw.phrase_text = Some(phrase.clone()),
                    UserInputMatcher::Anything => {}
                }
            }
            BlockKind::TextResponse(text) => {
                raw.content = Some(text.content.clone());
                if !text.alternate_responses.is_empty() {
                    raw.alternate_responses = Some(text.alternate_responses.clone());
                }
                if !text.quick_replies.is_empty() {
                    raw.quick_replies = Some(text.quick_replies.clone());
                }
            }
            BlockKind::Media(media) => {
                raw.media_type = Some(media.media_type.as_str().to_string());
                raw.content = media.content.clone();
                raw.media_url = media.media_url.clone();
                raw.media_name = media.media_name.clone();
                if !media.slides.is_empty() {
                    raw.slides = Some(media.slides.clone());
                }
            }
            BlockKind::TypingDelay { delay_seconds } => raw.delay_seconds = Some(*delay_seconds),
            BlockKind::ConversationalForm(form) => {
                raw.form_id = Some(form.form_id.clone());
                raw.form_name = form.form_name.clone();
                raw.form_fields = Some(form.form_fields.clone());
                raw.welcome_message = form.welcome_message.clone();
            }
            BlockKind::JsonApiIntegration(api) => {
                raw.api_endpoint = Some(api.api_endpoint.clone());
                raw.request_type = Some(api.request_type.clone());
                if !api.api_headers.is_empty() {
                    raw.api_headers = Some(api.api_headers.clone());
                }
            }
            BlockKind::LinkStory {
                story_id,
                story_name,
            } => {
                raw.link_story_id = Some(story_id.clone());
                raw.link_story_name = story_name.clone();
            }
            BlockKind::Unsupported { .. } => {}
        }
        raw
    }
}
