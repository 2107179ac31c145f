use serde::{Deserialize, Serialize};

pub const KEYWORD_GROUP: &str = "keywordGroup";
pub const PHRASE: &str = "phrase";
pub const ANYTHING: &str = "anything";

/// How a `userInput` block decides whether it accepts a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserInputMatcher {
    /// Matches when any keyword of any group occurs in the message.
    KeywordGroups(Vec<Vec<String>>),
    /// Matches when the phrase occurs in the message.
    Phrase(String),
    /// Matches every message.
    Anything,
}

impl UserInputMatcher {
    pub fn keywords<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        UserInputMatcher::KeywordGroups(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn phrase(text: impl Into<String>) -> Self {
        UserInputMatcher::Phrase(text.into())
    }

    pub fn sub_type(&self) -> &'static str {
        match self {
            UserInputMatcher::KeywordGroups(_) => KEYWORD_GROUP,
            UserInputMatcher::Phrase(_) => PHRASE,
            UserInputMatcher::Anything => ANYTHING,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, UserInputMatcher::Anything)
    }

    /// Tests a message that has already been through [`normalize_message`].
    ///
    /// Matching is a case-insensitive substring test. Blank keywords and an empty
    /// phrase never match, otherwise they would accept every message.
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            UserInputMatcher::KeywordGroups(groups) => groups
                .iter()
                .flatten()
                .map(|keyword| keyword.to_lowercase())
                .any(|keyword| !keyword.trim().is_empty() && normalized.contains(&keyword)),
            UserInputMatcher::Phrase(phrase) => {
                !phrase.trim().is_empty() && normalized.contains(&phrase.to_lowercase())
            }
            UserInputMatcher::Anything => true,
        }
    }
}

/// Trims and lower-cases a user message before matching.
pub fn normalize_message(message: &str) -> String {
    message.trim().to_lowercase()
}
