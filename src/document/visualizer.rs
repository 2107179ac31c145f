use super::RuntimeDocument;
use crate::block::{BlockKind, UserInputMatcher};
use itertools::Itertools;

/// Formats a runtime document into a human-readable listing for debugging.
pub fn visualize_document(document: &RuntimeDocument) -> String {
    let mut lines = vec![format!(
        "======== RUNTIME DOCUMENT: {} ========",
        document.name
    )];
    lines.push(format!("welcome: {:?}", document.welcome_message));

    for runtime_block in &document.blocks {
        let block = &runtime_block.block;
        lines.push(String::new());
        lines.push(format!(
            "[{}] {}{}",
            block.id,
            block.type_name(),
            block.sub_type().map(|s| format!("/{}", s)).unwrap_or_default()
        ));
        lines.push(format!("    {}", describe(&block.kind)));

        if runtime_block.outputs.is_empty() {
            lines.push("    -> (end)".to_string());
        }
        for output in &runtime_block.outputs {
            lines.push(format!("    -> {}", output.to_block_id));
        }
        for branch in runtime_block.quick_reply_outputs.iter().flatten() {
            let label = block
                .quick_replies()
                .get(branch.quick_reply_index)
                .map(|r| r.text.as_str())
                .unwrap_or("?");
            lines.push(format!(
                "    [{}] {:?} -> {}",
                branch.quick_reply_index, label, branch.to_block_id
            ));
        }
    }

    lines.push(String::new());
    lines.push("================ END OF DOCUMENT ================".to_string());
    lines.join("\n")
}

fn describe(kind: &BlockKind) -> String {
    match kind {
        BlockKind::UserInput(UserInputMatcher::KeywordGroups(groups)) => format!(
            "keywords: {}",
            groups
                .iter()
                .map(|g| format!("[{}]", g.iter().join(", ")))
                .join(" | ")
        ),
        BlockKind::UserInput(UserInputMatcher::Phrase(phrase)) => format!("phrase: {:?}", phrase),
        BlockKind::UserInput(UserInputMatcher::Anything) => "matches anything".to_string(),
        BlockKind::TextResponse(text) => {
            if text.quick_replies.is_empty() {
                format!("text: {:?}", text.content)
            } else {
                format!(
                    "text: {:?} replies: {}",
                    text.content,
                    text.quick_replies.iter().map(|r| &r.text).join(", ")
                )
            }
        }
        BlockKind::Media(media) => format!(
            "{}: {}",
            media.media_type.as_str(),
            media
                .media_url
                .as_deref()
                .or(media.content.as_deref())
                .unwrap_or("-")
        ),
        BlockKind::TypingDelay { delay_seconds } => format!("delay: {}s", delay_seconds),
        BlockKind::ConversationalForm(form) => format!(
            "form {} ({} fields)",
            form.form_id,
            form.form_fields.len()
        ),
        BlockKind::JsonApiIntegration(api) => format!("{} {}", api.request_type, api.api_endpoint),
        BlockKind::LinkStory { story_id, .. } => format!("story: {}", story_id),
        BlockKind::Unsupported { type_name } => format!("unsupported type '{}'", type_name),
    }
}
