use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::markdown;

use crate::draft::EmailDraft;

/// Callback data carried by the single "Send" button.
pub const CONFIRM_SEND: &str = "confirm-send";

/// Renders a draft as a MarkdownV2 email preview plus the one inline control
/// that triggers the send. Pure formatting; storing the draft first is the
/// caller's job.
pub fn present(
    draft: &EmailDraft,
    author_name: &str,
    recipient: &str,
) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "📧 *Email draft*\n\n\
         *To:* {}\n\
         *Subject:* {}\n\n\
         Dear Team,\n\n\
         {}\n\n\
         Best regards,\n{}",
        markdown::escape(recipient),
        markdown::escape(&draft.subject),
        markdown::escape(&draft.body),
        markdown::escape(author_name),
    );

    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "📤 Send email",
        CONFIRM_SEND,
    )]]);

    (text, keyboard)
}

/// Wraps a snippet for the /code command.
pub fn code_block(snippet: &str) -> String {
    format!(
        "Here is your formatted code:\n{}",
        markdown::code_block(snippet)
    )
}
