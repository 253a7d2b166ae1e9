use thiserror::Error;

/// Placeholder used when the user gives a subject line without a body.
pub const BODY_PLACEHOLDER: &str = "[No body provided]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("draft content is empty")]
    EmptyInput,
}

/// Builds a draft from the raw text following the /mail command.
///
/// Only the first line break splits subject from body; later line breaks
/// stay inside the body. Both fields are always non-empty: a missing or
/// blank body becomes [`BODY_PLACEHOLDER`].
///
/// The input is trimmed before splitting, so surrounding whitespace (and a
/// leading line break) never produces an empty subject.
pub fn build(content: &str) -> Result<EmailDraft, DraftError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DraftError::EmptyInput);
    }

    let (subject, body) = match content.split_once('\n') {
        Some((subject, rest)) if !rest.trim().is_empty() => (subject, rest),
        Some((subject, _)) => (subject, BODY_PLACEHOLDER),
        None => (content, BODY_PLACEHOLDER),
    };

    Ok(EmailDraft {
        subject: subject.to_string(),
        body: body.to_string(),
    })
}
