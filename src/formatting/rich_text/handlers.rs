// src/formatting/rich_text/handlers.rs
//! Turns mentions into the text and link they render as.

use crate::types::{DateValue, MentionData, MentionType, ValidatedUrl};

/// What a mention renders as: visible text plus an optional link target.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionContent {
    pub text: String,
    pub link: Option<ValidatedUrl>,
}

/// Resolves a mention; `plain_text` is Notion's own rendering of it.
pub fn handle_mention(mention: &MentionData, plain_text: &str) -> MentionContent {
    match &mention.mention_type {
        MentionType::User { user } => MentionContent {
            text: non_empty(plain_text)
                .unwrap_or_else(|| format!("@{}", user.name.as_deref().unwrap_or(&user.id))),
            link: None,
        },
        MentionType::Page { page } => MentionContent {
            text: non_empty(plain_text).unwrap_or_else(|| "Untitled".to_string()),
            link: ValidatedUrl::parse(&format!("https://www.notion.so/{}", page.id.as_str())).ok(),
        },
        MentionType::Date { date } => MentionContent {
            text: non_empty(plain_text).unwrap_or_else(|| date_text(date)),
            link: None,
        },
        MentionType::Link { url } => MentionContent {
            text: non_empty(plain_text).unwrap_or_else(|| url.clone()),
            link: ValidatedUrl::parse(url).ok(),
        },
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn date_text(date: &DateValue) -> String {
    match date.end {
        Some(end) => format!("{} → {}", date.start, end),
        None => date.start.to_string(),
    }
}
