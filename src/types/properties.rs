use super::{Color, PageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of rich text content.
///
/// Each variant carries its specific data, so a mention can't exist without
/// mention data and an equation can't exist without an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention(MentionData),
    Equation(EquationData),
}

/// Rich text item with formatting annotations.
///
/// `plain_text` is the fallback rendering for any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item — the most common rich text variant.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// Same text with different annotations.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Same text, linked to `url`.
    pub fn with_link(mut self, url: &str) -> Self {
        if let RichTextType::Text { link, .. } = &mut self.text_type {
            *link = Some(Link {
                url: url.to_string(),
            });
        }
        self.href = Some(url.to_string());
        self
    }
}

/// Joins the plain text of a run of rich text items.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }
}

/// Date value with optional end date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: chrono::NaiveDate,
    pub end: Option<chrono::NaiveDate>,
    pub time_zone: Option<String>,
}

/// Partial user representation (people properties and mentions)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl fmt::Display for PartialUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "User {}", self.id),
        }
    }
}

/// Mention data with type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentionData {
    pub mention_type: MentionType,
}

/// Mentions the blog knows how to render inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MentionType {
    User { user: PartialUser },
    Page { page: PageReference },
    Date { date: DateValue },
    Link { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageReference {
    pub id: PageId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquationData {
    pub expression: String,
}
