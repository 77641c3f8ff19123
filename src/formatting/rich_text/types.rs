// src/formatting/rich_text/types.rs
//! Type definitions for inline rich text output.

use super::annotations::{html_escape, HtmlStyleRenderer};
use crate::types::{Color, ValidatedUrl};

/// Text styling options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
    pub link: Option<ValidatedUrl>,
}

/// One piece of a rendered text block.
///
/// Keys are stable per position: the `n`th keyed fragment of block `key`
/// is always `"{key}-{n}"`.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineFragment {
    /// A run of text sharing one style.
    Span {
        key: String,
        text: String,
        style: TextStyle,
    },
    /// An inline equation, kept as its source expression.
    Equation { key: String, expression: String },
    /// A hard line break inside the text.
    LineBreak { key: String },
    /// Marks where a short-form rendering was cut off.
    Ellipsis,
}

impl InlineFragment {
    pub fn key(&self) -> Option<&str> {
        match self {
            InlineFragment::Span { key, .. }
            | InlineFragment::Equation { key, .. }
            | InlineFragment::LineBreak { key } => Some(key),
            InlineFragment::Ellipsis => None,
        }
    }

    /// Visible text of the fragment, without markup.
    pub fn plain_text(&self) -> &str {
        match self {
            InlineFragment::Span { text, .. } => text,
            InlineFragment::Equation { expression, .. } => expression,
            InlineFragment::LineBreak { .. } => "\n",
            InlineFragment::Ellipsis => ELLIPSIS,
        }
    }

    /// HTML for this fragment; text is escaped.
    pub fn to_html(&self) -> String {
        match self {
            InlineFragment::Span { text, style, .. } => {
                HtmlStyleRenderer::apply_styles(text, style, true)
            }
            InlineFragment::Equation { expression, .. } => format!(
                "<span class=\"notion-equation\">{}</span>",
                html_escape(expression)
            ),
            InlineFragment::LineBreak { .. } => "<br />".to_string(),
            InlineFragment::Ellipsis => ELLIPSIS.to_string(),
        }
    }
}

pub(super) const ELLIPSIS: &str = "...";
