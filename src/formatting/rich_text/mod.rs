// src/formatting/rich_text/mod.rs
//! Turns a block's rich text into a keyed sequence of inline fragments.
//!
//! [`text_block`] is lazy: nothing is split or styled until the returned
//! iterator is advanced, and the iterator can be cloned to start over from
//! any point. In short form the sequence stops after
//! [`PREVIEW_SNIPPET_CHAR_LIMIT`] visible characters and ends with an
//! [`InlineFragment::Ellipsis`].

mod annotations;
mod handlers;
mod types;

pub use annotations::{annotations_to_style, html_escape, HtmlStyleRenderer};
pub use handlers::{handle_mention, MentionContent};
pub use types::{InlineFragment, TextStyle};

use crate::constants::PREVIEW_SNIPPET_CHAR_LIMIT;
use crate::model::Block;
use crate::types::{EquationData, Link, RichTextItem, RichTextType, ValidatedUrl};

/// Fragments of `block`'s own rich text.
///
/// `short_form` enables preview truncation. Fragment keys are derived from
/// `key`, which should be unique per rendered block.
pub fn text_block<'a>(block: &'a Block, short_form: bool, key: &str) -> InlineFragments<'a> {
    let limit = short_form.then_some(PREVIEW_SNIPPET_CHAR_LIMIT);
    rich_text_fragments(block.rich_text(), limit, key)
}

/// Fragments of a rich text run, cut after `limit` visible characters if set.
pub fn rich_text_fragments<'a>(
    items: &'a [RichTextItem],
    limit: Option<usize>,
    key: &str,
) -> InlineFragments<'a> {
    InlineFragments {
        items: items.iter(),
        run: None,
        key: key.to_string(),
        counter: 0,
        remaining: limit,
        cut: false,
        finished: false,
    }
}

/// Concatenated HTML of a fragment sequence.
pub fn render_inline_html<I>(fragments: I) -> String
where
    I: IntoIterator<Item = InlineFragment>,
{
    fragments.into_iter().map(|f| f.to_html()).collect()
}

/// HTML for one text block: inline with a trailing space in short form,
/// wrapped in a paragraph otherwise.
pub fn render_text_block_html(block: &Block, short_form: bool, key: &str) -> String {
    let inline = render_inline_html(text_block(block, short_form, key));
    if short_form {
        format!("{} ", inline)
    } else {
        format!("<p class=\"notion-text\">{}</p>", inline)
    }
}

/// Full-length inline HTML of a rich text run.
pub fn rich_text_to_html(items: &[RichTextItem], key: &str) -> String {
    render_inline_html(rich_text_fragments(items, None, key))
}

/// Lazy iterator over the fragments of one block.
#[derive(Debug, Clone)]
pub struct InlineFragments<'a> {
    items: std::slice::Iter<'a, RichTextItem>,
    run: Option<Run>,
    key: String,
    counter: usize,
    /// Visible characters left before the cut; `None` never cuts.
    remaining: Option<usize>,
    cut: bool,
    finished: bool,
}

/// The part of a text item not yet emitted.
#[derive(Debug, Clone)]
struct Run {
    text: String,
    pos: usize,
    style: TextStyle,
    pending_break: bool,
}

enum Piece {
    Text(String, TextStyle),
    Break,
    Equation(String),
}

impl InlineFragments<'_> {
    fn next_key(&mut self) -> String {
        let key = format!("{}-{}", self.key, self.counter);
        self.counter += 1;
        key
    }

    /// Charges `text` against the budget. Returns how many chars may be
    /// kept when it doesn't fit.
    fn take_budget(&mut self, text: &str) -> Option<usize> {
        let remaining = self.remaining.as_mut()?;
        let count = text.chars().count();
        if count <= *remaining {
            *remaining -= count;
            None
        } else {
            let keep = *remaining;
            *remaining = 0;
            Some(keep)
        }
    }

    /// Next raw piece, splitting text items on newlines.
    fn next_piece(&mut self) -> Option<Piece> {
        loop {
            if let Some(run) = self.run.as_mut() {
                if run.pending_break {
                    run.pending_break = false;
                    return Some(Piece::Break);
                }

                let newline = run.text[run.pos..].find('\n');
                match newline {
                    Some(offset) => {
                        let segment = run.text[run.pos..run.pos + offset].to_string();
                        run.pos += offset + 1;
                        run.pending_break = true;
                        if !segment.is_empty() {
                            return Some(Piece::Text(segment, run.style.clone()));
                        }
                    }
                    None => {
                        let segment = run.text[run.pos..].to_string();
                        let style = run.style.clone();
                        self.run = None;
                        if !segment.is_empty() {
                            return Some(Piece::Text(segment, style));
                        }
                    }
                }
                continue;
            }

            let item = self.items.next()?;
            match &item.text_type {
                RichTextType::Equation(EquationData { expression }) => {
                    return Some(Piece::Equation(expression.clone()));
                }
                RichTextType::Text { content, link } => {
                    let mut style = annotations_to_style(&item.annotations);
                    style.link = link
                        .as_ref()
                        .map(|Link { url }| url.as_str())
                        .or(item.href.as_deref())
                        .and_then(|url| ValidatedUrl::parse(url).ok());
                    self.run = Some(Run {
                        text: content.clone(),
                        pos: 0,
                        style,
                        pending_break: false,
                    });
                }
                RichTextType::Mention(mention) => {
                    let content = handle_mention(mention, &item.plain_text);
                    let mut style = annotations_to_style(&item.annotations);
                    style.link = content.link;
                    self.run = Some(Run {
                        text: content.text,
                        pos: 0,
                        style,
                        pending_break: false,
                    });
                }
            }
        }
    }
}

impl Iterator for InlineFragments<'_> {
    type Item = InlineFragment;

    fn next(&mut self) -> Option<InlineFragment> {
        loop {
            if self.finished {
                return None;
            }
            if self.cut {
                self.finished = true;
                return Some(InlineFragment::Ellipsis);
            }

            let Some(piece) = self.next_piece() else {
                self.finished = true;
                return None;
            };

            match piece {
                Piece::Break => {
                    return Some(InlineFragment::LineBreak {
                        key: self.next_key(),
                    })
                }
                Piece::Text(text, style) => {
                    let text = match self.take_budget(&text) {
                        None => text,
                        Some(keep) => {
                            self.cut = true;
                            let kept: String = text.chars().take(keep).collect();
                            if kept.is_empty() {
                                continue;
                            }
                            kept
                        }
                    };
                    return Some(InlineFragment::Span {
                        key: self.next_key(),
                        text,
                        style,
                    });
                }
                Piece::Equation(expression) => {
                    if self.take_budget(&expression).is_some() {
                        self.cut = true;
                        continue;
                    }
                    return Some(InlineFragment::Equation {
                        key: self.next_key(),
                        expression,
                    });
                }
            }
        }
    }
}

impl std::iter::FusedIterator for InlineFragments<'_> {}
