// src/formatting/block_renderer.rs
//! Block rendering engine: turns a post's block tree into HTML.
//!
//! Consecutive list items of the same kind share one `<ul>`/`<ol>`; nested
//! children are rendered inside their parent.

use super::rich_text::{html_escape, render_text_block_html, rich_text_to_html};
use crate::model::{Block, BlockVisitor, CodeBlock, ImageBlock, TextBlockContent};

/// Renders a slice of blocks into HTML.
pub fn render_blocks_html(blocks: &[Block]) -> String {
    let mut renderer = HtmlBlockRenderer;
    renderer.render_sequence(blocks)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    fn of(block: &Block) -> Option<Self> {
        match block {
            Block::BulletedListItem(_) => Some(ListKind::Bulleted),
            Block::NumberedListItem(_) => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

struct HtmlBlockRenderer;

impl HtmlBlockRenderer {
    fn render_sequence(&mut self, blocks: &[Block]) -> String {
        let mut output = String::new();
        let mut open_list: Option<ListKind> = None;

        for block in blocks {
            let kind = ListKind::of(block);
            if open_list != kind {
                if let Some(list) = open_list {
                    output.push_str(&format!("</{}>", list.tag()));
                }
                if let Some(list) = kind {
                    output.push_str(&format!("<{}>", list.tag()));
                }
                open_list = kind;
            }
            output.push_str(&block.accept(self));
        }

        if let Some(list) = open_list {
            output.push_str(&format!("</{}>", list.tag()));
        }
        output
    }

    /// Children of a non-list block, indented under it.
    fn render_children(&mut self, block: &Block) -> String {
        if block.children().is_empty() {
            return String::new();
        }
        format!(
            "<div class=\"notion-block-children\">{}</div>",
            self.render_sequence(block.children())
        )
    }

    fn render_list_item(&mut self, block: &Block, content: &TextBlockContent) -> String {
        format!(
            "<li>{}{}</li>",
            rich_text_to_html(&content.rich_text, block.id().as_str()),
            self.render_sequence(block.children())
        )
    }
}

impl BlockVisitor for HtmlBlockRenderer {
    type Output = String;

    fn visit_paragraph(&mut self, block: &Block, _content: &TextBlockContent) -> String {
        format!(
            "{}{}",
            render_text_block_html(block, false, block.id().as_str()),
            self.render_children(block)
        )
    }

    fn visit_heading(&mut self, block: &Block, level: u8, content: &TextBlockContent) -> String {
        format!(
            "<h{level}>{}</h{level}>{}",
            rich_text_to_html(&content.rich_text, block.id().as_str()),
            self.render_children(block),
            level = level
        )
    }

    fn visit_bulleted_list_item(&mut self, block: &Block, content: &TextBlockContent) -> String {
        self.render_list_item(block, content)
    }

    fn visit_numbered_list_item(&mut self, block: &Block, content: &TextBlockContent) -> String {
        self.render_list_item(block, content)
    }

    fn visit_quote(&mut self, block: &Block, content: &TextBlockContent) -> String {
        format!(
            "<blockquote>{}{}</blockquote>",
            rich_text_to_html(&content.rich_text, block.id().as_str()),
            self.render_sequence(block.children())
        )
    }

    fn visit_code(&mut self, _block: &Block, code: &CodeBlock) -> String {
        let source: String = code
            .content
            .rich_text
            .iter()
            .map(|item| item.plain_text.as_str())
            .collect();
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            html_escape(&code.language),
            html_escape(&source)
        )
    }

    fn visit_divider(&mut self, _block: &Block) -> String {
        "<hr />".to_string()
    }

    fn visit_image(&mut self, _block: &Block, image: &ImageBlock) -> String {
        let alt: String = image
            .caption
            .iter()
            .map(|item| item.plain_text.as_str())
            .collect();
        format!(
            "<img src=\"{}\" alt=\"{}\" />",
            html_escape(&image.url),
            html_escape(&alt)
        )
    }

    fn visit_unsupported(&mut self, block: &Block, block_type: &str) -> String {
        log::debug!(
            "Skipping unsupported block {} of type '{}'",
            block.id(),
            block_type
        );
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::blocks::*;
    use crate::model::common::BlockCommon;
    use crate::types::{Annotations, RichTextItem};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Vec<RichTextItem> {
        vec![RichTextItem::plain_text(s)]
    }

    fn bullet(s: &str) -> Block {
        Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::default(),
            content: TextBlockContent::new(text(s)),
        })
    }

    fn numbered(s: &str) -> Block {
        Block::NumberedListItem(NumberedListItemBlock {
            common: BlockCommon::default(),
            content: TextBlockContent::new(text(s)),
        })
    }

    #[test]
    fn test_headings_paragraphs_and_dividers() {
        let blocks = vec![
            Block::heading(2, text("Intro")),
            Block::paragraph(vec![
                RichTextItem::plain_text("Hi "),
                RichTextItem::plain_text("there").with_annotations(Annotations::italic()),
            ]),
            Block::divider(),
        ];
        assert_eq!(
            render_blocks_html(&blocks),
            "<h2>Intro</h2><p class=\"notion-text\">Hi <em>there</em></p><hr />"
        );
    }

    #[test]
    fn test_consecutive_list_items_share_a_list() {
        let blocks = vec![
            bullet("a"),
            bullet("b"),
            numbered("one"),
            Block::paragraph(text("after")),
        ];
        assert_eq!(
            render_blocks_html(&blocks),
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p class=\"notion-text\">after</p>"
        );
    }

    #[test]
    fn test_nested_list_items() {
        let mut parent = bullet("parent");
        parent.set_children(vec![numbered("child")]);
        assert_eq!(
            render_blocks_html(&[parent]),
            "<ul><li>parent<ol><li>child</li></ol></li></ul>"
        );
    }

    #[test]
    fn test_code_image_and_unsupported() {
        let blocks = vec![
            Block::Code(CodeBlock {
                common: BlockCommon::default(),
                content: TextBlockContent::new(text("if a < b {}")),
                language: "rust".to_string(),
            }),
            Block::Image(ImageBlock {
                common: BlockCommon::default(),
                url: "https://example.com/cat.png".to_string(),
                caption: text("A cat"),
            }),
            Block::Unsupported(UnsupportedBlock {
                common: BlockCommon::default(),
                block_type: "table".to_string(),
            }),
        ];
        insta::assert_snapshot!(
            render_blocks_html(&blocks),
            @r#"<pre><code class="language-rust">if a &lt; b {}</code></pre><img src="https://example.com/cat.png" alt="A cat" />"#
        );
    }

    #[test]
    fn test_quote() {
        let blocks = vec![Block::Quote(QuoteBlock {
            common: BlockCommon::default(),
            content: TextBlockContent::new(text("Stay hungry")),
        })];
        assert_eq!(
            render_blocks_html(&blocks),
            "<blockquote>Stay hungry</blockquote>"
        );
    }
}
