use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{BlockId, RichTextItem};
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// The block types a blog post is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Heading(HeadingBlock),
    BulletedListItem(BulletedListItemBlock),
    NumberedListItem(NumberedListItemBlock),
    Quote(QuoteBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    Image(ImageBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// A paragraph holding `rich_text`.
    pub fn paragraph(rich_text: Vec<RichTextItem>) -> Self {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::default(),
            content: TextBlockContent::new(rich_text),
        })
    }

    /// A heading of the given level (clamped to 1..=3).
    pub fn heading(level: u8, rich_text: Vec<RichTextItem>) -> Self {
        Block::Heading(HeadingBlock {
            common: BlockCommon::default(),
            level: level.clamp(1, 3),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn divider() -> Self {
        Block::Divider(DividerBlock::default())
    }

    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// Replaces the children, keeping `has_children` in sync.
    pub fn set_children(&mut self, children: Vec<Block>) {
        let common = self.common_mut();
        common.has_children = !children.is_empty();
        common.children = children;
    }

    /// The block's own rich text; empty for blocks that carry none.
    pub fn rich_text(&self) -> &[RichTextItem] {
        match self {
            Block::Paragraph(b) => &b.content.rich_text,
            Block::Heading(b) => &b.content.rich_text,
            Block::BulletedListItem(b) => &b.content.rich_text,
            Block::NumberedListItem(b) => &b.content.rich_text,
            Block::Quote(b) => &b.content.rich_text,
            Block::Code(b) => &b.content.rich_text,
            Block::Image(b) => &b.caption,
            Block::Divider(_) | Block::Unsupported(_) => &[],
        }
    }

    pub fn has_text(&self) -> bool {
        self.rich_text()
            .iter()
            .any(|item| !item.plain_text.is_empty())
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider(_))
    }

    /// Notion API type name of the block.
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading(b) => match b.level {
                1 => "heading_1",
                2 => "heading_2",
                _ => "heading_3",
            },
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::Quote(_) => "quote",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::Image(_) => "image",
            Block::Unsupported(_) => "unsupported",
        }
    }

    /// Accept a visitor
    pub fn accept<V: BlockVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Block::Paragraph(b) => visitor.visit_paragraph(self, &b.content),
            Block::Heading(b) => visitor.visit_heading(self, b.level, &b.content),
            Block::BulletedListItem(b) => visitor.visit_bulleted_list_item(self, &b.content),
            Block::NumberedListItem(b) => visitor.visit_numbered_list_item(self, &b.content),
            Block::Quote(b) => visitor.visit_quote(self, &b.content),
            Block::Code(b) => visitor.visit_code(self, b),
            Block::Divider(_) => visitor.visit_divider(self),
            Block::Image(b) => visitor.visit_image(self, b),
            Block::Unsupported(b) => visitor.visit_unsupported(self, &b.block_type),
        }
    }
}

/// Visitor trait for traversing block structures.
///
/// All methods default to `Default::default()`, so implementors only
/// override the block types they care about. Each method receives the whole
/// block so visitors can reach its children.
pub trait BlockVisitor {
    type Output: Default;

    fn visit_paragraph(&mut self, _block: &Block, _content: &TextBlockContent) -> Self::Output {
        Default::default()
    }
    fn visit_heading(
        &mut self,
        _block: &Block,
        _level: u8,
        _content: &TextBlockContent,
    ) -> Self::Output {
        Default::default()
    }
    fn visit_bulleted_list_item(
        &mut self,
        _block: &Block,
        _content: &TextBlockContent,
    ) -> Self::Output {
        Default::default()
    }
    fn visit_numbered_list_item(
        &mut self,
        _block: &Block,
        _content: &TextBlockContent,
    ) -> Self::Output {
        Default::default()
    }
    fn visit_quote(&mut self, _block: &Block, _content: &TextBlockContent) -> Self::Output {
        Default::default()
    }
    fn visit_code(&mut self, _block: &Block, _code: &CodeBlock) -> Self::Output {
        Default::default()
    }
    fn visit_divider(&mut self, _block: &Block) -> Self::Output {
        Default::default()
    }
    fn visit_image(&mut self, _block: &Block, _image: &ImageBlock) -> Self::Output {
        Default::default()
    }
    fn visit_unsupported(&mut self, _block: &Block, _block_type: &str) -> Self::Output {
        Default::default()
    }
}
