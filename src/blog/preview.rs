//! Cuts a post's preview out of the top of its page.

use crate::constants::PREVIEW_BLOCK_SCAN_LIMIT;
use crate::model::Block;

/// Text blocks above the first divider among the first
/// [`PREVIEW_BLOCK_SCAN_LIMIT`] blocks.
///
/// Headings and blocks without text are left out. A page with no divider in
/// that window has no preview.
pub fn extract_preview(blocks: &[Block]) -> Vec<Block> {
    let window = &blocks[..blocks.len().min(PREVIEW_BLOCK_SCAN_LIMIT)];
    let Some(divider) = window.iter().position(Block::is_divider) else {
        return Vec::new();
    };

    window[..divider]
        .iter()
        .filter(|block| is_preview_text(block))
        .cloned()
        .collect()
}

fn is_preview_text(block: &Block) -> bool {
    let text_kind = matches!(
        block,
        Block::Paragraph(_)
            | Block::BulletedListItem(_)
            | Block::NumberedListItem(_)
            | Block::Quote(_)
    );
    text_kind && block.has_text()
}
