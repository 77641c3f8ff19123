// src/formatting/mod.rs
//! Renders Notion blocks and rich text into HTML.

pub mod block_renderer;
pub mod rich_text;

pub use block_renderer::render_blocks_html;
pub use rich_text::{
    render_inline_html, render_text_block_html, text_block, InlineFragment, InlineFragments,
    TextStyle,
};
