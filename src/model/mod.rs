//! Domain model: posts, users and the blocks a post is made of.

mod block;
pub mod blocks;
pub mod common;
mod post;
mod user;

pub use block::{Block, BlockVisitor};
pub use blocks::*;
pub use common::*;
pub use post::{BlogIndex, Post, PostRecord};
pub use user::{UserDirectory, UserRecord};
