//! Conversation history and the turn loop on top of a [`ChatBackend`].
//!
//! [`ChatBackend`]: streamchat_api::ChatBackend

pub mod conversation;
pub mod memory;

pub use conversation::{Conversation, Turn};
pub use memory::Memory;
