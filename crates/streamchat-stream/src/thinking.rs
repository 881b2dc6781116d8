//! Helpers applied to a finished response.
//!
//! Both helpers look at the first complete `<think>` ... `</think>` pair only.

use crate::segment::{THINK_END, THINK_START};

/// Byte range of the first complete thinking block, delimiters included
fn first_thinking_block(full: &str) -> Option<(usize, usize)> {
    let start = full.find(THINK_START)?;
    let after_start = start + THINK_START.len();
    let end = full[after_start..].find(THINK_END)?;
    Some((start, after_start + end + THINK_END.len()))
}

/// Return the first thinking block with its delimiters, trimmed, or an empty
/// string when the response has no complete block.
pub fn extract_thinking_segment(full: &str) -> String {
    match first_thinking_block(full) {
        Some((start, end)) => full[start..end].trim().to_string(),
        None => String::new(),
    }
}

/// Return the text after the first thinking block, trimmed. A response
/// without a complete block is returned unchanged.
pub fn strip_thinking_segment(full: &str) -> String {
    match first_thinking_block(full) {
        Some((_, end)) => full[end..].trim().to_string(),
        None => full.to_string(),
    }
}
