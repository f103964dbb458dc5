//! Example extraction from a function section's code blocks

use super::dom::{Node, Scope};
use crate::storage::NewExample;

/// Reads one example per code block, with the preceding paragraph as its
/// description
///
/// Code blocks come from `section.examples`; when a section has none, code
/// blocks inside its docstring are used instead. Empty blocks are skipped.
pub fn parse_examples(section: Node<'_>) -> Vec<NewExample> {
    let mut blocks = section.select_all("section.examples pre");
    if blocks.is_empty() {
        blocks = section.select_all(".docstring pre");
    }

    blocks
        .into_iter()
        .filter_map(|block| {
            let code = block.text();
            if code.is_empty() {
                return None;
            }
            let description = block
                .previous_sibling_named("p")
                .map(|p| p.text())
                .unwrap_or_default();
            Some(NewExample { code, description })
        })
        .collect()
}
