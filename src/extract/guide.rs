//! Guide extraction for readme, guide and extras pages

use super::dom::{Node, Scope};
use crate::storage::{NewGuide, Storage, StorageResult};

const UNKNOWN_GUIDE: &str = "Unknown Guide";

/// Reads the title heading and the full text of the content container
pub fn parse_guide(root: Node<'_>, url: &str) -> NewGuide {
    let title = root
        .select_first("h1")
        .map(|h1| h1.inline_text())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_GUIDE.to_string());

    let content = root
        .text_of("#content")
        .or_else(|| root.text_of("main"))
        .unwrap_or_else(|| {
            tracing::debug!("No content container on {}", url);
            String::new()
        });

    NewGuide {
        title,
        url: url.to_string(),
        content,
    }
}

/// Parses a guide page and inserts it under `application_id`
pub fn extract_guide<S: Storage + ?Sized>(
    root: Node<'_>,
    url: &str,
    application_id: i64,
    storage: &mut S,
) -> StorageResult<i64> {
    let guide = parse_guide(root, url);
    let id = storage.insert_guide(application_id, &guide)?;
    tracing::info!("Inserted guide: {} (ID: {})", guide.title, id);
    Ok(id)
}
