//! Parameter extraction from a function section's parameter list

use super::dom::{Node, Scope};
use crate::storage::NewParameter;

/// Reads one parameter per `section.params li`; items without a name are
/// skipped
pub fn parse_parameters(section: Node<'_>) -> Vec<NewParameter> {
    section
        .select_all("section.params li")
        .into_iter()
        .filter_map(parse_parameter)
        .collect()
}

fn parse_parameter(item: Node<'_>) -> Option<NewParameter> {
    let raw_name = item.text_of("span.name").filter(|n| !n.is_empty());
    let Some(raw_name) = raw_name else {
        tracing::debug!("Skipping parameter item without a name");
        return None;
    };

    // `opts \\ []` carries its default inline
    let (name, inline_default) = match raw_name.split_once("\\\\") {
        Some((name, default)) => (name.trim().to_string(), default.trim().to_string()),
        None => (raw_name, String::new()),
    };

    let default_value = item
        .text_of("span.default")
        .filter(|d| !d.is_empty())
        .unwrap_or(inline_default);

    Some(NewParameter {
        name,
        param_type: item.text_or_default("span.type"),
        default_value,
        description: item.text_or_default("p"),
    })
}
