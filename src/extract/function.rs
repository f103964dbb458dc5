//! Function extraction from the sections of a module page

use super::dom::{Node, Scope};
use super::example::parse_examples;
use super::parameter::parse_parameters;
use super::FunctionDoc;
use crate::storage::NewFunction;

/// Selector for function-like sections
pub const FUNCTION_SECTIONS: &str = "section.function, section.detail";

const HEADING: &str = "h2, .detail-header";

/// Reads every function section of a module page, in document order
pub fn parse_functions(root: Node<'_>) -> Vec<FunctionDoc> {
    let sections = root.select_all(FUNCTION_SECTIONS);
    tracing::debug!("Found {} function sections", sections.len());
    sections.into_iter().filter_map(parse_function).collect()
}

/// Reads one function section; a section without a heading yields `None`
pub fn parse_function(section: Node<'_>) -> Option<FunctionDoc> {
    let Some(heading) = section.select_first(HEADING) else {
        tracing::debug!("Skipping function section without a heading");
        return None;
    };

    let mut label = heading.inline_text();
    if !label.contains('/') {
        if let Some(id) = section.attr("id").filter(|id| id.contains('/')) {
            label = id.to_string();
        }
    }

    let (name, arity) = parse_name_arity(&label);
    if name.is_empty() {
        tracing::debug!("Skipping function section with an empty heading");
        return None;
    }

    let summary = section
        .text_of(".docstring p")
        .or_else(|| section.text_of("p"))
        .unwrap_or_default();

    let function = NewFunction {
        name,
        arity,
        return_type: parse_return_type(section),
        summary,
        description: section.text_or_default(".docstring"),
    };

    Some(FunctionDoc {
        parameters: parse_parameters(section),
        examples: parse_examples(section),
        function,
    })
}

/// Splits a `name/arity` heading on its first `/`
///
/// The arity is the token after the slash, ending at the next `/` or
/// whitespace; when it is absent or not a non-negative integer the arity is 0.
pub fn parse_name_arity(label: &str) -> (String, u32) {
    match label.split_once('/') {
        Some((name, rest)) => {
            let token = rest
                .trim_start()
                .split(|c: char| c == '/' || c.is_whitespace())
                .next()
                .unwrap_or("");
            let arity = token.parse::<u32>().unwrap_or_else(|_| {
                tracing::debug!("Non-numeric arity {:?} in {:?}; using 0", token, label);
                0
            });
            (name.trim().to_string(), arity)
        }
        None => (label.trim().to_string(), 0),
    }
}

/// Text after the last `::` of the first typespec, or empty
fn parse_return_type(section: Node<'_>) -> String {
    section
        .select_first(".specs pre, .spec")
        .map(|spec| spec.inline_text())
        .and_then(|spec| {
            spec.rsplit_once("::")
                .map(|(_, returned)| returned.trim().to_string())
        })
        .unwrap_or_default()
}
