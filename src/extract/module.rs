//! Module extraction: one module row plus its function hierarchy

use super::dom::{Node, Scope};
use super::function::parse_functions;
use super::{EntityCounts, ModuleDoc};
use crate::storage::{NewModule, Storage, StorageResult};

const UNKNOWN_MODULE: &str = "Unknown Module";

/// Reads a module page into its module row and function sections
pub fn parse_module(root: Node<'_>, url: &str, app_name: &str) -> ModuleDoc {
    let name = root
        .select_first("h1")
        .map(|h1| strip_app_suffix(&h1.inline_text(), app_name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            tracing::debug!("No module heading on {}", url);
            UNKNOWN_MODULE.to_string()
        });

    let description = root
        .text_of("#moduledoc")
        .or_else(|| root.text_of("section.docstring"))
        .unwrap_or_else(|| {
            tracing::debug!("No module docstring on {}", url);
            String::new()
        });

    ModuleDoc {
        module: NewModule {
            name,
            url: url.to_string(),
            description,
        },
        functions: parse_functions(root),
    }
}

/// Removes a trailing ` – <app>`-style suffix (en dash, em dash or hyphen)
/// or a trailing `(<app> vX.Y)` version tag from a module heading
pub fn strip_app_suffix(heading: &str, app_name: &str) -> String {
    let heading = heading.trim();
    let app = app_name.trim().to_lowercase();
    if app.is_empty() {
        return heading.to_string();
    }

    for separator in [" – ", " — ", " - "] {
        if let Some((module, suffix)) = heading.rsplit_once(separator) {
            if suffix.trim().to_lowercase().starts_with(&app) {
                return module.trim().to_string();
            }
        }
    }

    if let Some((module, tag)) = heading.rsplit_once(" (") {
        if tag.ends_with(')') && tag.to_lowercase().starts_with(&app) {
            return module.trim().to_string();
        }
    }

    heading.to_string()
}

/// Parses a module page and writes the module, its functions and their
/// parameters and examples as one unit of work
///
/// Any storage error rolls the whole hierarchy back before it is returned,
/// so no function is ever left without its module.
pub fn extract_module<S: Storage + ?Sized>(
    root: Node<'_>,
    url: &str,
    application_id: i64,
    app_name: &str,
    storage: &mut S,
) -> StorageResult<EntityCounts> {
    let doc = parse_module(root, url, app_name);

    storage.begin_unit()?;
    let written = write_module(&doc, application_id, storage).and_then(|counts| {
        storage.commit_unit()?;
        Ok(counts)
    });

    match written {
        Ok(counts) => {
            tracing::info!(
                "Inserted module: {} with {} functions",
                doc.module.name,
                counts.functions
            );
            Ok(counts)
        }
        Err(e) => {
            if let Err(rollback) = storage.rollback_unit() {
                tracing::error!("Failed to roll back module {}: {}", doc.module.name, rollback);
            }
            Err(e)
        }
    }
}

fn write_module<S: Storage + ?Sized>(
    doc: &ModuleDoc,
    application_id: i64,
    storage: &mut S,
) -> StorageResult<EntityCounts> {
    let mut counts = EntityCounts::default();

    let module_id = storage.insert_module(application_id, &doc.module)?;
    counts.modules += 1;

    for function in &doc.functions {
        let function_id = storage.insert_function(module_id, &function.function)?;
        counts.functions += 1;
        tracing::debug!(
            "Inserted function: {}/{} (ID: {})",
            function.function.name,
            function.function.arity,
            function_id
        );

        for parameter in &function.parameters {
            storage.insert_parameter(function_id, parameter)?;
            counts.parameters += 1;
        }
        for example in &function.examples {
            storage.insert_example(function_id, example)?;
            counts.examples += 1;
        }
    }

    Ok(counts)
}
