//! Markdown export of the documentation store
//!
//! This module renders every stored application with its modules,
//! functions (including parameters and examples) and guides into a single
//! human-readable markdown document.

use crate::storage::{FunctionRecord, Storage, StorageResult};
use crate::HexdexError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest guide excerpt written to the export
const GUIDE_EXCERPT_CHARS: usize = 280;

/// Writes the markdown export of `storage` to `output_path`
///
/// # Arguments
///
/// * `storage` - The storage backend to export
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the export
/// * `Err(HexdexError)` - Failed to query storage or write the file
pub fn generate_markdown_summary(
    storage: &dyn Storage,
    output_path: &Path,
) -> Result<(), HexdexError> {
    let markdown = format_markdown_summary(storage)?;

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the whole store as markdown
pub fn format_markdown_summary(storage: &dyn Storage) -> StorageResult<String> {
    let mut md = String::new();

    md.push_str("# Hexdex Documentation Summary\n\n");

    if let Some(run) = storage.get_latest_run()? {
        md.push_str("## Latest Run\n\n");
        md.push_str(&format!("- **Run ID**: {}\n", run.id));
        md.push_str(&format!("- **Seed**: {}\n", run.seed_url));
        md.push_str(&format!("- **Started**: {}\n", run.started_at));
        if let Some(finished) = &run.finished_at {
            md.push_str(&format!("- **Finished**: {}\n", finished));
        }
        md.push_str(&format!("- **Status**: {}\n", run.status));
        md.push_str(&format!("- **Pages Visited**: {}\n", run.pages_visited));
        md.push_str(&format!("- **Config Hash**: {}\n\n", run.config_hash));
    }

    let applications = storage.list_applications()?;
    if applications.is_empty() {
        md.push_str("_No applications stored._\n");
        return Ok(md);
    }

    for application in applications {
        md.push_str(&format!(
            "## {} {}\n\n",
            application.name, application.version
        ));
        if !application.description.is_empty() {
            md.push_str(&format!("{}\n\n", application.description));
        }

        let modules = storage.list_modules(application.id)?;
        if !modules.is_empty() {
            md.push_str("### Modules\n\n");
        }
        for module in modules {
            md.push_str(&format!("#### {}\n\n", module.name));
            md.push_str(&format!("<{}>\n\n", module.url));
            if !module.description.is_empty() {
                md.push_str(&format!("{}\n\n", first_line(&module.description)));
            }

            for function in storage.list_functions(module.id)? {
                format_function(storage, &function, &mut md)?;
            }
        }

        let guides = storage.list_guides(application.id)?;
        if !guides.is_empty() {
            md.push_str("### Guides\n\n");
        }
        for guide in guides {
            md.push_str(&format!("- [{}]({})", guide.title, guide.url));
            if !guide.content.is_empty() {
                md.push_str(&format!(": {}", excerpt(&guide.content)));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    Ok(md)
}

fn format_function(
    storage: &dyn Storage,
    function: &FunctionRecord,
    md: &mut String,
) -> StorageResult<()> {
    md.push_str(&format!("- `{}/{}`", function.name, function.arity));
    if !function.return_type.is_empty() {
        md.push_str(&format!(" → `{}`", function.return_type));
    }
    if !function.summary.is_empty() {
        md.push_str(&format!(": {}", function.summary));
    }
    md.push('\n');

    for parameter in storage.list_parameters(function.id)? {
        md.push_str(&format!("  - `{}`", parameter.name));
        if !parameter.param_type.is_empty() {
            md.push_str(&format!(" ({})", parameter.param_type));
        }
        if !parameter.default_value.is_empty() {
            md.push_str(&format!(", default `{}`", parameter.default_value));
        }
        if !parameter.description.is_empty() {
            md.push_str(&format!(": {}", parameter.description));
        }
        md.push('\n');
    }

    for example in storage.list_examples(function.id)? {
        md.push_str("\n  ```elixir\n");
        for line in example.code.lines() {
            md.push_str(&format!("  {}\n", line));
        }
        md.push_str("  ```\n\n");
    }

    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

fn excerpt(text: &str) -> String {
    let collapsed = crate::extract::collapse_whitespace(text);
    if collapsed.chars().count() <= GUIDE_EXCERPT_CHARS {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(GUIDE_EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}
