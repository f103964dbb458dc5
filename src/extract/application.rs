//! Application extraction from the seed page

use super::dom::{Node, Scope};
use crate::config::ApplicationPolicy;
use crate::storage::{NewApplication, Storage, StorageResult};

const UNKNOWN: &str = "Unknown";

/// Result of extracting the application root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationExtraction {
    /// Parent key for every module and guide of this crawl
    pub application_id: i64,

    /// Project name, used to strip module heading suffixes
    pub name: String,

    /// False when an existing row was reused
    pub inserted: bool,
}

/// Reads the project name, version and description from the sidebar and
/// main content
pub fn parse_application(root: Node<'_>) -> NewApplication {
    let name = non_empty(root.text_of("a.sidebar-projectName")).unwrap_or_else(|| {
        tracing::debug!("No sidebar project name; using {:?}", UNKNOWN);
        UNKNOWN.to_string()
    });

    let version = non_empty(root.text_of(".sidebar-projectVersion"))
        .map(|v| v.trim_start_matches('v').to_string())
        .unwrap_or_else(|| {
            tracing::debug!("No sidebar project version; using {:?}", UNKNOWN);
            UNKNOWN.to_string()
        });

    let description = description_after_heading(root, &name)
        .or_else(|| non_empty(root.text_of("#content p")))
        .or_else(|| non_empty(root.text_of("main p")))
        .unwrap_or_default();

    NewApplication {
        name,
        version,
        description,
    }
}

/// Paragraph following the `<h1>` whose text is exactly the project name
fn description_after_heading(root: Node<'_>, name: &str) -> Option<String> {
    root.select_all("h1")
        .into_iter()
        .find(|h1| h1.inline_text() == name)
        .and_then(|h1| h1.next_in_document("p"))
        .and_then(|p| non_empty(Some(p.text())))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

/// Parses the seed page and stores its application
///
/// `scope` is the crawl scope key (see [`crate::url::CrawlScope::key`]).
/// Under [`ApplicationPolicy::Reuse`] an application with the same name and
/// version harvested from the same scope is attached to instead of inserting
/// a duplicate. An application whose name or version fell back to
/// `"Unknown"` is never reused.
pub fn extract_application<S: Storage + ?Sized>(
    root: Node<'_>,
    storage: &mut S,
    policy: ApplicationPolicy,
    scope: &str,
) -> StorageResult<ApplicationExtraction> {
    let application = parse_application(root);
    let identified = application.name != UNKNOWN && application.version != UNKNOWN;

    if policy == ApplicationPolicy::Reuse && identified {
        if let Some(id) =
            storage.find_application(&application.name, &application.version, scope)?
        {
            tracing::info!(
                "Reusing application {} {} (ID: {})",
                application.name,
                application.version,
                id
            );
            return Ok(ApplicationExtraction {
                application_id: id,
                name: application.name,
                inserted: false,
            });
        }
    }

    storage.begin_unit()?;
    let stored = storage.insert_application(&application).and_then(|id| {
        storage.record_application_scope(id, scope)?;
        storage.commit_unit()?;
        Ok(id)
    });
    let id = match stored {
        Ok(id) => id,
        Err(e) => {
            if let Err(rollback) = storage.rollback_unit() {
                tracing::error!(
                    "Failed to roll back application {}: {}",
                    application.name,
                    rollback
                );
            }
            return Err(e);
        }
    };
    tracing::info!(
        "Inserted application: {} {} (ID: {})",
        application.name,
        application.version,
        id
    );

    Ok(ApplicationExtraction {
        application_id: id,
        name: application.name,
        inserted: true,
    })
}
