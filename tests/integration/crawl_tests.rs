//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small documentation site and run the
//! full crawl cycle end-to-end against an on-disk database.

use hexdex::config::{ApplicationPolicy, Config};
use hexdex::crawler::Coordinator;
use hexdex::state::{CrawlState, PageOutcome};
use hexdex::storage::{SqliteStorage, Storage, Table};
use hexdex::{run_crawl, HexdexError, UrlError};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing to `db_path` with no politeness delay
fn create_test_config(db_path: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.output.database_path = db_path.to_string_lossy().to_string();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn root_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        r#"<html><head><link rel="stylesheet" href="dist/app.css"></head><body>
             <nav class="sidebar">
               <a class="sidebar-projectName" href="readme.html">MyLib</a>
               <div class="sidebar-projectVersion">1.0.0</div>
               {anchors}
             </nav>
             <main><div id="content">
               <h1>MyLib</h1>
               <p>A library for testing crawlers.</p>
             </div></main>
           </body></html>"#
    )
}

fn module_page(name: &str, function: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        r#"<html><body>
             <nav>{anchors}</nav>
             <div id="content">
               <h1>{name} – MyLib v1.0.0</h1>
               <section id="moduledoc" class="docstring"><p>Docs for {name}.</p></section>
               <section class="function">
                 <h2>{function}</h2>
                 <section class="docstring"><p>Does a thing.</p></section>
                 <section class="params"><ul>
                   <li><span class="name">value</span><span class="type">term()</span></li>
                 </ul></section>
                 <section class="examples"><p>Call it</p><pre>{name}.run(1)</pre></section>
               </section>
             </div>
           </body></html>"#
    )
}

/// Serves the canonical three-page site: a readme seed linking to two
/// module pages, each with one function section
async fn mount_small_site(server: &MockServer) {
    mount_page(
        server,
        "/mylib/readme.html",
        root_page(&["modules/a.html", "/mylib/modules/b.html"]),
    )
    .await;
    mount_page(
        server,
        "/mylib/modules/a.html",
        module_page("MyLib.A", "encode/2", &["../readme.html", "readme.html", "modules/b.html"]),
    )
    .await;
    mount_page(
        server,
        "/mylib/modules/b.html",
        module_page("MyLib.B", "decode/1", &["modules/a.html"]),
    )
    .await;
}

fn seed(server: &MockServer) -> String {
    format!("{}/mylib/readme.html", server.uri())
}

#[tokio::test]
async fn test_full_crawl_small_site() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(summary.state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.counts.applications, 1);
    assert_eq!(summary.counts.modules, 2);
    assert_eq!(summary.counts.functions, 2);
    assert_eq!(summary.counts.parameters, 2);
    assert_eq!(summary.counts.examples, 2);
    assert_eq!(summary.counts.guides, 0);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let applications = storage.list_applications().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].name, "MyLib");
    assert_eq!(applications[0].version, "1.0.0");
    assert_eq!(applications[0].description, "A library for testing crawlers.");

    let modules = storage.list_modules(applications[0].id).unwrap();
    let mut names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["MyLib.A", "MyLib.B"]);

    for module in &modules {
        let functions = storage.list_functions(module.id).unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].module_id, module.id);
        let parameters = storage.list_parameters(functions[0].id).unwrap();
        assert_eq!(parameters[0].function_id, functions[0].id);
    }

    let encode = modules
        .iter()
        .flat_map(|m| storage.list_functions(m.id).unwrap())
        .find(|f| f.name == "encode")
        .unwrap();
    assert_eq!(encode.arity, 2);
    assert_eq!(encode.summary, "Does a thing.");
}

#[tokio::test]
async fn test_run_is_recorded_in_ledger() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");
    let storage = SqliteStorage::new(&db_path).unwrap();

    let mut coordinator =
        Coordinator::with_storage(create_test_config(&db_path), &seed(&server), storage)
            .unwrap()
            .with_config_hash("abc123");
    let summary = coordinator.run().await.unwrap();
    let storage = coordinator.into_storage();

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(Some(run.id), summary.run_id);
    assert_eq!(run.status, CrawlState::Done);
    assert_eq!(run.pages_visited, 3);
    assert_eq!(run.config_hash, "abc123");
    assert_eq!(run.seed_url, seed(&server));
    assert!(run.finished_at.is_some());
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/mylib/readme.html",
        root_page(&[
            "modules/a.html",
            "modules/missing.html",
            "modules/data.json",
        ]),
    )
    .await;
    mount_page(
        &server,
        "/mylib/modules/a.html",
        module_page("MyLib.A", "encode/2", &[]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/mylib/modules/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(summary.state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 4);
    assert_eq!(summary.pages_failed, 2);
    assert_eq!(summary.outcomes.get(&PageOutcome::FetchFailed), Some(&2));
    assert_eq!(summary.counts.applications, 1);
    assert_eq!(summary.counts.modules, 1);
    assert_eq!(summary.counts.functions, 1);
}

#[tokio::test]
async fn test_failed_seed_still_reaches_done() {
    let server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(summary.state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.application_id, None);
    assert_eq!(summary.counts.total(), 0);
}

#[tokio::test]
async fn test_visit_cap_is_enforced() {
    let server = MockServer::start().await;
    let modules: Vec<String> = (0..5).map(|i| format!("modules/m{}.html", i)).collect();
    let links: Vec<&str> = modules.iter().map(String::as_str).collect();
    mount_page(&server, "/mylib/readme.html", root_page(&links)).await;
    for i in 0..5 {
        mount_page(
            &server,
            &format!("/mylib/modules/m{}.html", i),
            module_page(&format!("MyLib.M{}", i), "run/0", &[]),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), Some(3))
        .await
        .unwrap();

    assert_eq!(summary.state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.counts.applications, 1);
    assert_eq!(summary.counts.modules, 2);
}

#[tokio::test]
async fn test_cyclic_links_are_visited_once() {
    let server = MockServer::start().await;
    let pages = [
        (
            "/mylib/readme.html",
            root_page(&["modules/a.html", "modules/b.html", "readme.html"]),
        ),
        (
            "/mylib/modules/a.html",
            module_page("MyLib.A", "a/0", &["modules/b.html", "readme.html"]),
        ),
        (
            "/mylib/modules/b.html",
            module_page("MyLib.B", "b/0", &["modules/a.html", "/mylib/readme.html"]),
        ),
    ];
    for (page_path, body) in pages {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(html(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.counts.modules, 2);
    // each mock verifies its single hit when the server drops
}

#[tokio::test]
async fn test_guide_pages_are_extracted() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/mylib/readme.html",
        root_page(&["guides/getting-started.html", "api-reference.html"]),
    )
    .await;
    mount_page(
        &server,
        "/mylib/guides/getting-started.html",
        r#"<html><body><div id="content"><h1>Getting Started</h1><p>Add the dependency.</p></div></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/mylib/api-reference.html",
        "<html><body><h1>API Reference</h1></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let summary = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.counts.guides, 1);
    assert_eq!(summary.counts.modules, 0);
    assert_eq!(summary.outcomes.get(&PageOutcome::LinksOnly), Some(&1));

    let storage = SqliteStorage::new(&db_path).unwrap();
    let app_id = summary.application_id.unwrap();
    let guides = storage.list_guides(app_id).unwrap();
    assert_eq!(guides[0].title, "Getting Started");
    assert!(guides[0].content.contains("Add the dependency."));
}

#[tokio::test]
async fn test_rerun_reuses_application() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let first = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();
    let second = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();

    assert_eq!(first.application_id, second.application_id);
    assert_eq!(second.counts.applications, 0);
    assert_eq!(second.counts.modules, 0);
    assert_eq!(second.outcomes.get(&PageOutcome::AlreadyStored), Some(&3));

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_rows(Table::Applications).unwrap(), 1);
    assert_eq!(storage.count_rows(Table::Modules).unwrap(), 2);
}

#[tokio::test]
async fn test_rerun_with_append_policy_accumulates() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");
    let mut config = create_test_config(&db_path);
    config.crawler.application_policy = ApplicationPolicy::Append;

    run_crawl(config.clone(), &seed(&server), None).await.unwrap();
    let second = run_crawl(config, &seed(&server), None).await.unwrap();

    assert_eq!(second.counts.applications, 1);
    assert_eq!(second.counts.modules, 2);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_rows(Table::Applications).unwrap(), 2);
    assert_eq!(storage.count_rows(Table::Modules).unwrap(), 4);
}

/// Module URLs stored under `application_id`
fn module_urls(storage: &SqliteStorage, application_id: i64) -> Vec<String> {
    storage
        .list_modules(application_id)
        .unwrap()
        .into_iter()
        .map(|m| m.url)
        .collect()
}

#[tokio::test]
async fn test_unidentified_libraries_get_separate_applications() {
    let server = MockServer::start().await;
    for lib in ["liba", "libb"] {
        mount_page(
            &server,
            &format!("/{}/index.html", lib),
            r#"<html><body><a href="modules/m.html">M</a></body></html>"#.to_string(),
        )
        .await;
        mount_page(
            &server,
            &format!("/{}/modules/m.html", lib),
            module_page("Lib.M", "run/1", &[]),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let a = run_crawl(
        create_test_config(&db_path),
        &format!("{}/liba/index.html", server.uri()),
        None,
    )
    .await
    .unwrap();
    let b = run_crawl(
        create_test_config(&db_path),
        &format!("{}/libb/index.html", server.uri()),
        None,
    )
    .await
    .unwrap();

    assert_eq!(b.counts.applications, 1);
    assert_eq!(b.counts.modules, 1);
    let (a_app, b_app) = (a.application_id.unwrap(), b.application_id.unwrap());
    assert_ne!(a_app, b_app);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_rows(Table::Applications).unwrap(), 2);
    assert_eq!(
        module_urls(&storage, a_app),
        vec![format!("{}/liba/modules/m.html", server.uri())]
    );
    assert_eq!(
        module_urls(&storage, b_app),
        vec![format!("{}/libb/modules/m.html", server.uri())]
    );
}

#[tokio::test]
async fn test_same_release_under_other_library_path_is_not_reused() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;
    mount_page(&server, "/fork/readme.html", root_page(&["modules/a.html"])).await;
    mount_page(
        &server,
        "/fork/modules/a.html",
        module_page("MyLib.A", "encode/2", &[]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    let original = run_crawl(create_test_config(&db_path), &seed(&server), None)
        .await
        .unwrap();
    let fork = run_crawl(
        create_test_config(&db_path),
        &format!("{}/fork/readme.html", server.uri()),
        None,
    )
    .await
    .unwrap();

    assert_eq!(fork.counts.applications, 1);
    assert_eq!(fork.counts.modules, 1);
    assert_ne!(original.application_id, fork.application_id);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_rows(Table::Applications).unwrap(), 2);
    assert_eq!(module_urls(&storage, original.application_id.unwrap()).len(), 2);
    assert_eq!(
        module_urls(&storage, fork.application_id.unwrap()),
        vec![format!("{}/fork/modules/a.html", server.uri())]
    );
}

#[tokio::test]
async fn test_malformed_seed_is_fatal() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("docs.db");

    for seed in ["not a url", "ftp://example.com/mylib/", "http://example.com/"] {
        let result = run_crawl(create_test_config(&db_path), seed, None).await;
        assert!(
            matches!(
                result,
                Err(HexdexError::UrlError(UrlError::MalformedSeed { .. }))
            ),
            "{} should be rejected",
            seed
        );
    }

    // no crawl work, not even the database, happened
    assert!(!db_path.exists());
}
