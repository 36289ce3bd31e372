mod common;

use common::quire_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn archive_server() -> MockServer {
    let server = MockServer::start().await;
    let head = json!({
        "format": "article-collection",
        "version": 1,
        "lastChanged": "2024-01-02",
        "range": { "from": "2024-01-01", "to": "2024-01-02" },
        "articles": [
            { "id": "a3a3a3", "slug": "third-post", "title": "Third post", "date": "2024-01-02",
              "tags": ["rust"], "authors": ["ana"] },
            { "id": "a2a2a2", "slug": "second-post", "title": "Second post", "date": "2024-01-01",
              "tags": ["go"], "authors": ["ben"] }
        ],
        "previous": { "path": "older.json", "lastChanged": "2023-12-31" }
    });
    let older = json!({
        "format": "article-collection",
        "version": 1,
        "lastChanged": "2023-12-31",
        "range": { "from": "2023-12-31", "to": "2023-12-31" },
        "articles": [
            { "id": "a1a1a1", "slug": "first-post", "title": "First post", "date": "2023-12-31",
              "tags": ["rust"], "authors": ["ana"], "summary": "Where it all began." }
        ]
    });

    for (route, body) in [("/blog/articles.json", head), ("/blog/older.json", older)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

fn ids(stdout: &[u8]) -> Vec<String> {
    let value: Value = serde_json::from_slice(stdout).expect("json output");
    value
        .as_array()
        .expect("array output")
        .iter()
        .map(|a| a["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn latest_and_filters_as_json() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    let out = quire_cmd(data.path())
        .args(["--head", &head, "latest", "-n", "2", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(ids(&out), vec!["a3a3a3", "a2a2a2"]);

    let out = quire_cmd(data.path())
        .env("QUIRE_HEAD_URL", &head)
        .args(["tags", "rust", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(ids(&out), vec!["a3a3a3", "a1a1a1"]);

    let out = quire_cmd(data.path())
        .args(["--head", &head, "range", "2023-12-01", "2023-12-31", "-f", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(ids(&out), vec!["a1a1a1"]);
    Ok(())
}

#[tokio::test]
async fn show_prints_article_text() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    quire_cmd(data.path())
        .args(["--head", &head, "show", "a1a1a1/first-post/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First post"))
        .stdout(predicate::str::contains("a1a1a1/first-post/"))
        .stdout(predicate::str::contains("Where it all began."));
    Ok(())
}

#[tokio::test]
async fn missing_article_exits_with_one() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    quire_cmd(data.path())
        .args(["--head", &head, "get", "ffffff"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Article not found: ffffff"));
    Ok(())
}

#[tokio::test]
async fn inverted_range_is_a_usage_error() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    quire_cmd(data.path())
        .args(["--head", &head, "range", "2024-02-01", "2024-01-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Start date must be before end date"));
    Ok(())
}

#[test]
fn missing_head_is_reported() -> anyhow::Result<()> {
    let data = tempdir()?;

    quire_cmd(data.path())
        .args(["latest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No head page configured"));
    Ok(())
}

#[tokio::test]
async fn cache_list_and_clear() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    quire_cmd(data.path())
        .args(["--head", &head, "latest", "-n", "3"])
        .assert()
        .success();

    let out = quire_cmd(data.path())
        .args(["cache", "list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listed: Value = serde_json::from_slice(&out)?;
    let urls: Vec<&str> = listed
        .as_array()
        .expect("array output")
        .iter()
        .filter_map(|p| p["url"].as_str())
        .collect();
    assert_eq!(
        urls,
        vec![head.as_str(), &format!("{}/blog/older.json", server.uri())]
    );

    quire_cmd(data.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 cached page(s)"));

    quire_cmd(data.path())
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty"));
    Ok(())
}

#[tokio::test]
async fn no_cache_leaves_data_dir_untouched() -> anyhow::Result<()> {
    let server = archive_server().await;
    let data = tempdir()?;
    let head = format!("{}/blog/articles.json", server.uri());

    quire_cmd(data.path())
        .args(["--head", &head, "--no-cache", "latest", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First post"));

    assert!(!data.path().join("article-cache").exists());
    Ok(())
}
