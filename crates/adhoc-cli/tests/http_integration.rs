//! End-to-end tests against a live server on an ephemeral port.

use adhoc_httpd::{ListingFormat, Server, ServerConfig, router};
use adhoc_httpd_core::OrderConfig;
use adhoc_httpd_files::MemFs;
use adhoc_httpd_order::SortedFs;
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_RANGES, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, IF_MODIFIED_SINCE,
    LAST_MODIFIED, LOCATION, RANGE,
};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tempfile::TempDir;

fn config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        root: root.to_path_buf(),
        ..ServerConfig::default()
    }
}

async fn spawn(config: ServerConfig) -> SocketAddr {
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Site with a scrambled flat directory, a subdirectory, and an index page.
fn site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("hello.txt"), "hello, world\n").unwrap();
    fs::write(root.join("hello world.txt"), "spaced").unwrap();
    fs::create_dir(root.join("flat")).unwrap();
    for i in 0..150 {
        // 37 is coprime with 150, so names are written out of order
        let n = (i * 37) % 150;
        fs::write(root.join(format!("flat/item-{n:03}.txt")), n.to_string()).unwrap();
    }
    fs::create_dir(root.join("flat/nested")).unwrap();
    fs::create_dir(root.join("site")).unwrap();
    fs::write(root.join("site/index.html"), "<h1>home</h1>").unwrap();
    temp
}

fn hrefs(html: &str) -> Vec<String> {
    html.lines()
        .filter_map(|line| line.strip_prefix("<a href=\""))
        .filter_map(|rest| rest.split_once('"'))
        .map(|(href, _)| href.to_string())
        .filter(|href| href != "../")
        .collect()
}

#[tokio::test]
async fn test_html_listing_is_sorted() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let response = client()
        .get(format!("http://{addr}/flat/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");

    let body = response.text().await.unwrap();
    let links = hrefs(&body);
    assert_eq!(links.len(), 151);

    let mut sorted = links.clone();
    sorted.sort();
    assert_eq!(links, sorted);
    assert_eq!(links[0], "item-000.txt");
    assert_eq!(links[150], "nested/");
    assert!(body.contains("<a href=\"../\">../</a>"));
}

#[tokio::test]
async fn test_json_listing_with_small_window() {
    let temp = TempDir::new().unwrap();
    for i in (0..300).rev() {
        fs::write(temp.path().join(format!("f{i:04}")), "").unwrap();
    }
    let mut config = config(temp.path());
    config.order = OrderConfig::builder().window_size(8).min_batch_size(2).build();
    let addr = spawn(config).await;

    let value: serde_json::Value = client()
        .get(format!("http://{addr}/?format=json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = value["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 300);

    // every entry arrives exactly once
    let mut unique = names.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 300);
    assert_eq!(value["path"], "/");
}

#[tokio::test]
async fn test_listing_format_negotiation() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let by_accept = client()
        .get(format!("http://{addr}/"))
        .header(ACCEPT, "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(by_accept.headers()[CONTENT_TYPE], "application/json");
    let value: serde_json::Value = by_accept.json().await.unwrap();
    let names: Vec<&str> = value["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["flat/", "hello world.txt", "hello.txt", "site/"]);

    let mut json_default = config(temp.path());
    json_default.listing = ListingFormat::Json;
    let addr = spawn(json_default).await;

    let plain = client().get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(plain.headers()[CONTENT_TYPE], "application/json");

    let forced = client()
        .get(format!("http://{addr}/?format=html"))
        .send()
        .await
        .unwrap();
    assert_eq!(forced.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
}

#[tokio::test]
async fn test_directory_redirects() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let response = client()
        .get(format!("http://{addr}/flat?format=json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[LOCATION], "/flat/?format=json");

    let response = client()
        .get(format!("http://{addr}/hello.txt/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[LOCATION], "/hello.txt");
}

#[tokio::test]
async fn test_index_html() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let response = client()
        .get(format!("http://{addr}/site/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
    assert_eq!(response.text().await.unwrap(), "<h1>home</h1>");

    let response = client()
        .get(format!("http://{addr}/site/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[LOCATION], "./");
}

#[tokio::test]
async fn test_file_download() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let response = client()
        .get(format!("http://{addr}/hello.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(response.headers()[CONTENT_LENGTH], "13");
    assert_eq!(response.headers()[ACCEPT_RANGES], "bytes");
    assert!(response.headers().contains_key(LAST_MODIFIED));
    assert_eq!(response.text().await.unwrap(), "hello, world\n");

    let spaced = client()
        .get(format!("http://{addr}/hello%20world.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(spaced.text().await.unwrap(), "spaced");
}

#[tokio::test]
async fn test_head_has_headers_but_no_body() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let response = client()
        .head(format!("http://{addr}/hello.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LENGTH], "13");
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_range_requests() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;
    let url = format!("http://{addr}/hello.txt");

    let response = client()
        .get(&url)
        .header(RANGE, "bytes=7-11")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes 7-11/13");
    assert_eq!(response.text().await.unwrap(), "world");

    let response = client()
        .get(&url)
        .header(RANGE, "bytes=-6")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.text().await.unwrap(), "world\n");

    let response = client()
        .get(&url)
        .header(RANGE, "bytes=100-")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes */13");
}

#[tokio::test]
async fn test_if_modified_since() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;
    let url = format!("http://{addr}/hello.txt");

    let first = client().get(&url).send().await.unwrap();
    let last_modified = first.headers()[LAST_MODIFIED].clone();

    let cached = client()
        .get(&url)
        .header(IF_MODIFIED_SINCE, last_modified)
        .send()
        .await
        .unwrap();
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

    let stale = client()
        .get(&url)
        .header(IF_MODIFIED_SINCE, "Thu, 01 Jan 1970 00:00:00 GMT")
        .send()
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_error_statuses() {
    let temp = site();
    let addr = spawn(config(temp.path())).await;

    let missing = client()
        .get(format!("http://{addr}/nope.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.text().await.unwrap(), "404 Not Found\n");

    let escape = client()
        .get(format!("http://{addr}/flat%2F..%2F..%2Fetc"))
        .send()
        .await
        .unwrap();
    assert_eq!(escape.status(), StatusCode::BAD_REQUEST);

    let not_utf8 = client()
        .get(format!("http://{addr}/%FF"))
        .send()
        .await
        .unwrap();
    assert_eq!(not_utf8.status(), StatusCode::BAD_REQUEST);

    let post = client()
        .post(format!("http://{addr}/hello.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(post.headers()[ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn test_bind_rejects_missing_root() {
    let temp = TempDir::new().unwrap();
    let err = Server::bind(&config(&temp.path().join("missing")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}

#[tokio::test]
async fn test_router_over_memory_store() {
    let mut mem = MemFs::new();
    for name in ["zeta", "alpha", "mu", "beta", "omega"] {
        mem.add_file(format!("/greek/{name}.txt"), name).unwrap();
    }
    let fs = SortedFs::new(
        mem,
        OrderConfig::builder().window_size(2).min_batch_size(1).build(),
    );
    let app = router(fs, ListingFormat::Json);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let value: serde_json::Value = client()
        .get(format!("http://{addr}/greek/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 5);

    let body = client()
        .get(format!("http://{addr}/greek/mu.txt"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "mu");
}
