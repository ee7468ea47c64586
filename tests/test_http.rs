mod common;

use std::sync::Arc;

use common::ContentDir;
use gemserve::config::Config;
use gemserve::http::connection::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Writes raw request bytes and returns the raw response stream.
async fn exchange(cfg: Arc<Config>, raw: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(256 * 1024);
    let peer = "127.0.0.1:50000".parse().unwrap();

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, peer, cfg);
        conn.run().await
    });

    client.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn parse(raw: &[u8]) -> Self {
        let end = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = std::str::from_utf8(&raw[..end]).unwrap();
        let mut lines = head.split("\r\n");
        let status = lines.next().unwrap().split(' ').nth(1).unwrap().parse().unwrap();
        let headers = lines
            .map(|l| {
                let (k, v) = l.split_once(':').unwrap();
                (k.trim().to_string(), v.trim().to_string())
            })
            .collect();
        Self {
            status,
            headers,
            body: raw[end + 4..].to_vec(),
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

async fn get(cfg: Arc<Config>, path: &str) -> Reply {
    let raw = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
    Reply::parse(&exchange(cfg, raw.as_bytes()).await)
}

#[tokio::test]
async fn test_gemtext_page_rendered_with_title() {
    let dir = ContentDir::new().file("page.gmi", "# Welcome\nHello");
    let reply = get(dir.config("site_name: Site\n"), "/page.gmi").await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("Content-Type"), Some("text/html; charset=utf-8"));
    assert!(reply.text().contains("<title>Site :: Welcome</title>"));
    assert!(reply.text().contains("<h1>Welcome</h1>"));
    assert!(reply.text().contains("<p>Hello</p>"));
}

#[tokio::test]
async fn test_title_falls_back_to_path() {
    let dir = ContentDir::new().file("notes.gmi", "## Not a title\ntext");
    let reply = get(dir.config("site_name: Site\n"), "/notes.gmi").await;

    assert_eq!(reply.status, 200);
    assert!(reply.text().contains("<title>Site :: /notes.gmi</title>"));
}

#[tokio::test]
async fn test_stylesheet_embedded() {
    let dir = ContentDir::new().file("page.gmi", "# Styled");
    let mut cfg = dir.settings("");
    cfg.http.css = Some("body { margin: 0; }".to_string());

    let reply = get(Arc::new(cfg), "/page.gmi").await;
    assert!(reply.text().contains("<style>\nbody { margin: 0; }\n</style>"));
}

#[tokio::test]
async fn test_root_serves_index_without_listing() {
    let dir = ContentDir::new().file("index.gmi", "# Home");
    let reply = get(dir.config(""), "/").await;

    assert_eq!(reply.status, 200);
    assert!(reply.text().contains("<title>gemserve :: Home</title>"));
}

#[tokio::test]
async fn test_directory_listing_page() {
    let dir = ContentDir::new()
        .file("docs/a.gmi", "a")
        .file("docs/b.txt", "b");
    let reply = get(dir.config("auto_list: true\n"), "/docs/").await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("Content-Type"), Some("text/html; charset=utf-8"));

    let html = reply.text();
    let anchors: Vec<&str> = html.match_indices("<a href=").map(|(i, _)| &html[i..]).collect();
    assert_eq!(anchors.len(), 3);
    assert!(anchors[0].starts_with("<a href=\"/\">..</a>"));
    assert_eq!(html.matches("<a href=\"/docs/a.gmi\">a.gmi</a>").count(), 1);
    assert_eq!(html.matches("<a href=\"/docs/b.txt\">b.txt</a>").count(), 1);
}

#[tokio::test]
async fn test_directory_redirects_without_listing() {
    let dir = ContentDir::new().dir("docs");
    let reply = get(dir.config(""), "/docs").await;

    assert_eq!(reply.status, 302);
    assert_eq!(reply.header("Location"), Some("/docs/index.gmi"));
}

#[tokio::test]
async fn test_other_files_served_raw() {
    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let dir = ContentDir::new()
        .file("img/logo.png", png)
        .file("plain.txt", "just text");
    let cfg = dir.config("");

    let reply = get(Arc::clone(&cfg), "/img/logo.png").await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.body, png);

    let reply = get(cfg, "/plain.txt?cache=bust").await;
    assert_eq!(reply.header("Content-Type"), Some("text/plain; charset=utf-8"));
    assert_eq!(reply.text(), "just text");
}

#[tokio::test]
async fn test_blocked_and_missing_are_404() {
    let dir = ContentDir::new()
        .file("private/secret.gmi", "# Secret")
        .file("archive.zip", "PK");
    let cfg = dir.config("block: [/private]\n");

    let blocked = get(Arc::clone(&cfg), "/private/secret.gmi").await;
    let missing = get(Arc::clone(&cfg), "/nope.gmi").await;
    let unknown = get(Arc::clone(&cfg), "/archive.zip").await;
    let escape = get(cfg, "/../../etc/passwd").await;

    for reply in [&blocked, &missing, &unknown, &escape] {
        assert_eq!(reply.status, 404);
    }
    assert_eq!(blocked.body, missing.body);
}

#[tokio::test]
async fn test_invalid_gemtext_is_500() {
    let dir = ContentDir::new().file("broken.gmi", b"\xff\xfe# nope");
    let reply = get(dir.config(""), "/broken.gmi").await;
    assert_eq!(reply.status, 500);
}

#[tokio::test]
async fn test_malformed_request_gets_bare_400() {
    let dir = ContentDir::new();
    let out = exchange(dir.config(""), b"NONSENSE\r\n\r\n").await;
    assert_eq!(out, b"HTTP/1.1 400 Bad Request\r\n\r\n");
}

#[tokio::test]
async fn test_oversized_body_gets_bare_400() {
    let dir = ContentDir::new().file("index.gmi", "# Home");
    let raw = b"GET /index.gmi HTTP/1.1\r\nContent-Length: 100000000000\r\n\r\nsome bytes";
    let out = exchange(dir.config(""), raw).await;
    assert_eq!(out, b"HTTP/1.1 400 Bad Request\r\n\r\n");
}

#[tokio::test]
async fn test_post_not_allowed() {
    let dir = ContentDir::new().file("index.gmi", "# Home");
    let raw = b"POST /index.gmi HTTP/1.1\r\nContent-Length: 2\r\nConnection: close\r\n\r\nhi";
    let reply = Reply::parse(&exchange(dir.config(""), raw).await);

    assert_eq!(reply.status, 405);
    assert_eq!(reply.header("Allow"), Some("GET, HEAD"));
}

#[tokio::test]
async fn test_head_has_no_body() {
    let dir = ContentDir::new().file("plain.txt", "twelve bytes");
    let raw = b"HEAD /plain.txt HTTP/1.1\r\nConnection: close\r\n\r\n";
    let reply = Reply::parse(&exchange(dir.config(""), raw).await);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.header("Content-Length"), Some("12"));
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_keep_alive_serves_pipelined_requests() {
    let dir = ContentDir::new().file("a.txt", "A").file("b.txt", "B");
    let raw = b"GET /a.txt HTTP/1.1\r\n\r\nGET /b.txt HTTP/1.1\r\nConnection: close\r\n\r\n";
    let out = exchange(dir.config(""), raw).await;
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(text.find("\r\n\r\nA").unwrap() < text.find("\r\n\r\nB").unwrap());
}
