use std::path::Path;
use std::sync::Arc;

use gowiki::config::{AppState, Config};
use gowiki::handler::{dispatch, PageRequest};
use gowiki::render::HtmlTemplates;
use gowiki::routing::PathValidator;
use gowiki::store::{FileStore, PageStore};
use hyper::StatusCode;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn templates_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

fn wiki_state(temp: &TempDir) -> AppState {
    let mut config = Config::load_from("no-such-config-for-tests").unwrap();
    config.logging.access_log = false;
    config.storage.data_dir = temp.path().to_string_lossy().into_owned();
    config.templates.dir = templates_dir().to_string_lossy().into_owned();
    AppState::from_config(config).unwrap()
}

#[tokio::test]
async fn test_alice_scenario() {
    use http_body_util::BodyExt;

    let temp = TempDir::new().unwrap();
    let state = wiki_state(&temp);

    let resp = dispatch(&PageRequest::get("/view/Alice"), &state);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()["location"], "/edit/Alice");
    assert!(!temp.path().join("Alice.txt").exists());

    let resp = dispatch(&PageRequest::post("/save/Alice", "body=Hello"), &state);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()["location"], "/view/Alice");
    assert_eq!(
        std::fs::read(temp.path().join("Alice.txt")).unwrap(),
        b"Hello"
    );

    let resp = dispatch(&PageRequest::get("/view/Alice"), &state);
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("<h1>Alice</h1>"));
    assert!(html.contains("<div>Hello</div>"));
}

#[tokio::test]
async fn test_edit_missing_page_shows_blank_form() {
    use http_body_util::BodyExt;

    let temp = TempDir::new().unwrap();
    let state = wiki_state(&temp);

    let resp = dispatch(&PageRequest::get("/edit/Fresh"), &state);
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("action=\"/save/Fresh\""));
    assert!(html.contains("cols=\"80\"></textarea>"));
}

#[test]
fn test_invalid_path_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let state = wiki_state(&temp);

    for path in ["/view/bad path", "/view/bad/path", "/save/..", "/other/Alice"] {
        let resp = dispatch(&PageRequest::post(path, "body=x"), &state);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "path {path:?}");
    }
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_save_without_body_field_is_empty_page() {
    let temp = TempDir::new().unwrap();
    let state = wiki_state(&temp);

    dispatch(&PageRequest::post("/save/Blank", ""), &state);
    let page = state.store.load("Blank").unwrap();
    assert!(page.body.is_empty());
}

#[test]
fn test_state_from_parts() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path(), "txt").unwrap();
    let state = AppState::new(
        Config::load_from("no-such-config-for-tests").unwrap(),
        PathValidator::new().unwrap(),
        Arc::new(store),
        Arc::new(HtmlTemplates::load(templates_dir()).unwrap()),
    );

    let resp = dispatch(&PageRequest::post("/save/Parts", "body=ok"), &state);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(state.store.load("Parts").unwrap().body, b"ok");
}

/// Serve one real connection and speak raw HTTP/1.1 to it
#[tokio::test]
async fn test_over_tcp() {
    let temp = TempDir::new().unwrap();
    let state = Arc::new(wiki_state(&temp));
    let listener =
        gowiki::server::create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            tokio::task::spawn_local(gowiki::server::serve(listener, state));

            let save = send(
                addr,
                "POST /save/Tcp HTTP/1.1\r\nHost: wiki\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 13\r\nConnection: close\r\n\r\nbody=over+tcp",
            )
            .await;
            assert!(save.starts_with("HTTP/1.1 302"), "got: {save}");
            assert!(save.to_ascii_lowercase().contains("location: /view/tcp"));

            let view = send(
                addr,
                "GET /view/Tcp HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\r\n",
            )
            .await;
            assert!(view.starts_with("HTTP/1.1 200"), "got: {view}");
            assert!(view.contains("<div>over tcp</div>"));

            let encoded = send(
                addr,
                "GET /view/%54cp HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\r\n",
            )
            .await;
            assert!(encoded.starts_with("HTTP/1.1 200"), "got: {encoded}");
            assert!(encoded.contains("<h1>Tcp</h1>"));

            let untyped = send(
                addr,
                "POST /save/Untyped HTTP/1.1\r\nHost: wiki\r\nContent-Length: 8\r\nConnection: close\r\n\r\nbody=abc",
            )
            .await;
            assert!(untyped.starts_with("HTTP/1.1 302"), "got: {untyped}");

            let oversized_delete = send(
                addr,
                "DELETE /view/Tcp HTTP/1.1\r\nHost: wiki\r\nContent-Length: 5000000\r\nConnection: close\r\n\r\n",
            )
            .await;
            assert!(
                oversized_delete.starts_with("HTTP/1.1 405"),
                "got: {oversized_delete}"
            );

            let missing = send(
                addr,
                "GET /view/a%20b HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\r\n",
            )
            .await;
            assert!(missing.starts_with("HTTP/1.1 404"), "got: {missing}");
        })
        .await;

    assert_eq!(std::fs::read(temp.path().join("Tcp.txt")).unwrap(), b"over tcp");
    assert!(std::fs::read(temp.path().join("Untyped.txt")).unwrap().is_empty());
}

async fn send(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}
