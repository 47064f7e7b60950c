//! Test helpers for integration tests against a mocked Frunk server.
//!
//! - Starting a `MockServer` and a client pointed at its `/api/` root
//! - JSON builders for notes, pages, and tags as the server returns them

use frunk_core::api::ApiClient;
use frunk_core::config::{NotesConfig, ServerConfig};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Start a mock server and a client for it.
pub async fn start() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let api = ApiClient::from_config(&server_config(&server)).expect("client builds");
    (server, api)
}

pub fn server_config(server: &MockServer) -> ServerConfig {
    ServerConfig {
        api_root: format!("{}/api/", server.uri()),
        request_timeout_secs: 5,
        retry_max_elapsed_ms: 1_000,
    }
}

/// Start a server that answers every request with `status_line` and a body
/// cut short of its declared `Content-Length`, then hangs up.
///
/// Returns the `/api/` root to point a client at.
pub async fn start_truncating(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: 64\r\n\r\npartial"
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}/api/")
}

/// Notes settings with a short quiet period so debounce tests run quickly.
pub fn fast_notes_config() -> NotesConfig {
    NotesConfig {
        per_page: 10,
        autosave_quiet_ms: 100,
        saved_flash_ms: 2_000,
    }
}

pub fn note_json(id: i64, title: &str, content: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "is_pinned": false,
        "created_at": "2024-01-10T11:00:00",
        "updated_at": "2024-01-10T11:00:00",
        "tags": []
    })
}

pub fn page_json(notes: Vec<Value>, page: u32, pages: u32, total: u64) -> Value {
    json!({
        "notes": notes,
        "page": page,
        "pages": pages,
        "total": total,
        "per_page": 10
    })
}

pub fn tag_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "color": "#007bff", "note_count": 0 })
}
