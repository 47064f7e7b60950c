use common::Credentials;

use frunk::commands::{auth, toolbox};
use frunk::state::{AppState, View};

use frunk_core::api::ApiClient;
use frunk_core::config::NotesConfig;
use frunk_core::editor::buffer::BufferEditorFactory;
use frunk_core::koculator::Koculator;
use frunk_core::notes::NotesWorkspace;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn start() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let api = ApiClient::new(&format!("{}/api/", server.uri())).unwrap();
    (server, api)
}

pub fn user_json() -> Value {
    json!({ "user": { "id": 1, "email": "a@b.c" } })
}

pub fn tools_json() -> Value {
    json!({ "tools": [
        { "id": "notes", "name": "Notes", "description": "Write things down",
          "entry": { "type": "spa", "view": "notes" } },
        { "id": "koculator", "name": "Koculator", "description": "",
          "entry": { "type": "spa", "view": "koculator" } },
        { "id": "wiki", "name": "Wiki", "description": "External", "entry": null }
    ]})
}

pub async fn mount_ok(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn notes_config() -> NotesConfig {
    NotesConfig {
        autosave_quiet_ms: 100,
        ..NotesConfig::default()
    }
}

/// **VALUE**: Verifies an existing session lands on the toolbox with its tools.
///
/// **WHY THIS MATTERS**: Reopening the client should not ask for a login again.
///
/// **BUG THIS CATCHES**: Would catch the tools not being loaded on restore.
#[tokio::test]
async fn given_valid_session_when_restored_then_toolbox_shown() {
    // GIVEN: A server that knows the session
    let (server, api) = start().await;
    mount_ok(&server, "GET", "/api/auth/me", user_json()).await;
    mount_ok(&server, "GET", "/api/tools/", tools_json()).await;
    let state = AppState::new();

    // WHEN: Restoring
    let user = auth::restore_session(&state, &api).await.unwrap();

    // THEN: Logged in on the toolbox
    assert_eq!(user.unwrap().email, "a@b.c");
    assert_eq!(state.get_view().await, View::Toolbox);
    assert_eq!(state.get_tools().await.len(), 3);
}

/// **VALUE**: Verifies any failure of the session check means "not logged in".
///
/// **BUG THIS CATCHES**: Would catch a 401 on startup being reported as an error.
#[tokio::test]
async fn given_no_session_when_restored_then_login_shown() {
    let (server, api) = start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let state = AppState::new();

    let user = auth::restore_session(&state, &api).await.unwrap();

    assert!(user.is_none());
    assert_eq!(state.get_view().await, View::Login);
}

/// **VALUE**: Verifies a failed tool listing still completes the login with an empty toolbox.
///
/// **BUG THIS CATCHES**: Would catch a tools outage blocking login.
#[tokio::test]
async fn given_tools_unavailable_when_logging_in_then_empty_toolbox() {
    let (server, api) = start().await;
    mount_ok(&server, "POST", "/api/auth/login", user_json()).await;
    Mock::given(method("GET"))
        .and(path("/api/tools/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let state = AppState::new();

    auth::login(&state, &api, &Credentials::new("a@b.c", "pw"))
        .await
        .unwrap();

    assert!(state.is_logged_in().await);
    assert!(state.get_tools().await.is_empty());
    assert_eq!(state.get_view().await, View::Toolbox);
}

/// **VALUE**: Verifies opening tools switches views and tools without a view are ignored.
///
/// **WHY THIS MATTERS**: Opening the notes tool must load its data, and a tool
/// with no client view must not leave the user on a blank screen.
///
/// **BUG THIS CATCHES**: Would catch notes opening without loading the list.
#[tokio::test]
async fn given_tools_when_opened_then_view_switched_or_ignored() {
    let (server, api) = start().await;
    mount_ok(&server, "GET", "/api/auth/me", user_json()).await;
    mount_ok(&server, "GET", "/api/tools/", tools_json()).await;
    mount_ok(
        &server,
        "GET",
        "/api/notes/",
        json!({ "notes": [{ "id": 5, "title": "Hello" }], "page": 1, "pages": 1, "total": 1, "per_page": 10 }),
    )
    .await;
    mount_ok(&server, "GET", "/api/notes/tags", json!([])).await;
    let state = AppState::new();
    auth::restore_session(&state, &api).await.unwrap();
    let mut workspace = NotesWorkspace::new(api.clone(), BufferEditorFactory::new(), &notes_config());
    let mut calc = Koculator::new();
    let tools = state.get_tools().await;

    // WHEN/THEN: A tool without a view changes nothing
    let wiki = toolbox::find_tool(&tools, "wiki").unwrap();
    let opened = toolbox::open_tool(&state, wiki, &mut workspace, &mut calc).await.unwrap();
    assert_eq!(opened, None);
    assert_eq!(state.get_view().await, View::Toolbox);

    // WHEN/THEN: Notes opens and loads
    let notes = toolbox::find_tool(&tools, "Notes").unwrap();
    let opened = toolbox::open_tool(&state, notes, &mut workspace, &mut calc).await.unwrap();
    assert_eq!(opened, Some(View::Notes));
    assert_eq!(workspace.notes()[0].note.title, "Hello");
}

/// **VALUE**: Verifies logout saves pending edits, then forgets the session.
///
/// **WHY THIS MATTERS**: Logging out within the autosave quiet period must
/// not lose the last edit, and the next user must not see the previous
/// user's notes.
///
/// **BUG THIS CATCHES**: Would catch the reset happening before the flush.
#[tokio::test]
async fn given_pending_edit_when_logging_out_then_saved_and_reset() {
    let (server, api) = start().await;
    mount_ok(&server, "GET", "/api/auth/me", user_json()).await;
    mount_ok(&server, "GET", "/api/tools/", tools_json()).await;
    mount_ok(
        &server,
        "GET",
        "/api/notes/",
        json!({ "notes": [{ "id": 5, "title": "Hello" }], "page": 1, "pages": 1, "total": 1, "per_page": 10 }),
    )
    .await;
    mount_ok(&server, "GET", "/api/notes/tags", json!([])).await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "note": null })))
        .expect(1)
        .mount(&server)
        .await;
    mount_ok(&server, "POST", "/api/auth/logout", json!({ "message": "ok" })).await;

    let state = AppState::new();
    auth::restore_session(&state, &api).await.unwrap();
    let mut workspace = NotesWorkspace::new(api.clone(), BufferEditorFactory::new(), &notes_config());
    let mut calc = Koculator::new();
    workspace.open().await.unwrap();
    calc.append('7');

    // GIVEN: An edit still inside its quiet period
    workspace.set_note_title(5, "Hello again").unwrap();

    // WHEN: Logging out
    auth::logout(&state, &api, &mut workspace, &mut calc).await.unwrap();

    // THEN: Everything is forgotten
    assert!(!state.is_logged_in().await);
    assert_eq!(state.get_view().await, View::Login);
    assert!(workspace.notes().is_empty());
    assert_eq!(calc.expr(), "");
}
