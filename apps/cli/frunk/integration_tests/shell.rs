use crate::session::{mount_ok, start, tools_json, user_json};

use frunk::shell::{Outcome, Shell};
use frunk::state::{AppState, View};

use frunk_core::config::NotesConfig;
use frunk_core::editor::buffer::BufferEditorFactory;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn output(outcome: Outcome) -> String {
    match outcome {
        Outcome::Continue(text) => text,
        Outcome::Quit => panic!("unexpected quit"),
    }
}

/// **VALUE**: Verifies session-only commands are refused before login.
///
/// **BUG THIS CATCHES**: Would catch notes requests being sent without a session.
#[tokio::test]
async fn given_logged_out_when_notes_requested_then_asked_to_log_in() {
    let (_server, api) = start().await;
    let mut shell = Shell::new(
        AppState::new(),
        api,
        BufferEditorFactory::new(),
        &NotesConfig::default(),
    );

    let text = output(shell.handle_line("notes").await.unwrap());

    assert!(text.starts_with("Please log in"), "{text}");
    assert_eq!(shell.state().get_view().await, View::Login);
}

/// **VALUE**: Verifies a login-to-calculation session through the shell.
///
/// **WHY THIS MATTERS**: This is the path a user takes on every launch.
///
/// **BUG THIS CATCHES**: Would catch the toolbox, tool opening, or keyboard
/// mapping not being wired to the shell.
#[tokio::test]
async fn given_shell_when_logging_in_and_calculating_then_result_rendered() {
    let (server, api) = start().await;
    mount_ok(&server, "POST", "/api/auth/login", user_json()).await;
    mount_ok(&server, "GET", "/api/tools/", tools_json()).await;
    Mock::given(method("POST"))
        .and(path("/api/tools/koculator/calc"))
        .and(body_json(json!({ "expr": "12*3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": 36 })))
        .expect(1)
        .mount(&server)
        .await;
    let mut shell = Shell::new(
        AppState::new(),
        api,
        BufferEditorFactory::new(),
        &NotesConfig::default(),
    );

    let toolbox = output(shell.handle_line("login a@b.c pw").await.unwrap());
    assert!(toolbox.contains("Koculator"), "{toolbox}");

    shell.handle_line("open koculator").await.unwrap();
    let display = output(shell.handle_line("keys 12**3=").await.unwrap());

    assert_eq!(shell.calc().expr(), "12*3");
    assert!(display.contains("= 36"), "{display}");
}

/// **VALUE**: Verifies quitting flushes and ends the loop.
///
/// **BUG THIS CATCHES**: Would catch `quit` rendering instead of stopping.
#[tokio::test]
async fn given_shell_when_quit_then_loop_ends() {
    let (_server, api) = start().await;
    let mut shell = Shell::new(
        AppState::new(),
        api,
        BufferEditorFactory::new(),
        &NotesConfig::default(),
    );

    assert_eq!(shell.handle_line("quit").await.unwrap(), Outcome::Quit);
}
