use common::{Tool, User};

use frunk::state::{AppState, StateCommand, View};

// ============================================================================
// Integration tests for the state actor
// ============================================================================

fn user() -> User {
    User {
        id: 1,
        email: "a@b.c".to_string(),
    }
}

/// **VALUE**: Verifies an update is visible as soon as `update` returns.
///
/// **WHY THIS MATTERS**: Commands read the state right after changing it
/// (login then render); a lagging actor would show the previous view.
///
/// **BUG THIS CATCHES**: Would catch `update` returning before the actor applied the command.
#[tokio::test]
async fn given_fresh_state_when_updated_then_read_back_immediately() {
    // GIVEN: Fresh AppState on the login view
    let state = AppState::new();
    assert_eq!(state.get_view().await, View::Login);
    assert!(!state.is_logged_in().await);

    // WHEN: A user logs in and the toolbox opens
    state.update(StateCommand::SetUser(user())).await.unwrap();
    state.update(StateCommand::SetView(View::Toolbox)).await.unwrap();

    // THEN: Both are visible without yielding
    assert_eq!(state.get_user().await, Some(user()));
    assert_eq!(state.get_view().await, View::Toolbox);
}

/// **VALUE**: Verifies clearing the session forgets user and tools and returns to login.
///
/// **BUG THIS CATCHES**: Would catch tools from the previous user surviving logout.
#[tokio::test]
async fn given_logged_in_state_when_session_cleared_then_everything_reset() {
    let state = AppState::new();
    state.update(StateCommand::SetUser(user())).await.unwrap();
    state
        .update(StateCommand::SetTools(vec![Tool {
            id: "notes".to_string(),
            name: "Notes".to_string(),
            description: String::new(),
            entry: None,
        }]))
        .await
        .unwrap();
    state.update(StateCommand::SetView(View::Notes)).await.unwrap();

    state.update(StateCommand::ClearSession).await.unwrap();

    assert_eq!(state.get_user().await, None);
    assert!(state.get_tools().await.is_empty());
    assert_eq!(state.get_view().await, View::Login);
}

/// **VALUE**: Verifies clones share one actor and one state.
///
/// **WHY THIS MATTERS**: Commands receive clones of the state handle.
///
/// **BUG THIS CATCHES**: Would catch each clone lazily spawning its own actor and state.
#[tokio::test]
async fn given_cloned_handles_when_one_updates_then_other_sees_it() {
    let state = AppState::new();
    let clone = state.clone();

    clone.update(StateCommand::SetView(View::Koculator)).await.unwrap();

    assert_eq!(state.get_view().await, View::Koculator);
}

/// **VALUE**: Verifies tool view names map to views this client can show.
///
/// **BUG THIS CATCHES**: Would catch unknown tool views being accepted.
#[test]
fn given_tool_view_names_when_mapped_then_only_known_views() {
    assert_eq!(View::from_tool_view("notes"), Some(View::Notes));
    assert_eq!(View::from_tool_view("koculator"), Some(View::Koculator));
    assert_eq!(View::from_tool_view("weather"), None);
}
