use super::core_error;
use super::toolbox::refresh_toolbox;
use crate::error::FrunkError;
use crate::state::{AppState, StateCommand, View};

use common::{Credentials, User};

use frunk_core::api::ApiClient;
use frunk_core::editor::EditorFactory;
use frunk_core::koculator::Koculator;
use frunk_core::notes::NotesWorkspace;

use log::{debug, info, warn};

/// Pick up an existing session cookie on startup.
///
/// # Returns
///
/// * `Ok(Some(User))` - Session restored, toolbox loaded
/// * `Ok(None)` - No usable session; the login view is shown
/// * `Err(FrunkError)` - The state actor failed
pub async fn restore_session(
    state: &AppState,
    api: &ApiClient,
) -> Result<Option<User>, FrunkError> {
    match api.me().await {
        Ok(user) => {
            info!("Restored session for {}", user.email);
            enter_toolbox(state, api, user.clone()).await?;
            Ok(Some(user))
        }
        Err(e) => {
            debug!("No session to restore: {e}");
            state.update(StateCommand::ClearSession).await?;
            Ok(None)
        }
    }
}

/// Create an account. The user still has to log in afterwards.
pub async fn register(api: &ApiClient, credentials: &Credentials) -> Result<(), FrunkError> {
    api.register(credentials)
        .await
        .map_err(|e| core_error("Registration failed", e))
}

pub async fn login(
    state: &AppState,
    api: &ApiClient,
    credentials: &Credentials,
) -> Result<User, FrunkError> {
    let user = api
        .login(credentials)
        .await
        .map_err(|e| core_error("Login failed", e))?;

    enter_toolbox(state, api, user.clone()).await?;
    Ok(user)
}

/// Log out and forget everything that belonged to the session.
///
/// Pending note edits are saved first; a failure there is logged and does
/// not block the logout.
pub async fn logout<F: EditorFactory>(
    state: &AppState,
    api: &ApiClient,
    workspace: &mut NotesWorkspace<F>,
    calc: &mut Koculator,
) -> Result<(), FrunkError> {
    match workspace.flush_autosaves().await {
        Ok(0) => {}
        Ok(saved) => info!("Saved {saved} pending edits before logout"),
        Err(e) => warn!("Could not save pending edits before logout: {e}"),
    }

    api.logout()
        .await
        .map_err(|e| core_error("Logout failed", e))?;

    state.update(StateCommand::ClearSession).await?;
    workspace.reset();
    calc.clear();
    info!("Logged out");
    Ok(())
}

async fn enter_toolbox(state: &AppState, api: &ApiClient, user: User) -> Result<(), FrunkError> {
    state.update(StateCommand::SetUser(user)).await?;
    refresh_toolbox(state, api).await?;
    state.update(StateCommand::SetView(View::Toolbox)).await
}
