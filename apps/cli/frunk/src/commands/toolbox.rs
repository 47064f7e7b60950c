use crate::error::FrunkError;
use crate::state::{AppState, StateCommand, View};

use common::Tool;

use frunk_core::api::ApiClient;
use frunk_core::editor::EditorFactory;
use frunk_core::koculator::Koculator;
use frunk_core::notes::NotesWorkspace;

use log::{debug, info, warn};

/// Reload the tool list. A failure leaves the toolbox empty.
pub async fn refresh_toolbox(state: &AppState, api: &ApiClient) -> Result<Vec<Tool>, FrunkError> {
    let tools = match api.list_tools().await {
        Ok(tools) => tools,
        Err(e) => {
            warn!("Failed to list tools: {e}");
            Vec::new()
        }
    };

    state.update(StateCommand::SetTools(tools.clone())).await?;
    Ok(tools)
}

/// Find a tool by id or (case-insensitive) name.
pub fn find_tool<'a>(tools: &'a [Tool], key: &str) -> Option<&'a Tool> {
    tools
        .iter()
        .find(|tool| tool.id == key || tool.name.eq_ignore_ascii_case(key))
}

/// Switch to a tool's view.
///
/// # Returns
///
/// * `Ok(Some(View))` - The view now showing
/// * `Ok(None)` - The tool has no view this client can show; nothing changed
/// * `Err(FrunkError)` - Loading the view failed
pub async fn open_tool<F: EditorFactory>(
    state: &AppState,
    tool: &Tool,
    workspace: &mut NotesWorkspace<F>,
    calc: &mut Koculator,
) -> Result<Option<View>, FrunkError> {
    let Some(view_name) = tool.view() else {
        debug!("Tool {} has no view", tool.id);
        return Ok(None);
    };
    let Some(view) = View::from_tool_view(view_name) else {
        warn!("Tool {} asks for unknown view '{view_name}'", tool.id);
        return Ok(None);
    };

    match view {
        View::Notes => workspace.open().await?,
        View::Koculator => calc.clear_error(),
        View::Login | View::Toolbox => {}
    }

    state.update(StateCommand::SetView(view)).await?;
    info!("Opened {}", tool.name);
    Ok(Some(view))
}
