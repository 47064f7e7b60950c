use crate::error::FrunkError;

use common::{ErrorLocation, Tool, User};

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};

/// Which screen the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Toolbox,
    Notes,
    Koculator,
}

impl View {
    /// Map a tool's `entry.view` name to a view this client can show.
    pub fn from_tool_view(name: &str) -> Option<View> {
        match name {
            "notes" => Some(View::Notes),
            "koculator" => Some(View::Koculator),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Toolbox => "toolbox",
            View::Notes => "notes",
            View::Koculator => "koculator",
        };
        write!(f, "{name}")
    }
}

/// Commands that mutate application state.
///
/// All state mutations go through the state actor via these commands.
#[derive(Debug, Clone)]
pub enum StateCommand {
    /// A session was established or restored
    SetUser(User),

    /// Logged out or session lost: forget user and tools, back to login
    ClearSession,

    SetView(View),

    SetTools(Vec<Tool>),
}

/// A command and the channel its completion is acknowledged on.
type Envelope = (StateCommand, oneshot::Sender<()>);

#[derive(Default)]
struct Session {
    user: Option<User>,
    view: View,
    tools: Vec<Tool>,
}

/// Application state manager.
///
/// Uses an actor pattern so mutations are applied one at a time by a
/// dedicated task. `update` returns once its command has been applied, so a
/// read after an update sees it. Reads go straight to the shared `RwLock`.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send state mutation commands to the actor
    command_tx: Arc<Mutex<Option<mpsc::Sender<Envelope>>>>,

    session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create a new state manager.
    ///
    /// The actor will be lazily spawned on first use within an async context.
    pub fn new() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Apply a state update command.
    ///
    /// Returns an error if the state actor has died (should never happen).
    #[track_caller]
    pub fn update(
        &self,
        cmd: StateCommand,
    ) -> impl Future<Output = Result<(), FrunkError>> + Send + '_ {
        let location = ErrorLocation::caller();
        async move {
            let actor_died = |message: String| FrunkError::Frunk { message, location };

            let tx = self.ensure_actor().await;
            let (ack_tx, ack_rx) = oneshot::channel();
            tx.send((cmd, ack_tx))
                .await
                .map_err(|e| actor_died(format!("State actor died: {e}")))?;
            ack_rx
                .await
                .map_err(|e| actor_died(format!("State actor dropped command: {e}")))
        }
    }

    pub async fn get_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.user.is_some()
    }

    pub async fn get_view(&self) -> View {
        self.session.read().await.view
    }

    pub async fn get_tools(&self) -> Vec<Tool> {
        self.session.read().await.tools.clone()
    }

    /// Sender to the actor, spawning it on first use.
    async fn ensure_actor(&self) -> mpsc::Sender<Envelope> {
        let mut tx_guard = self.command_tx.lock().await;
        if let Some(tx) = tx_guard.as_ref() {
            return tx.clone();
        }

        let (tx, rx) = mpsc::channel(100);
        *tx_guard = Some(tx.clone());
        drop(tx_guard);

        tokio::spawn(state_actor(rx, Arc::clone(&self.session)));
        info!("State actor spawned");
        tx
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state actor task.
///
/// Owns the mutable state and processes commands sequentially.
async fn state_actor(mut command_rx: mpsc::Receiver<Envelope>, session: Arc<RwLock<Session>>) {
    info!("State actor started");

    while let Some((cmd, ack)) = command_rx.recv().await {
        let mut session = session.write().await;

        match cmd {
            StateCommand::SetUser(user) => {
                match &session.user {
                    Some(existing) if existing.id != user.id => {
                        warn!("Replacing session of {} with {}", existing.email, user.email)
                    }
                    _ => info!("Session user: {}", user.email),
                }
                session.user = Some(user);
            }
            StateCommand::ClearSession => {
                match session.user.take() {
                    Some(old) => info!("Clearing session of {}", old.email),
                    None => debug!("Clear session requested but nobody was logged in"),
                }
                session.tools.clear();
                session.view = View::Login;
            }
            StateCommand::SetView(view) => {
                debug!("View: {} -> {}", session.view, view);
                session.view = view;
            }
            StateCommand::SetTools(tools) => {
                debug!("Toolbox has {} tools", tools.len());
                session.tools = tools;
            }
        }

        drop(session);
        // The caller may have stopped waiting
        let _ = ack.send(());
    }

    warn!("State actor stopped - this should not happen during normal operation");
}
