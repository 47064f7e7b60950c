//! Line-oriented front end.
//!
//! Each input line is parsed into a [`ShellCommand`], executed against the
//! session, and the current view is rendered back as text.

use crate::commands::{auth, toolbox};
use crate::error::FrunkError;
use crate::state::{AppState, StateCommand, View};

use common::{Credentials, NoteId, TagId};

use frunk_core::api::ApiClient;
use frunk_core::config::NotesConfig;
use frunk_core::editor::EditorFactory;
use frunk_core::editor::content::strip_html;
use frunk_core::koculator::{CalcKey, Koculator};
use frunk_core::notes::NotesWorkspace;
use frunk_core::notes::time::relative_time;
use frunk_core::pager::PageLabel;

use std::fmt::Write as _;
use std::str::FromStr;
use std::time::SystemTime;

use log::{debug, warn};

pub const HELP: &str = "\
session:   register <email> <password> | login <email> <password> | logout
toolbox:   tools | open <tool> | home
notes:     notes | new | draft-title <text> | draft-body <html> | draft-tag <tag>
           draft-save | draft-cancel
           edit <id> | type <id> <html> | title <id> <text> | done <id> | save <id>
           rm <id> | pin <id> | tag <id> <tag>
           search <text> | clear | filter <tag> | page <n> | prev | next
tags:      tags | tag-new <name> [color] | tag-edit <tag> <name> [color] | tag-rm <tag>
koculator: keys <keys> | bs | esc | eq
other:     dismiss | help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Register { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Tools,
    Open(String),
    Home,
    Notes,
    NewNote,
    DraftTitle(String),
    DraftBody(String),
    DraftTag(TagId),
    DraftSave,
    DraftCancel,
    Edit(NoteId),
    Type { note: NoteId, html: String },
    Title { note: NoteId, title: String },
    Done(NoteId),
    Save(NoteId),
    Remove(NoteId),
    Pin(NoteId),
    Tag { note: NoteId, tag: TagId },
    Search(String),
    Clear,
    Filter(TagId),
    Page(u32),
    Prev,
    Next,
    Tags,
    TagNew { name: String, color: Option<String> },
    TagEdit { tag: TagId, name: String, color: Option<String> },
    TagRemove(TagId),
    Keys(String),
    Backspace,
    Escape,
    Equals,
    Dismiss,
}

fn number<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, FrunkError> {
    let word = word.ok_or_else(|| FrunkError::shell(format!("missing {what}")))?;
    word.parse()
        .map_err(|_| FrunkError::shell(format!("'{word}' is not a valid {what}")))
}

fn text(rest: &str, what: &str) -> Result<String, FrunkError> {
    if rest.is_empty() {
        return Err(FrunkError::shell(format!("missing {what}")));
    }
    Ok(rest.to_string())
}

/// Split `"<first> <rest...>"`, trimming both.
fn split_first(line: &str) -> (&str, &str) {
    match line.trim().split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (line.trim(), ""),
    }
}

fn name_and_color(rest: &str) -> Result<(String, Option<String>), FrunkError> {
    let name = text(rest, "tag name")?;
    match name.rsplit_once(char::is_whitespace) {
        Some((name, color)) if color.starts_with('#') => {
            Ok((name.trim().to_string(), Some(color.to_string())))
        }
        _ => Ok((name, None)),
    }
}

fn credentials(rest: &str) -> Result<(String, String), FrunkError> {
    let (email, password) = split_first(rest);
    if email.is_empty() || password.is_empty() {
        return Err(FrunkError::shell("expected <email> <password>"));
    }
    Ok((email.to_string(), password.to_string()))
}

impl FromStr for ShellCommand {
    type Err = FrunkError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_first(line);
        let mut args = rest.split_whitespace();

        let command = match word {
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            "register" => {
                let (email, password) = credentials(rest)?;
                ShellCommand::Register { email, password }
            }
            "login" => {
                let (email, password) = credentials(rest)?;
                ShellCommand::Login { email, password }
            }
            "logout" => ShellCommand::Logout,
            "tools" => ShellCommand::Tools,
            "open" => ShellCommand::Open(text(rest, "tool")?),
            "home" => ShellCommand::Home,
            "notes" => ShellCommand::Notes,
            "new" => ShellCommand::NewNote,
            "draft-title" => ShellCommand::DraftTitle(rest.to_string()),
            "draft-body" => ShellCommand::DraftBody(rest.to_string()),
            "draft-tag" => ShellCommand::DraftTag(number(args.next(), "tag id")?),
            "draft-save" => ShellCommand::DraftSave,
            "draft-cancel" => ShellCommand::DraftCancel,
            "edit" => ShellCommand::Edit(number(args.next(), "note id")?),
            "type" => {
                let (id, html) = split_first(rest);
                ShellCommand::Type {
                    note: number(Some(id).filter(|id| !id.is_empty()), "note id")?,
                    html: html.to_string(),
                }
            }
            "title" => {
                let (id, title) = split_first(rest);
                ShellCommand::Title {
                    note: number(Some(id).filter(|id| !id.is_empty()), "note id")?,
                    title: title.to_string(),
                }
            }
            "done" => ShellCommand::Done(number(args.next(), "note id")?),
            "save" => ShellCommand::Save(number(args.next(), "note id")?),
            "rm" => ShellCommand::Remove(number(args.next(), "note id")?),
            "pin" => ShellCommand::Pin(number(args.next(), "note id")?),
            "tag" => ShellCommand::Tag {
                note: number(args.next(), "note id")?,
                tag: number(args.next(), "tag id")?,
            },
            "search" => ShellCommand::Search(rest.to_string()),
            "clear" => ShellCommand::Clear,
            "filter" => ShellCommand::Filter(number(args.next(), "tag id")?),
            "page" => ShellCommand::Page(number(args.next(), "page")?),
            "prev" => ShellCommand::Prev,
            "next" => ShellCommand::Next,
            "tags" => ShellCommand::Tags,
            "tag-new" => {
                let (name, color) = name_and_color(rest)?;
                ShellCommand::TagNew { name, color }
            }
            "tag-edit" => {
                let (id, rest) = split_first(rest);
                let (name, color) = name_and_color(rest)?;
                ShellCommand::TagEdit {
                    tag: number(Some(id).filter(|id| !id.is_empty()), "tag id")?,
                    name,
                    color,
                }
            }
            "tag-rm" => ShellCommand::TagRemove(number(args.next(), "tag id")?),
            "keys" => ShellCommand::Keys(text(rest, "keys")?),
            "bs" => ShellCommand::Backspace,
            "esc" => ShellCommand::Escape,
            "eq" | "=" => ShellCommand::Equals,
            "dismiss" => ShellCommand::Dismiss,
            "" => return Err(FrunkError::shell("empty command")),
            other => return Err(FrunkError::shell(format!("unknown command '{other}'"))),
        };
        Ok(command)
    }
}

impl ShellCommand {
    /// Commands usable without a session.
    fn is_public(&self) -> bool {
        matches!(
            self,
            ShellCommand::Help
                | ShellCommand::Quit
                | ShellCommand::Register { .. }
                | ShellCommand::Login { .. }
        )
    }
}

/// What the read loop should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and read the next line.
    Continue(String),
    Quit,
}

/// A session's views and the state behind them.
pub struct Shell<F: EditorFactory> {
    state: AppState,
    api: ApiClient,
    workspace: NotesWorkspace<F>,
    calc: Koculator,
}

impl<F: EditorFactory> Shell<F> {
    pub fn new(state: AppState, api: ApiClient, editor_factory: F, notes: &NotesConfig) -> Self {
        let workspace = NotesWorkspace::new(api.clone(), editor_factory, notes);
        Self {
            state,
            api,
            workspace,
            calc: Koculator::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn workspace(&self) -> &NotesWorkspace<F> {
        &self.workspace
    }

    pub fn calc(&self) -> &Koculator {
        &self.calc
    }

    /// Parse and run one input line.
    ///
    /// Errors are rendered into the output; only a dead state actor is returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<Outcome, FrunkError> {
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => return Ok(Outcome::Continue(format!("{}\n(type 'help')", e.message()))),
        };
        debug!("Shell command: {command:?}");

        self.sync_autosaves().await?;

        match self.execute(command).await {
            Ok(Outcome::Continue(note)) => {
                let mut out = note;
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&self.render().await);
                Ok(Outcome::Continue(out))
            }
            Ok(Outcome::Quit) => {
                self.shutdown().await;
                Ok(Outcome::Quit)
            }
            Err(e) if e.is_not_logged_in() => {
                self.route_to_login().await?;
                Ok(Outcome::Continue(format!("{}\n{}", e.message(), self.render().await)))
            }
            Err(e @ FrunkError::Frunk { .. }) => Err(e),
            Err(e) => Ok(Outcome::Continue(format!(
                "{}\n{}",
                e.message(),
                self.render().await
            ))),
        }
    }

    /// Run a parsed command. The returned text is shown above the view.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Outcome, FrunkError> {
        if !command.is_public() && !self.state.is_logged_in().await {
            return Err(FrunkError::not_logged_in());
        }

        let note = match command {
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(Outcome::Quit),

            ShellCommand::Register { email, password } => {
                auth::register(&self.api, &Credentials::new(email, password)).await?;
                String::from("Registered. Now log in.")
            }
            ShellCommand::Login { email, password } => {
                let user = auth::login(&self.state, &self.api, &Credentials::new(email, password))
                    .await?;
                format!("Welcome, {}", user.email)
            }
            ShellCommand::Logout => {
                auth::logout(&self.state, &self.api, &mut self.workspace, &mut self.calc).await?;
                String::from("Logged out.")
            }

            ShellCommand::Tools => {
                toolbox::refresh_toolbox(&self.state, &self.api).await?;
                self.state.update(StateCommand::SetView(View::Toolbox)).await?;
                String::new()
            }
            ShellCommand::Open(key) => {
                let tools = self.state.get_tools().await;
                let tool = toolbox::find_tool(&tools, &key)
                    .ok_or_else(|| FrunkError::shell(format!("no tool '{key}'")))?;
                match toolbox::open_tool(&self.state, tool, &mut self.workspace, &mut self.calc)
                    .await?
                {
                    Some(_) => String::new(),
                    None => format!("{} cannot be opened here", tool.name),
                }
            }
            ShellCommand::Home => {
                self.state.update(StateCommand::SetView(View::Toolbox)).await?;
                String::new()
            }

            ShellCommand::Notes => {
                self.workspace.open().await?;
                self.state.update(StateCommand::SetView(View::Notes)).await?;
                String::new()
            }
            ShellCommand::NewNote => {
                self.workspace.expand_new_note_form();
                String::new()
            }
            ShellCommand::DraftTitle(title) => {
                self.workspace.set_draft_title(title);
                String::new()
            }
            ShellCommand::DraftBody(html) => {
                self.workspace.set_draft_content(html);
                String::new()
            }
            ShellCommand::DraftTag(tag) => {
                self.workspace.toggle_tag_in_draft(tag);
                String::new()
            }
            ShellCommand::DraftSave => {
                if self.workspace.create_note().await? {
                    String::from("Note created.")
                } else {
                    String::from("Nothing to save.")
                }
            }
            ShellCommand::DraftCancel => {
                self.workspace.cancel_new_note();
                String::new()
            }
            ShellCommand::Edit(note) => {
                self.workspace.start_edit(note)?;
                String::new()
            }
            ShellCommand::Type { note, html } => {
                self.workspace.edit_note_content(note, html)?;
                String::new()
            }
            ShellCommand::Title { note, title } => {
                self.workspace.set_note_title(note, title)?;
                String::new()
            }
            ShellCommand::Done(note) => {
                self.workspace.finish_edit(note)?;
                String::new()
            }
            ShellCommand::Save(note) => {
                self.workspace.update_note(note).await?;
                String::from("Saved.")
            }
            ShellCommand::Remove(note) => {
                self.workspace.delete_note(note).await?;
                String::from("Deleted.")
            }
            ShellCommand::Pin(note) => {
                let pinned = self.workspace.toggle_pin(note).await?;
                String::from(if pinned { "Pinned." } else { "Unpinned." })
            }
            ShellCommand::Tag { note, tag } => {
                self.workspace.toggle_tag_in_note(note, tag).await?;
                String::new()
            }
            ShellCommand::Search(query) => {
                self.workspace.search(query).await?;
                String::new()
            }
            ShellCommand::Clear => {
                self.workspace.clear_search().await?;
                String::new()
            }
            ShellCommand::Filter(tag) => {
                self.workspace.filter_by_tag(tag).await?;
                String::new()
            }
            ShellCommand::Page(page) => {
                self.workspace.go_page(page).await?;
                String::new()
            }
            ShellCommand::Prev => {
                self.workspace.go_prev().await?;
                String::new()
            }
            ShellCommand::Next => {
                self.workspace.go_next().await?;
                String::new()
            }

            ShellCommand::Tags => {
                self.workspace.load_tags().await?;
                self.render_tags()
            }
            ShellCommand::TagNew { name, color } => {
                self.workspace.set_new_tag(name, color);
                let tag = self.workspace.create_tag().await?;
                format!("Created tag {} ({})", tag.name, tag.id)
            }
            ShellCommand::TagEdit { tag, name, color } => {
                self.workspace.start_edit_tag(tag)?;
                self.workspace.set_tag_edit(tag, name, color)?;
                if let Err(e) = self.workspace.save_tag_edit(tag).await {
                    self.workspace.cancel_tag_edit(tag)?;
                    return Err(e.into());
                }
                String::from("Tag updated.")
            }
            ShellCommand::TagRemove(tag) => {
                self.workspace.delete_tag(tag).await?;
                String::from("Tag deleted.")
            }

            ShellCommand::Keys(keys) => {
                for key in CalcKey::from_typed(&keys) {
                    self.calc.press(key, &self.api).await;
                }
                String::new()
            }
            ShellCommand::Backspace => {
                self.calc.backspace();
                String::new()
            }
            ShellCommand::Escape => {
                self.calc.clear();
                String::new()
            }
            ShellCommand::Equals => {
                self.calc.equals(&self.api).await;
                String::new()
            }

            ShellCommand::Dismiss => {
                self.workspace.dismiss_banner();
                String::new()
            }
        };

        Ok(Outcome::Continue(note))
    }

    /// Fold finished background saves in before acting on the next line.
    async fn sync_autosaves(&mut self) -> Result<(), FrunkError> {
        match self.workspace.sync_autosaves().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_auth_required() => self.route_to_login().await,
            // Already in the banner
            Err(_) => Ok(()),
        }
    }

    async fn route_to_login(&mut self) -> Result<(), FrunkError> {
        warn!("Session lost; returning to login");
        self.state.update(StateCommand::ClearSession).await?;
        self.workspace.reset();
        self.calc.clear();
        Ok(())
    }

    /// Save what is pending before the process exits.
    async fn shutdown(&mut self) {
        if let Err(e) = self.workspace.flush_autosaves().await {
            warn!("Unsaved edits could not be saved on exit: {e}");
        }
    }

    // ============================================
    // RENDERING
    // ============================================

    pub async fn render(&self) -> String {
        match self.state.get_view().await {
            View::Login => {
                String::from("Not logged in. Use 'login <email> <password>' or 'register <email> <password>'.")
            }
            View::Toolbox => self.render_toolbox().await,
            View::Notes => self.render_notes(),
            View::Koculator => self.render_koculator(),
        }
    }

    async fn render_toolbox(&self) -> String {
        let mut out = String::new();
        if let Some(user) = self.state.get_user().await {
            let _ = writeln!(out, "Logged in as {}", user.email);
        }
        let tools = self.state.get_tools().await;
        if tools.is_empty() {
            out.push_str("No tools available.");
            return out;
        }
        out.push_str("Tools:");
        for tool in &tools {
            let _ = write!(out, "\n  {:<12} {}", tool.id, tool.name);
            if !tool.description.is_empty() {
                let _ = write!(out, ": {}", tool.description);
            }
        }
        out
    }

    fn render_notes(&self) -> String {
        let ws = &self.workspace;
        let now = SystemTime::now();
        let mut out = String::new();

        if let Some(banner) = ws.banner() {
            let _ = writeln!(out, "! {banner}  (dismiss)");
        }
        if !ws.search_query().is_empty() || ws.selected_tag().is_some() {
            let tag = ws
                .selected_tag()
                .and_then(|id| ws.tags().iter().find(|row| row.tag.id == id))
                .map(|row| row.tag.name.as_str())
                .unwrap_or("-");
            let _ = writeln!(out, "search: '{}'  tag: {}", ws.search_query(), tag);
        }
        if ws.is_new_note_form_open() {
            let draft = ws.draft();
            let _ = writeln!(
                out,
                "new note: title='{}' body='{}' tags={:?}",
                draft.title,
                strip_html(&draft.content).trim(),
                draft.tag_ids
            );
        }

        if ws.notes().is_empty() {
            out.push_str("No notes.\n");
        }
        for row in ws.notes() {
            let note = &row.note;
            let pin = if note.is_pinned { "*" } else { " " };
            let tags: Vec<&str> = note.tags.iter().map(|tag| tag.name.as_str()).collect();
            let status = if ws.is_saving(note.id) {
                " (saving...)"
            } else if ws.just_saved(note.id) {
                " (saved)"
            } else {
                ""
            };
            let _ = write!(
                out,
                "{pin}{:>5}  {}  [{}]  {}{status}",
                note.id,
                note.title,
                tags.join(", "),
                relative_time(&note.updated_at, now)
            );
            if row.is_editing {
                let _ = write!(out, "\n       | {}", strip_html(&note.content).trim());
            }
            out.push('\n');
        }

        let pagination = ws.pagination();
        let labels: Vec<String> = ws
            .page_window()
            .into_iter()
            .map(|label| match label {
                PageLabel::Page(page) if page == pagination.page => format!("[{page}]"),
                other => other.to_string(),
            })
            .collect();
        let _ = write!(
            out,
            "pages: {}  ({} notes)",
            labels.join(" "),
            pagination.total
        );
        out
    }

    fn render_tags(&self) -> String {
        let tags = self.workspace.tags();
        if tags.is_empty() {
            return String::from("No tags.");
        }
        tags.iter()
            .map(|row| {
                format!(
                    "{:>5}  {} {} ({} notes)",
                    row.tag.id, row.tag.name, row.tag.color, row.tag.note_count
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_koculator(&self) -> String {
        let calc = &self.calc;
        let result = if calc.has_error() {
            format!("{}  (error)", calc.result())
        } else {
            calc.result().to_string()
        };
        format!("{}\n= {}", calc.expr(), result)
    }
}
