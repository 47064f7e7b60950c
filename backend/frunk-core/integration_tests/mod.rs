mod api;
mod helpers;
mod koculator;
mod notes_workspace;
