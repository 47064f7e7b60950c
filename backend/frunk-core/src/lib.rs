pub mod api;
pub mod autosave;
pub mod config;
pub mod editor;
pub mod error;
pub mod koculator;
pub mod notes;
pub mod pager;

#[cfg(test)]
mod tests;

pub const FRUNK_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const FRUNK_SERVER_PORT: u16 = 5003;
pub const DEFAULT_API_ROOT: &str =
    const_format::concatcp!("http://", FRUNK_SERVER_HOSTNAME, ":", FRUNK_SERVER_PORT, "/api/");
