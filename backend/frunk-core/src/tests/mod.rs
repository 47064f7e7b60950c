mod autosave;
mod config;
mod content;
mod editor;
mod koculator;
mod pager;
mod tags;
