mod session;
mod shell;
mod state;
