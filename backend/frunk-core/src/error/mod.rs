pub mod api;
pub mod config;
pub mod workspace;

pub use api::ApiError;
pub use config::ConfigError;
pub use workspace::{ValidationFailure, WorkspaceError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Model(#[from] common::ModelError),
}
