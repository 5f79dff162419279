use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the terminal front end.
///
/// The dock itself never fails; these only come from configuration and the
/// terminal plumbing around it.
#[derive(Debug, Error)]
pub enum DockError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DockError>;
