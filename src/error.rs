//! Error types
//!
//! Three layers: tree storage, menu links (manager and plugins), and the
//! service/CLI surface. Lower layers convert upward with `#[from]`.

use crate::types::LinkId;
use thiserror::Error;

/// Errors raised by tree storage and its backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Menu link not found: {0}")]
    NotFound(LinkId),

    #[error("Parent {parent} of menu link {id} does not exist")]
    ParentNotFound { id: LinkId, parent: LinkId },

    #[error("Parent {parent} of menu link {id} is in menu {parent_menu}, not {menu}")]
    ParentInOtherMenu {
        id: LinkId,
        parent: LinkId,
        menu: String,
        parent_menu: String,
    },

    #[error("Moving menu link {id} under {parent} would create a cycle")]
    Cycle { id: LinkId, parent: LinkId },

    #[error("Menu link {id} would reach depth {depth}, maximum is {max}")]
    DepthExceeded { id: LinkId, depth: usize, max: usize },

    #[error("Storage backend error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Failed to encode or decode a stored record: {0}")]
    Codec(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by link managers and link plugins
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Menu link definition not found: {0}")]
    NotFound(LinkId),

    #[error("Menu link {0} already exists")]
    AlreadyExists(LinkId),

    /// A shadow link whose real link can no longer be resolved.
    #[error("Shadow link {shadow} points at missing menu link {target}")]
    MissingTarget { shadow: LinkId, target: LinkId },

    #[error("Menu link {0} is not resettable")]
    NotResettable(LinkId),

    #[error("Menu link {0} is not deletable")]
    NotDeletable(LinkId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by services and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Group menu not found: {0}")]
    GroupMenuNotFound(u64),

    #[error("Invalid parent anchor: {0}")]
    InvalidAnchor(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
