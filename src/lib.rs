//! Menugraft: Group Menu Grafting
//!
//! Group menus are ordinary menus owned by a group. Anchoring one to a link
//! in another menu grafts it there: every link of the group menu gets a
//! shadow link in the target menu, kept in step as links and anchors change.

pub mod api;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod manager;
pub mod menu;
pub mod shadow;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use api::MenuSystem;
pub use error::{ApiError, LinkError, StorageError};
