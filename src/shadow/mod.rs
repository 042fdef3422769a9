//! Shadow links
//!
//! A shadow is a proxy copy of a group-menu link placed into the menu the
//! group menu is anchored to. This module derives shadow ids and definitions
//! and keeps the stored shadows in step with the real links.

pub mod definition;
pub mod id;
pub mod sync;

pub use definition::compute_shadow_definition;
pub use id::ShadowScheme;
pub use sync::{
    AnchorChangeReport, ShadowSynchronizer, SyncContext, SyncOutcome, MAX_GRAFT_HOPS,
};
