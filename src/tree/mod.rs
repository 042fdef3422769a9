//! Menu link definitions and tree views

pub mod node;
pub mod params;
pub mod resolve;

pub use node::{LinkDefinition, LinkKind, LinkUpdate};
pub use params::{flatten, TreeElement, TreeParameters};
pub use resolve::{MenuTreeResolver, ResolvedLink};
