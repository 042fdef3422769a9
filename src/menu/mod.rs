//! Group menus and their parent anchors

pub mod group_menu;
pub mod repository;
pub mod service;

pub use group_menu::{Anchor, GroupMenu, GroupMenuNaming};
pub use repository::{
    GroupMenuDirectory, GroupMenuLookup, GroupMenuRepository, MemoryGroupMenuRepository,
    SledGroupMenuRepository,
};
pub use service::GroupMenuService;
