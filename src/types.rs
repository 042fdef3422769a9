//! Core types for the group menu grafting system.

/// LinkId: globally unique menu link identifier across all menus
pub type LinkId = String;

/// GroupMenuId: numeric identifier of a group menu entity
pub type GroupMenuId = u64;

/// Provider tag for links owned by a group menu
pub const GROUP_MENU_PROVIDER: &str = "group_menu";

/// Metadata key on a shadow definition naming the real link it mirrors
pub const SHADOW_OF_KEY: &str = "shadow_of";
