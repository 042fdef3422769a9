//! Group menu entity and its parent anchor

use crate::types::{GroupMenuId, LinkId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default prefix of every group menu's menu name
pub const DEFAULT_MENU_PREFIX: &str = "group_menu_link_content-";

/// Where a group menu is grafted: a link in another menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub menu_name: String,
    pub link_id: LinkId,
}

impl Anchor {
    pub fn new(menu_name: impl Into<String>, link_id: impl Into<LinkId>) -> Self {
        Self {
            menu_name: menu_name.into(),
            link_id: link_id.into(),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.menu_name, self.link_id)
    }
}

impl FromStr for Anchor {
    type Err = String;

    /// Parses `<menu>:<link-id>`. Menu names never contain `:`, link ids may.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((menu, link)) if !menu.is_empty() && !link.is_empty() => {
                Ok(Anchor::new(menu, link))
            }
            _ => Err(format!("expected <menu>:<link-id>, got '{}'", s)),
        }
    }
}

/// A menu owned by a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMenu {
    pub id: GroupMenuId,
    pub label: String,
    /// Owning group, when known
    pub group_id: Option<u64>,
    /// `None` means standalone, not grafted anywhere
    pub anchor: Option<Anchor>,
}

impl GroupMenu {
    pub fn new(id: GroupMenuId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            group_id: None,
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Maps group menu ids to menu names and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMenuNaming {
    prefix: String,
}

impl Default for GroupMenuNaming {
    fn default() -> Self {
        Self::new(DEFAULT_MENU_PREFIX)
    }
}

impl GroupMenuNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn menu_name(&self, id: GroupMenuId) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Parse a menu name back to its group menu id.
    ///
    /// Only `<prefix><decimal digits>` qualifies; anything else is `None`.
    pub fn parse(&self, menu_name: &str) -> Option<GroupMenuId> {
        let digits = menu_name.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_name_round_trip() {
        let naming = GroupMenuNaming::default();
        assert_eq!(naming.menu_name(7), "group_menu_link_content-7");
        assert_eq!(naming.parse("group_menu_link_content-7"), Some(7));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let naming = GroupMenuNaming::default();
        assert_eq!(naming.parse("main"), None);
        assert_eq!(naming.parse("group_menu_link_content-"), None);
        assert_eq!(naming.parse("group_menu_link_content-7a"), None);
        assert_eq!(naming.parse("group_menu_link_content--7"), None);
        assert_eq!(naming.parse("group_menu_link_content-99999999999999999999999"), None);
    }

    #[test]
    fn test_anchor_parse() {
        let anchor: Anchor = "main:menu_link_content:42".parse().unwrap();
        assert_eq!(anchor.menu_name, "main");
        assert_eq!(anchor.link_id, "menu_link_content:42");
        assert_eq!(anchor.to_string(), "main:menu_link_content:42");
        assert!("main".parse::<Anchor>().is_err());
        assert!(":x".parse::<Anchor>().is_err());
        assert!("main:".parse::<Anchor>().is_err());
    }
}
