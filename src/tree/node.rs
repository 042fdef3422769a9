//! Menu link definitions and partial updates

use crate::types::LinkId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which link implementation a definition instantiates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkKind {
    /// Hand-authored link stored as content
    #[default]
    Content,
    /// Link found by discovery; may be reset to its discovered values
    Static,
    /// Shadow link forwarding to the real link named in its metadata
    Proxy,
}

/// A menu link as held by tree storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub id: LinkId,
    pub menu_name: String,
    /// Parent link in the same menu; `None` for a root link
    pub parent: Option<LinkId>,
    pub weight: i32,
    pub title: String,
    pub description: String,
    pub route_name: Option<String>,
    pub route_parameters: BTreeMap<String, String>,
    pub url: Option<String>,
    pub options: BTreeMap<String, String>,
    pub expanded: bool,
    pub enabled: bool,
    /// `false` keeps the link alive across discovery rebuilds
    pub discovered: bool,
    pub provider: String,
    pub kind: LinkKind,
    pub metadata: BTreeMap<String, String>,
}

impl LinkDefinition {
    /// Create an enabled root content link with the given title.
    pub fn new(id: impl Into<LinkId>, menu_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            menu_name: menu_name.into(),
            parent: None,
            weight: 0,
            title: title.into(),
            description: String::new(),
            route_name: None,
            route_parameters: BTreeMap::new(),
            url: None,
            options: BTreeMap::new(),
            expanded: false,
            enabled: true,
            discovered: false,
            provider: String::new(),
            kind: LinkKind::Content,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<LinkId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Partial update of a link definition.
///
/// Every `None` field leaves the stored value untouched. `parent` is doubly
/// optional: `Some(None)` moves the link to the menu root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkUpdate {
    pub menu_name: Option<String>,
    pub parent: Option<Option<LinkId>>,
    pub weight: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<Option<String>>,
    pub options: Option<BTreeMap<String, String>>,
    pub expanded: Option<bool>,
    pub enabled: Option<bool>,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl LinkUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn parent(parent: Option<LinkId>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge these values onto `definition`, returning the full result.
    pub fn apply(&self, definition: &LinkDefinition) -> LinkDefinition {
        let mut merged = definition.clone();
        if let Some(menu_name) = &self.menu_name {
            merged.menu_name = menu_name.clone();
        }
        if let Some(parent) = &self.parent {
            merged.parent = parent.clone();
        }
        if let Some(weight) = self.weight {
            merged.weight = weight;
        }
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(url) = &self.url {
            merged.url = url.clone();
        }
        if let Some(options) = &self.options {
            merged.options = options.clone();
        }
        if let Some(expanded) = self.expanded {
            merged.expanded = expanded;
        }
        if let Some(enabled) = self.enabled {
            merged.enabled = enabled;
        }
        if let Some(metadata) = &self.metadata {
            merged.metadata = metadata.clone();
        }
        merged
    }
}
