//! Tree loading parameters and loaded tree elements

use crate::tree::node::LinkDefinition;
use crate::types::LinkId;
use std::collections::BTreeSet;

/// Parameters controlling which part of a menu tree is loaded
#[derive(Debug, Clone, Default)]
pub struct TreeParameters {
    /// Load only the subtree below this link (the link itself excluded)
    pub root: Option<LinkId>,
    /// Minimum depth (1-based, relative to the menu root)
    pub min_depth: Option<usize>,
    /// Maximum depth (1-based, relative to the menu root)
    pub max_depth: Option<usize>,
    /// Skip disabled links and their subtrees
    pub only_enabled: bool,
    /// When set, children are loaded only below these parents
    pub expanded_parents: Option<BTreeSet<LinkId>>,
    /// Links whose provider starts with any of these are left out
    pub exclude_provider_prefixes: Vec<String>,
    /// Include shadow links; authoring listings leave this off
    pub include_shadows: bool,
}

impl TreeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for walking every link of a menu, shadows included.
    pub fn all() -> Self {
        Self {
            include_shadows: true,
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<LinkId>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn only_enabled(mut self) -> Self {
        self.only_enabled = true;
        self
    }

    pub fn with_shadows(mut self) -> Self {
        self.include_shadows = true;
        self
    }

    pub fn exclude_provider_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_provider_prefixes.push(prefix.into());
        self
    }

    pub(crate) fn excludes_provider(&self, provider: &str) -> bool {
        self.exclude_provider_prefixes
            .iter()
            .any(|prefix| provider.starts_with(prefix.as_str()))
    }
}

/// A loaded link with its loaded children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeElement {
    pub definition: LinkDefinition,
    /// 1-based depth in the menu
    pub depth: usize,
    /// Whether the link has children in storage, loaded or not
    pub has_children: bool,
    pub children: Vec<TreeElement>,
}

impl TreeElement {
    /// Visit this element and its descendants, parent before children.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a LinkDefinition>) {
        out.push(&self.definition);
        for child in &self.children {
            child.walk(out);
        }
    }
}

/// Flatten a loaded tree into parent-before-children order.
pub fn flatten(tree: &[TreeElement]) -> Vec<&LinkDefinition> {
    let mut out = Vec::new();
    for element in tree {
        element.walk(&mut out);
    }
    out
}
