//! Shadow link identifiers

use crate::types::LinkId;
use serde::{Deserialize, Serialize};

/// Reserved id prefix marking shadow links
pub const DEFAULT_SHADOW_PREFIX: &str = "gcm:";

/// Provider tag carried by every shadow link
pub const DEFAULT_SHADOW_PROVIDER: &str = "group_menu:shadow";

/// How shadow links are named and tagged.
///
/// The prefix is reserved: real link ids must never start with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowScheme {
    prefix: String,
    provider: String,
}

impl Default for ShadowScheme {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SHADOW_PREFIX.to_string(),
            provider: DEFAULT_SHADOW_PROVIDER.to_string(),
        }
    }
}

impl ShadowScheme {
    /// Returns `None` when either value is empty.
    pub fn new(prefix: impl Into<String>, provider: impl Into<String>) -> Option<Self> {
        let prefix = prefix.into();
        let provider = provider.into();
        if prefix.is_empty() || provider.is_empty() {
            return None;
        }
        Some(Self { prefix, provider })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn shadow_id(&self, real_id: &str) -> LinkId {
        format!("{}{}", self.prefix, real_id)
    }

    pub fn is_shadow_id(&self, id: &str) -> bool {
        id.starts_with(self.prefix.as_str())
    }

    /// Strip one level of shadow prefix; `None` if `id` is not a shadow id.
    pub fn real_id<'a>(&self, id: &'a str) -> Option<&'a str> {
        id.strip_prefix(self.prefix.as_str())
    }
}
