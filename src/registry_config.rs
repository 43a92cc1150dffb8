//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Default cap on the number of callbacks in one category.
pub const DEFAULT_MAX_CALLBACKS: usize = 30;

/// Default prefix marking a logger identity field as private.
pub const DEFAULT_PRIVATE_PREFIX: &str = "_";

/// Tunables for a [`CallbackRegistry`](crate::CallbackRegistry).
///
/// Every field has a default, so hosts can embed this in their own
/// configuration and set only what they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum number of callbacks per category. Adds beyond it are rejected.
    #[serde(default = "default_max_callbacks")]
    pub max_callbacks_per_category: usize,

    /// Identity fields whose name starts with this prefix are ignored when
    /// logger instances are deduplicated. Empty means every field counts.
    #[serde(default = "default_private_prefix")]
    pub private_field_prefix: String,
}

fn default_max_callbacks() -> usize {
    DEFAULT_MAX_CALLBACKS
}

fn default_private_prefix() -> String {
    DEFAULT_PRIVATE_PREFIX.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_callbacks_per_category: default_max_callbacks(),
            private_field_prefix: default_private_prefix(),
        }
    }
}

impl RegistryConfig {
    pub fn with_max_callbacks(mut self, max: usize) -> Self {
        self.max_callbacks_per_category = max;
        self
    }

    pub fn with_private_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.private_field_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.max_callbacks_per_category, 30);
        assert_eq!(config.private_field_prefix, "_");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"max_callbacks_per_category": 5}"#).unwrap();
        assert_eq!(config, RegistryConfig::default().with_max_callbacks(5));

        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = RegistryConfig::default()
            .with_max_callbacks(2)
            .with_private_prefix("private_");
        assert_eq!(config.max_callbacks_per_category, 2);
        assert_eq!(config.private_field_prefix, "private_");
    }
}
