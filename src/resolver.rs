//! Canonical names for logger types.
//!
//! Reports show logger instances by a short canonical name (e.g. `"langfuse"`)
//! rather than by their type tag. The mapping is owned by the host and only
//! read here.

use std::collections::HashMap;

/// Maps a logger type tag to its canonical callback name.
pub trait LoggerNameResolver: Send + Sync {
    fn callback_name(&self, type_tag: &str) -> Option<String>;
}

/// In-memory [`LoggerNameResolver`] backed by a map.
///
/// # Examples
///
/// ```rust
/// use callback_registry::{LoggerNameResolver, StaticNameRegistry};
///
/// let names = StaticNameRegistry::from_pairs([("LangfuseLogger", "langfuse")]);
/// assert_eq!(names.callback_name("LangfuseLogger").as_deref(), Some("langfuse"));
/// assert_eq!(names.callback_name("Unknown"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticNameRegistry {
    names: HashMap<String, String>,
}

impl StaticNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(tag, name)| (tag.into(), name.into()))
                .collect(),
        }
    }

    /// Map `type_tag` to `name`, replacing any previous mapping.
    pub fn insert(&mut self, type_tag: impl Into<String>, name: impl Into<String>) {
        self.names.insert(type_tag.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl LoggerNameResolver for StaticNameRegistry {
    fn callback_name(&self, type_tag: &str) -> Option<String> {
        self.names.get(type_tag).cloned()
    }
}

impl<F> LoggerNameResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn callback_name(&self, type_tag: &str) -> Option<String> {
        self(type_tag)
    }
}
