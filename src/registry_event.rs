use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::rejection::Rejection;

/// Events emitted by the callback registry during operations.
///
/// These events are passed to the trace callback set via `set_trace_callback`.
/// The `Clone` derive allows trace callbacks to store or forward events.
///
/// # Examples
///
/// ```rust
/// use callback_registry::{Category, RegistryEvent};
///
/// let event = RegistryEvent::Added {
///     category: Category::Success,
///     callback: "datadog".to_string(),
/// };
/// assert_eq!(event.to_string(), "added { category: success, callback: datadog }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A callback was appended to a category.
    Added {
        category: Category,
        /// Display name of the callback.
        callback: String,
    },

    /// An add was rejected and the category left unchanged.
    Rejected {
        category: Category,
        reason: Rejection,
    },

    /// Callbacks were removed from a category.
    Removed {
        category: Category,
        /// How many callbacks were removed.
        count: usize,
    },

    /// Every category was cleared.
    Reset {},
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Added { category, callback } => {
                write!(f, "added {{ category: {category}, callback: {callback} }}")
            }
            RegistryEvent::Rejected { category, reason } => {
                write!(f, "rejected {{ category: {category}, reason: {reason} }}")
            }
            RegistryEvent::Removed { category, count } => {
                write!(f, "removed {{ category: {category}, count: {count} }}")
            }
            RegistryEvent::Reset {} => write!(f, "Resetting all callbacks"),
        }
    }
}

/// User-supplied trace callback.
///
/// It receives every [`RegistryEvent`] and must be thread-safe because the
/// registry is shared across threads.
pub type TraceCallback = Arc<dyn Fn(&RegistryEvent) + Send + Sync + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_event_display() {
        let event = RegistryEvent::Removed {
            category: Category::General,
            count: 3,
        };
        assert_eq!(event.to_string(), "removed { category: general, count: 3 }");

        let event = RegistryEvent::Rejected {
            category: Category::Input,
            reason: Rejection::DuplicateHandle {
                category: Category::Input,
                key: "x".to_string(),
            },
        };
        assert_eq!(
            event.to_string(),
            "rejected { category: input, reason: callback x already exists in input }"
        );

        assert_eq!(RegistryEvent::Reset {}.to_string(), "Resetting all callbacks");
    }

    #[test]
    fn test_registry_event_clone() {
        let event = RegistryEvent::Added {
            category: Category::Failure,
            callback: "sentry".to_string(),
        };
        let cloned = event.clone();
        assert_eq!(event, cloned);
    }
}
