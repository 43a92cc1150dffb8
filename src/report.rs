//! Success/failure classification of registered callbacks.

use serde::{Deserialize, Serialize};

/// Registered callbacks grouped by the outcomes they are notified of.
///
/// Each list holds display names, deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbacksByType {
    /// Notified on success only.
    pub success: Vec<String>,
    /// Notified on failure only.
    pub failure: Vec<String>,
    /// Notified on both, either through the general list or through both outcome lists.
    pub success_and_failure: Vec<String>,
}

impl CallbacksByType {
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.failure.is_empty() && self.success_and_failure.is_empty()
    }

    /// Sort and deduplicate every bucket.
    pub(crate) fn normalize(&mut self) {
        for bucket in [
            &mut self.success,
            &mut self.failure,
            &mut self.success_and_failure,
        ] {
            bucket.sort();
            bucket.dedup();
        }
    }
}
