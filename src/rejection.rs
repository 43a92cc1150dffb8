//! Why a registry operation did nothing.
//!
//! Registration never fails from the caller's point of view. A rejected add is
//! a no-op that is logged and reported back as a value the caller may ignore.

use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The category already holds the maximum number of callbacks.
    #[error("cannot add callback to {category}: limit of {max} callbacks reached")]
    CapacityExceeded { category: Category, max: usize },

    /// A callback with the same identity is already in the category.
    #[error("callback {key} already exists in {category}")]
    DuplicateHandle { category: Category, key: String },

    /// The value is not a name, a function callback or a logger instance.
    #[error("value is not a recognized callback shape")]
    UnsupportedHandleShape,

    /// The removal target does not name a callback category.
    #[error("{name} is not a callback category")]
    MalformedRemovalTarget { name: String },
}

/// Result of an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Rejected(Rejection),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AddOutcome::Added => None,
            AddOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}
