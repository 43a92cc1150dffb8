//! Callback categories.
//!
//! Every handle lives in one or more categories. Each category is an
//! independent, insertion-ordered list with its own capacity cap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The lists a callback can be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Notified on every outcome.
    General,
    /// Notified before a request is dispatched.
    Input,
    /// Notified on successful outcomes.
    Success,
    /// Notified on failed outcomes.
    Failure,
    /// Async counterpart of `Success`.
    AsyncSuccess,
    /// Async counterpart of `Failure`.
    AsyncFailure,
    /// Service health callbacks.
    Service,
}

impl Category {
    /// Every category, in storage order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Input,
        Category::Success,
        Category::Failure,
        Category::AsyncSuccess,
        Category::AsyncFailure,
        Category::Service,
    ];

    /// Categories that make up the aggregate seen by the dispatch layer, in order.
    ///
    /// `Input` and `Service` are tracked separately and are not part of it.
    pub const AGGREGATE: [Category; 5] = [
        Category::General,
        Category::Success,
        Category::Failure,
        Category::AsyncSuccess,
        Category::AsyncFailure,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Input => "input",
            Category::Success => "success",
            Category::Failure => "failure",
            Category::AsyncSuccess => "async_success",
            Category::AsyncFailure => "async_failure",
            Category::Service => "service",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category name does not match any [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown callback category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
