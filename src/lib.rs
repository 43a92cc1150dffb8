//! # Callback Registry
//!
//! A thread-safe registry of observer callbacks, split into categories
//! (general, input, success, failure, async success, async failure, service).
//!
//! Callbacks are registered by name, by function value, or by stateful logger
//! instance. Each category deduplicates what it holds and is capped at a fixed
//! size; both rules are enforced silently, so registration never fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use callback_registry::{CallbackHandle, CallbackRegistry, Category, CustomLogger, FieldValue};
//!
//! struct StatsdLogger {
//!     host: String,
//! }
//!
//! impl CustomLogger for StatsdLogger {
//!     fn identity_fields(&self) -> Vec<(&'static str, FieldValue)> {
//!         vec![("host", self.host.as_str().into())]
//!     }
//! }
//!
//! let registry = CallbackRegistry::new();
//!
//! // Two instances with the same configuration are one callback
//! registry.add_callback(CallbackHandle::logger(StatsdLogger { host: "localhost".into() }));
//! registry.add_callback(CallbackHandle::logger(StatsdLogger { host: "localhost".into() }));
//! assert_eq!(registry.len(Category::General), 1);
//!
//! assert!(registry.is_active("StatsdLogger"));
//! ```
//!
//! ## Identity
//!
//! - **Names** compare by value.
//! - **Function callbacks** compare by the callable they wrap.
//! - **Logger instances** compare by type tag plus their public identity fields.
//!
//! ## Main Types
//!
//! - [`CallbackRegistry`] - The registry itself
//! - [`CallbackHandle`] - A name, function callback or logger instance
//! - [`CustomLogger`] - Capability contract for stateful loggers
//! - [`CallbacksByType`] - Success/failure classification returned by `categorize`
//! - [`define_callback_registry!`] - Named process-wide registry

mod category;
mod custom_logger;
mod handle;
mod macros;
mod registry;
mod registry_config;
mod registry_event;
mod rejection;
mod report;
mod resolver;

// Re-export the main public API
pub use category::{Category, UnknownCategory};
pub use custom_logger::{identity_key, AsAny, CustomLogger, ExtendedLogging, FieldValue};
pub use handle::{CallableKey, CallbackHandle, FunctionCallback, HandleId, ANONYMOUS_CALLBACK};
pub use registry::{CallbackRegistry, MatchMode};
pub use registry_config::{RegistryConfig, DEFAULT_MAX_CALLBACKS, DEFAULT_PRIVATE_PREFIX};
pub use registry_event::{RegistryEvent, TraceCallback};
pub use rejection::{AddOutcome, Rejection};
pub use report::CallbacksByType;
pub use resolver::{LoggerNameResolver, StaticNameRegistry};
