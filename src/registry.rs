//! The callback registry.
//!
//! A `CallbackRegistry` owns one insertion-ordered list per [`Category`].
//! Adds are deduplicated per category and capped at
//! [`RegistryConfig::max_callbacks_per_category`]; neither rule ever surfaces
//! as an error. Read accessors return snapshots, so the dispatch layer never
//! observes a half-applied add.
//!
//! # Examples
//!
//! ```
//! use callback_registry::{CallbackRegistry, Category};
//!
//! let registry = CallbackRegistry::new();
//! registry.add_success_callback("datadog");
//! registry.add_failure_callback("sentry");
//! registry.add_callback("langfuse");
//!
//! // Duplicates are dropped
//! registry.add_success_callback("datadog");
//! assert_eq!(registry.len(Category::Success), 1);
//!
//! let report = registry.categorize();
//! assert_eq!(report.success, vec!["datadog"]);
//! assert_eq!(report.failure, vec!["sentry"]);
//! assert_eq!(report.success_and_failure, vec!["langfuse"]);
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::category::Category;
use crate::custom_logger::{identity_key, AsAny, CustomLogger};
use crate::handle::{addr, CallbackHandle, HandleId};
use crate::registry_config::RegistryConfig;
use crate::registry_event::{RegistryEvent, TraceCallback};
use crate::rejection::{AddOutcome, Rejection};
use crate::report::CallbacksByType;
use crate::resolver::LoggerNameResolver;

type CategoryLists = [Vec<CallbackHandle>; Category::ALL.len()];

/// How [`CallbackRegistry::remove_by_owner`] matches callbacks against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Remove function callbacks bound to the target owner.
    #[default]
    Owner,
    /// Remove callbacks that are the target itself.
    Direct,
}

/// Thread-safe registry of callback handles, one list per category.
pub struct CallbackRegistry {
    config: RegistryConfig,
    lists: RwLock<CategoryLists>,
    resolver: RwLock<Option<Arc<dyn LoggerNameResolver>>>,
    trace: Mutex<Option<TraceCallback>>,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            lists: RwLock::new(Default::default()),
            resolver: RwLock::new(None),
            trace: Mutex::new(None),
        }
    }

    /// Use `resolver` to name logger instances in reports.
    pub fn with_resolver(self, resolver: Arc<dyn LoggerNameResolver>) -> Self {
        self.set_name_resolver(resolver);
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Replace the resolver used to name logger instances in reports.
    pub fn set_name_resolver(&self, resolver: Arc<dyn LoggerNameResolver>) {
        *self.resolver.write().unwrap_or_else(|p| p.into_inner()) = Some(resolver);
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked for every add, rejection, removal and reset. It
    /// runs after the registry's locks are released, so it may read the
    /// registry.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned, this method recovers by extracting the
    /// inner value. Trace operations are non-critical and idempotent.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Add `handle` to `category`.
    ///
    /// The add is a no-op when the category is full or already holds a
    /// callback with the same identity: names compare by value, functions by
    /// the wrapped callable, logger instances by type tag plus public
    /// identity fields. A rejection is logged and returned, never raised.
    pub fn add(&self, handle: impl Into<CallbackHandle>, category: Category) -> AddOutcome {
        let handle = handle.into();
        let name = handle.display_name(self.resolver().as_deref());

        let result = {
            let mut lists = self.write();
            self.try_append(&mut lists[category.index()], handle, category)
        };

        match result {
            Ok(()) => {
                tracing::trace!(category = %category, callback = %name, "Added callback");
                self.emit_event(&RegistryEvent::Added {
                    category,
                    callback: name,
                });
                AddOutcome::Added
            }
            Err(reason) => {
                self.emit_event(&RegistryEvent::Rejected {
                    category,
                    reason: reason.clone(),
                });
                AddOutcome::Rejected(reason)
            }
        }
    }

    /// Add a type-erased value to `category`.
    ///
    /// Values that are not a recognized handle shape are ignored without a
    /// notice, see [`CallbackHandle::from_any`].
    pub fn add_any(&self, value: Arc<dyn Any + Send + Sync>, category: Category) -> AddOutcome {
        match CallbackHandle::from_any(value) {
            Some(handle) => self.add(handle, category),
            None => AddOutcome::Rejected(Rejection::UnsupportedHandleShape),
        }
    }

    fn try_append(
        &self,
        list: &mut Vec<CallbackHandle>,
        handle: CallbackHandle,
        category: Category,
    ) -> Result<(), Rejection> {
        let max = self.config.max_callbacks_per_category;
        if list.len() >= max {
            tracing::warn!(
                category = %category,
                max,
                current = list.len(),
                "Cannot add callback - would exceed max callbacks limit"
            );
            return Err(Rejection::CapacityExceeded { category, max });
        }

        let duplicate_key = match &handle {
            CallbackHandle::Name(name) => list
                .iter()
                .any(|existing| existing.as_name() == Some(name.as_str()))
                .then(|| name.clone()),
            CallbackHandle::Function(callback) => {
                let id = handle.id();
                list.iter()
                    .any(|existing| existing.id() == id)
                    .then(|| callback.name().unwrap_or(crate::ANONYMOUS_CALLBACK).to_string())
            }
            CallbackHandle::Logger(logger) => {
                let key = self.logger_key(logger.as_ref());
                list.iter()
                    .filter_map(CallbackHandle::as_logger)
                    .any(|existing| {
                        existing.type_tag() == logger.type_tag()
                            && self.logger_key(existing.as_ref()) == key
                    })
                    .then_some(key)
            }
        };

        if let Some(key) = duplicate_key {
            tracing::debug!(
                category = %category,
                callback = %key,
                "Callback already exists, not adding again"
            );
            return Err(Rejection::DuplicateHandle { category, key });
        }

        list.push(handle);
        Ok(())
    }

    /// Add to the general list, notified on every outcome.
    pub fn add_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::General)
    }

    pub fn add_input_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::Input)
    }

    pub fn add_success_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::Success)
    }

    pub fn add_failure_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::Failure)
    }

    pub fn add_async_success_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::AsyncSuccess)
    }

    pub fn add_async_failure_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::AsyncFailure)
    }

    pub fn add_service_callback(&self, handle: impl Into<CallbackHandle>) -> AddOutcome {
        self.add(handle, Category::Service)
    }

    // -------------------------------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------------------------------

    /// Remove every callback in `category` that belongs to `owner`.
    ///
    /// With [`MatchMode::Owner`] this removes function callbacks bound to
    /// `owner`, typically when the owner is being torn down. With
    /// [`MatchMode::Direct`] it removes callbacks that are `owner` itself,
    /// i.e. a function callback wrapping that allocation or that logger
    /// instance. Returns the number of callbacks removed.
    pub fn remove_by_owner<O: ?Sized>(
        &self,
        category: Category,
        owner: &Arc<O>,
        mode: MatchMode,
    ) -> usize {
        let target = addr(Arc::as_ptr(owner));

        let removed = {
            let mut lists = self.write();
            let list = &mut lists[category.index()];
            let before = list.len();
            list.retain(|handle| match mode {
                MatchMode::Owner => !handle.as_function().is_some_and(|f| f.is_bound_to(owner)),
                MatchMode::Direct => match handle {
                    CallbackHandle::Function(callback) => callback.addr() != target,
                    CallbackHandle::Logger(logger) => addr(Arc::as_ptr(logger)) != target,
                    CallbackHandle::Name(_) => true,
                },
            });
            before - list.len()
        };

        if removed > 0 {
            tracing::trace!(category = %category, removed, ?mode, "Removed callbacks");
            self.emit_event(&RegistryEvent::Removed {
                category,
                count: removed,
            });
        }
        removed
    }

    /// [`remove_by_owner`](Self::remove_by_owner) for a category given by name.
    ///
    /// A name that is not a category leaves the registry untouched and
    /// returns 0.
    pub fn remove_by_owner_named<O: ?Sized>(
        &self,
        category: &str,
        owner: &Arc<O>,
        mode: MatchMode,
    ) -> usize {
        match category.parse::<Category>() {
            Ok(category) => self.remove_by_owner(category, owner, mode),
            Err(_) => {
                let reason = Rejection::MalformedRemovalTarget {
                    name: category.to_string(),
                };
                tracing::debug!(%reason, "Ignoring callback removal");
                0
            }
        }
    }

    /// Clear every category.
    ///
    /// Meant for tests and administrative tooling, not for a live pipeline.
    pub fn reset_all(&self) {
        tracing::debug!("Resetting all callbacks");
        for list in self.write().iter_mut() {
            list.clear();
        }

        self.emit_event(&RegistryEvent::Reset {});
    }

    // -------------------------------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------------------------------

    /// Snapshot of one category, in insertion order.
    pub fn callbacks(&self, category: Category) -> Vec<CallbackHandle> {
        self.read()[category.index()].clone()
    }

    pub fn len(&self, category: Category) -> usize {
        self.read()[category.index()].len()
    }

    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.read().iter().all(Vec::is_empty)
    }

    /// Every callback the dispatch layer notifies: general, success, failure,
    /// async success and async failure, concatenated in that order.
    ///
    /// Input and service callbacks are not included. A callback registered in
    /// several categories appears once per category.
    pub fn all_handles(&self) -> Vec<CallbackHandle> {
        let lists = self.read();
        Category::AGGREGATE
            .iter()
            .flat_map(|category| lists[category.index()].iter().cloned())
            .collect()
    }

    /// Logger instances in [`all_handles`](Self::all_handles), each object once.
    fn aggregate_loggers(&self) -> Vec<Arc<dyn CustomLogger>> {
        let mut seen = HashSet::new();
        self.all_handles()
            .into_iter()
            .filter_map(|handle| match handle {
                CallbackHandle::Logger(logger) => Some(logger),
                _ => None,
            })
            .filter(|logger| seen.insert(addr(Arc::as_ptr(logger))))
            .collect()
    }

    /// Active loggers that implement the extended capability.
    ///
    /// Distinct instances are all returned, even when their configuration is
    /// identical.
    pub fn active_extended_capability_instances(&self) -> Vec<Arc<dyn CustomLogger>> {
        self.aggregate_loggers()
            .into_iter()
            .filter(|logger| logger.as_extended().is_some())
            .collect()
    }

    /// Active loggers of type `type_tag` or of a type specializing it,
    /// in first-registration order.
    pub fn instances_of_type(&self, type_tag: &str) -> Vec<Arc<dyn CustomLogger>> {
        self.aggregate_loggers()
            .into_iter()
            .filter(|logger| logger.matches_type(type_tag))
            .collect()
    }

    /// Active loggers whose concrete type is `T`, in first-registration order.
    pub fn instances_of<T: CustomLogger>(&self) -> Vec<Arc<T>> {
        self.aggregate_loggers()
            .into_iter()
            .filter_map(|logger| logger.into_any_arc().downcast::<T>().ok())
            .collect()
    }

    /// Whether any active logger is of type `type_tag` or specializes it.
    pub fn is_active(&self, type_tag: &str) -> bool {
        self.all_handles()
            .iter()
            .filter_map(CallbackHandle::as_logger)
            .any(|logger| logger.matches_type(type_tag))
    }

    /// Group active callbacks by the outcomes they are notified of.
    ///
    /// A callback in the general list, or in both a success and a failure
    /// list, lands in `success_and_failure`. Otherwise it lands in `success`
    /// or `failure`. Buckets hold display names, deduplicated and sorted.
    pub fn categorize(&self) -> CallbacksByType {
        let (general, success, failure, union) = {
            let lists = self.read();
            let ids = |categories: &[Category]| -> HashSet<HandleId> {
                categories
                    .iter()
                    .flat_map(|c| lists[c.index()].iter().map(CallbackHandle::id))
                    .collect()
            };

            let general = ids(&[Category::General]);
            let success = ids(&[Category::Success, Category::AsyncSuccess]);
            let failure = ids(&[Category::Failure, Category::AsyncFailure]);

            let mut seen = HashSet::new();
            let union: Vec<CallbackHandle> = Category::AGGREGATE
                .iter()
                .flat_map(|c| lists[c.index()].iter())
                .filter(|handle| seen.insert(handle.id()))
                .cloned()
                .collect();

            (general, success, failure, union)
        };

        let resolver = self.resolver();
        let mut report = CallbacksByType::default();
        for handle in union {
            let id = handle.id();
            let name = handle.display_name(resolver.as_deref());

            let in_success = success.contains(&id);
            let in_failure = failure.contains(&id);
            if general.contains(&id) || (in_success && in_failure) {
                report.success_and_failure.push(name);
            } else if in_success {
                report.success.push(name);
            } else if in_failure {
                report.failure.push(name);
            }
        }

        report.normalize();
        report
    }

    // -------------------------------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------------------------------

    fn logger_key(&self, logger: &dyn CustomLogger) -> String {
        identity_key(logger, &self.config.private_field_prefix)
    }

    fn resolver(&self) -> Option<Arc<dyn LoggerNameResolver>> {
        self.resolver
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    // Poisoning only occurs if a thread panics while holding the lock; the
    // lists are still consistent because every mutation is a single push,
    // retain or clear.
    fn read(&self) -> RwLockReadGuard<'_, CategoryLists> {
        self.lists.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CategoryLists> {
        self.lists.write().unwrap_or_else(|p| p.into_inner())
    }
}
