//! Macros for creating named callback registry singletons.
//!
//! Most hosts build a [`CallbackRegistry`](crate::CallbackRegistry) in their
//! composition root and pass it by reference. When a process-wide instance is
//! wanted instead, `define_callback_registry!` gives it a name and a module of
//! free functions, so separate subsystems never share one by accident.

/// Creates a named, process-wide callback registry.
///
/// The macro generates a module containing:
/// - A lazily initialized `CallbackRegistry` static (hidden)
/// - `registry()`, returning a `&'static` reference to it
/// - Free functions delegating to the most used registry operations
///
/// # Examples
///
/// ```rust
/// use callback_registry::define_callback_registry;
///
/// define_callback_registry!(callbacks);
///
/// callbacks::add_success_callback("datadog");
/// callbacks::add_failure_callback("sentry");
///
/// let report = callbacks::categorize();
/// assert_eq!(report.success, vec!["datadog"]);
/// assert_eq!(report.failure, vec!["sentry"]);
/// ```
///
/// # Custom Configuration
///
/// The configuration expression is evaluated inside the generated module, so
/// spell out full paths.
///
/// ```rust
/// use callback_registry::{define_callback_registry, Category};
///
/// define_callback_registry!(
///     small,
///     callback_registry::RegistryConfig::default().with_max_callbacks(1)
/// );
///
/// small::add_callback("a");
/// small::add_callback("b");
/// assert_eq!(small::registry().len(Category::General), 1);
/// ```
#[macro_export]
macro_rules! define_callback_registry {
    ($name:ident) => {
        $crate::define_callback_registry!($name, $crate::RegistryConfig::default());
    };
    ($name:ident, $config:expr) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock};

            use $crate::{
                AddOutcome, CallbackHandle, CallbacksByType, CallbackRegistry, Category,
                MatchMode, RegistryEvent,
            };

            // Registry instance (module-private)
            static REGISTRY: LazyLock<CallbackRegistry> =
                LazyLock::new(|| CallbackRegistry::with_config($config));

            /// The registry behind this module.
            pub fn registry() -> &'static CallbackRegistry {
                &REGISTRY
            }

            /// Add a callback to `category`.
            pub fn add(handle: impl Into<CallbackHandle>, category: Category) -> AddOutcome {
                REGISTRY.add(handle, category)
            }

            /// Add a callback notified on every outcome.
            pub fn add_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_callback(handle)
            }

            pub fn add_input_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_input_callback(handle)
            }

            pub fn add_success_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_success_callback(handle)
            }

            pub fn add_failure_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_failure_callback(handle)
            }

            pub fn add_async_success_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_async_success_callback(handle)
            }

            pub fn add_async_failure_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_async_failure_callback(handle)
            }

            pub fn add_service_callback(handle: impl Into<CallbackHandle>) -> AddOutcome {
                REGISTRY.add_service_callback(handle)
            }

            /// Remove the callbacks in `category` that belong to `owner`.
            pub fn remove_by_owner<O: ?Sized>(
                category: Category,
                owner: &Arc<O>,
                mode: MatchMode,
            ) -> usize {
                REGISTRY.remove_by_owner(category, owner, mode)
            }

            /// Clear every category.
            pub fn reset_all() {
                REGISTRY.reset_all()
            }

            pub fn all_handles() -> Vec<CallbackHandle> {
                REGISTRY.all_handles()
            }

            pub fn is_active(type_tag: &str) -> bool {
                REGISTRY.is_active(type_tag)
            }

            pub fn categorize() -> CallbacksByType {
                REGISTRY.categorize()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::Category;

    #[test]
    fn test_define_callback_registry_macro() {
        define_callback_registry!(test_reg);

        assert!(test_reg::add_success_callback("datadog").is_added());
        assert!(!test_reg::add_success_callback("datadog").is_added());
        assert_eq!(test_reg::registry().len(Category::Success), 1);
    }

    #[test]
    fn test_multiple_registries() {
        define_callback_registry!(reg_a);
        define_callback_registry!(reg_b);

        reg_a::add_callback("a");
        reg_b::add_failure_callback("b");

        assert_eq!(reg_a::categorize().success_and_failure, vec!["a"]);
        assert!(reg_a::categorize().failure.is_empty());
        assert_eq!(reg_b::categorize().failure, vec!["b"]);
    }

    #[test]
    fn test_tracing() {
        define_callback_registry!(trace_test);

        use std::sync::{Arc, Mutex};
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        trace_test::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        trace_test::add_input_callback("x");
        trace_test::reset_all();

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].contains("added"));
        assert!(recorded[1].contains("Resetting"));
    }
}
