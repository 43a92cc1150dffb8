//! Integration tests for callbacks registered by name.
//!
//! NOTE: All tests use #[serial] because they share the same registry (names).
//! Each test resets it first.

use callback_registry::{define_callback_registry, AddOutcome, Category, Rejection};
use serial_test::serial;

define_callback_registry!(names);

#[test]
#[serial]
fn test_add_name_twice_keeps_one() {
    names::reset_all();

    assert_eq!(names::add_success_callback("datadog"), AddOutcome::Added);
    assert_eq!(
        names::add_success_callback("datadog"),
        AddOutcome::Rejected(Rejection::DuplicateHandle {
            category: Category::Success,
            key: "datadog".to_string(),
        })
    );
    assert_eq!(names::registry().len(Category::Success), 1);
}

#[test]
#[serial]
fn test_thirty_first_add_is_rejected() {
    names::reset_all();

    for i in 0..30 {
        names::add_failure_callback(format!("logger-{i}"));
    }
    let outcome = names::add_failure_callback("logger-30");

    assert!(!outcome.is_added());
    assert_eq!(names::registry().len(Category::Failure), 30);
    // Nothing evicted
    assert_eq!(
        names::registry().callbacks(Category::Failure)[0].as_name(),
        Some("logger-0")
    );
}

#[test]
#[serial]
fn test_same_name_in_success_and_failure() {
    names::reset_all();

    assert!(names::add_success_callback("x").is_added());
    assert!(names::add_failure_callback("x").is_added());
    assert_eq!(names::registry().len(Category::General), 0);

    let report = names::categorize();
    assert!(report.success.is_empty());
    assert!(report.failure.is_empty());
    assert_eq!(report.success_and_failure, vec!["x"]);
}

#[test]
#[serial]
fn test_categorize_three_buckets() {
    names::reset_all();

    names::add_success_callback("datadog");
    names::add_failure_callback("sentry");
    names::add_callback("langfuse");

    let report = names::categorize();
    assert_eq!(report.success, vec!["datadog"]);
    assert_eq!(report.failure, vec!["sentry"]);
    assert_eq!(report.success_and_failure, vec!["langfuse"]);
}

#[test]
#[serial]
fn test_general_wins_over_single_outcome() {
    names::reset_all();

    names::add_callback("otel");
    names::add_async_success_callback("otel");
    names::add_async_failure_callback("s3");

    let report = names::categorize();
    assert!(report.success.is_empty());
    assert_eq!(report.failure, vec!["s3"]);
    assert_eq!(report.success_and_failure, vec!["otel"]);
}

#[test]
#[serial]
fn test_reset_clears_everything() {
    names::reset_all();

    for category in Category::ALL {
        names::add("a", category);
        names::add("b", category);
    }
    names::reset_all();

    assert!(names::all_handles().is_empty());
    for category in Category::ALL {
        assert_eq!(names::registry().len(category), 0);
    }
    assert!(names::categorize().is_empty());
}
