//! The capability contract for stateful logger instances.
//!
//! A logger registered by instance is deduplicated by configuration rather than
//! by object: two instances of the same type that report the same public
//! identity fields are the same callback. Implementors declare those fields
//! through [`CustomLogger::identity_fields`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A primitive value that may take part in a logger's identity key.
///
/// Only strings, booleans and integers are representable; containers and
/// nested objects never contribute to identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::Int(value.into())
    }
}

/// Type-erasure helpers, implemented for every `Send + Sync + 'static` type.
///
/// Call these on `&dyn CustomLogger`, not on `&Arc<dyn CustomLogger>`: the
/// blanket impl also covers the `Arc` itself.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Secondary capability for loggers that can answer queries about what they stored.
pub trait ExtendedLogging: Send + Sync {
    /// Return the payload stored for `request_id`, if this logger has one.
    fn request_payload(&self, request_id: &str) -> Option<serde_json::Value>;
}

/// A stateful observer that can be registered by instance.
///
/// # Examples
///
/// ```rust
/// use callback_registry::{CustomLogger, FieldValue};
///
/// struct S3Logger {
///     bucket: String,
///     batch_size: i64,
///     credentials: Vec<String>,
/// }
///
/// impl CustomLogger for S3Logger {
///     fn identity_fields(&self) -> Vec<(&'static str, FieldValue)> {
///         vec![
///             ("bucket", self.bucket.as_str().into()),
///             ("batch_size", self.batch_size.into()),
///         ]
///     }
/// }
///
/// let logger = S3Logger { bucket: "logs".into(), batch_size: 10, credentials: vec![] };
/// assert_eq!(logger.type_tag(), "S3Logger");
/// ```
pub trait CustomLogger: AsAny {
    /// Concrete type tag. Defaults to the unqualified type name.
    fn type_tag(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Tags of the logger types this one specializes, used by type queries.
    fn parent_type_tags(&self) -> &'static [&'static str] {
        &[]
    }

    /// Primitive fields that distinguish one configuration of this logger from another.
    ///
    /// Names starting with the registry's private prefix are skipped when the
    /// identity key is built.
    fn identity_fields(&self) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    /// The extended capability, for loggers that implement it.
    fn as_extended(&self) -> Option<&dyn ExtendedLogging> {
        None
    }

    /// Whether this logger is of type `tag` or specializes it.
    fn matches_type(&self, tag: &str) -> bool {
        self.type_tag() == tag || self.parent_type_tags().contains(&tag)
    }
}

/// Build the identity key of a logger instance.
///
/// The key is the type tag followed by the sorted `name=value` pairs of every
/// public identity field, joined with `-`.
pub fn identity_key(logger: &dyn CustomLogger, private_prefix: &str) -> String {
    let mut pairs: Vec<String> = logger
        .identity_fields()
        .into_iter()
        .filter(|(name, _)| private_prefix.is_empty() || !name.starts_with(private_prefix))
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    pairs.sort();

    let mut key = logger.type_tag().to_string();
    for pair in pairs {
        key.push('-');
        key.push_str(&pair);
    }
    key
}

/// Strip the module path from a type name, keeping any generic arguments.
fn short_type_name(full: &'static str) -> &'static str {
    let path_end = full.find('<').unwrap_or(full.len());
    let start = full[..path_end].rfind("::").map(|i| i + 2).unwrap_or(0);
    &full[start..]
}
