//! Callback handles.
//!
//! A handle is one of three kinds: a symbolic name, a function value, or a
//! stateful logger instance. Identity differs per kind, see [`HandleId`].

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;
use std::sync::Arc;

use crate::custom_logger::CustomLogger;
use crate::resolver::LoggerNameResolver;

/// Fallback text for function callbacks registered without a name.
pub const ANONYMOUS_CALLBACK: &str = "<anonymous callback>";

/// Address of the value behind a (possibly fat) pointer.
pub(crate) fn addr<T: ?Sized>(ptr: *const T) -> usize {
    ptr.cast::<()>() as usize
}

/// What makes two function callbacks the same callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKey {
    /// A fn item or captureless closure. Its type names exactly one function.
    Type(TypeId),
    /// A function pointer, compared by the address it points to.
    Pointer(usize),
    /// A stateful callable, identified by its shared allocation.
    Allocation(usize),
}

impl CallableKey {
    fn of<F: 'static>(callable: &Arc<F>) -> Self {
        if size_of::<F>() == 0 {
            return CallableKey::Type(TypeId::of::<F>());
        }
        if is_fn_pointer::<F>() {
            // SAFETY: `F` is a function pointer type, which is exactly one
            // `usize` wide and holds the code address.
            let target = unsafe { std::mem::transmute_copy::<F, usize>(&**callable) };
            return CallableKey::Pointer(target);
        }
        CallableKey::Allocation(addr(Arc::as_ptr(callable)))
    }
}

/// Whether `F` is a plain or higher-ranked function pointer type.
fn is_fn_pointer<F>() -> bool {
    if size_of::<F>() != size_of::<usize>() {
        return false;
    }
    let name = type_name::<F>();
    let name = match name.strip_prefix("for<") {
        Some(rest) => rest.split_once("> ").map_or(rest, |(_, tail)| tail),
        None => name,
    };
    name.starts_with("fn(") || name.starts_with("unsafe ") || name.starts_with("extern ")
}

/// A type-erased callable registered by reference.
///
/// Two callbacks are the same when they wrap the same callable and are bound
/// to the same owner (or both unbound). Fn items and captureless closures are
/// the same callable when they have the same type, function pointers when
/// they point to the same code. Any other callable is identified by its
/// allocation: clones of one `FunctionCallback`, and every `from_arc` of one
/// `Arc`, share it; separate `new` calls do not.
///
/// A callback may be bound to an owner object, the way a method is bound to
/// its receiver. Owners are compared by identity when the owner is torn down
/// and its callbacks are removed.
#[derive(Clone)]
pub struct FunctionCallback {
    callable: Arc<dyn Any + Send + Sync>,
    key: CallableKey,
    name: Option<Cow<'static, str>>,
    owner: Option<Arc<dyn Any + Send + Sync>>,
}

impl FunctionCallback {
    pub fn new<F: Send + Sync + 'static>(callable: F) -> Self {
        Self::from_arc(Arc::new(callable))
    }

    /// Wrap an existing `Arc`. Every wrapper of the same `Arc` shares one identity.
    pub fn from_arc<F: Send + Sync + 'static>(callable: Arc<F>) -> Self {
        Self {
            key: CallableKey::of(&callable),
            callable,
            name: None,
            owner: None,
        }
    }

    /// Attach a declared name, used when the callback is reported.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Bind this callback to `owner`.
    pub fn bound_to<O: Send + Sync + 'static>(mut self, owner: &Arc<O>) -> Self {
        let owner: Arc<dyn Any + Send + Sync> = owner.clone();
        self.owner = Some(owner);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn key(&self) -> CallableKey {
        self.key
    }

    /// Borrow the callable as its concrete type.
    pub fn callable<F: 'static>(&self) -> Option<&F> {
        let any: &(dyn Any + Send + Sync) = &*self.callable;
        any.downcast_ref::<F>()
    }

    /// Whether this callback is bound to the object behind `owner`.
    pub fn is_bound_to<O: ?Sized>(&self, owner: &Arc<O>) -> bool {
        self.owner_addr() == Some(addr(Arc::as_ptr(owner)))
    }

    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    fn owner_addr(&self) -> Option<usize> {
        self.owner.as_ref().map(|owner| addr(Arc::as_ptr(owner)))
    }

    /// Address of the wrapped allocation, whatever the identity kind.
    pub(crate) fn addr(&self) -> usize {
        addr(Arc::as_ptr(&self.callable))
    }
}

impl fmt::Debug for FunctionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCallback")
            .field("name", &self.name())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Identity of a handle for equality and set membership.
///
/// Names compare by value. Functions compare by callable and owner, logger
/// instances by the object they point to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandleId {
    Name(String),
    Function(CallableKey, Option<usize>),
    Logger(usize),
}

/// An observer registered in a callback category.
#[derive(Clone)]
pub enum CallbackHandle {
    /// A symbolic name resolved to a concrete observer elsewhere.
    Name(String),
    /// A stateless function value.
    Function(FunctionCallback),
    /// A stateful logger instance.
    Logger(Arc<dyn CustomLogger>),
}

impl CallbackHandle {
    pub fn function<F: Send + Sync + 'static>(callable: F) -> Self {
        CallbackHandle::Function(FunctionCallback::new(callable))
    }

    pub fn logger<L: CustomLogger>(logger: L) -> Self {
        CallbackHandle::Logger(Arc::new(logger))
    }

    /// Recover a handle from a type-erased value.
    ///
    /// Recognizes `CallbackHandle`, `String`, `&'static str`, `FunctionCallback`
    /// and `Arc<dyn CustomLogger>`. Anything else yields `None`.
    pub fn from_any(value: Arc<dyn Any + Send + Sync>) -> Option<Self> {
        let any: &(dyn Any + Send + Sync) = &*value;

        if let Some(handle) = any.downcast_ref::<CallbackHandle>() {
            return Some(handle.clone());
        }
        if let Some(name) = any.downcast_ref::<String>() {
            return Some(CallbackHandle::Name(name.clone()));
        }
        if let Some(name) = any.downcast_ref::<&'static str>() {
            return Some(CallbackHandle::Name((*name).to_string()));
        }
        if let Some(callback) = any.downcast_ref::<FunctionCallback>() {
            return Some(CallbackHandle::Function(callback.clone()));
        }
        if let Some(logger) = any.downcast_ref::<Arc<dyn CustomLogger>>() {
            return Some(CallbackHandle::Logger(logger.clone()));
        }
        None
    }

    pub fn id(&self) -> HandleId {
        match self {
            CallbackHandle::Name(name) => HandleId::Name(name.clone()),
            CallbackHandle::Function(callback) => {
                HandleId::Function(callback.key(), callback.owner_addr())
            }
            CallbackHandle::Logger(logger) => HandleId::Logger(addr(Arc::as_ptr(logger))),
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            CallbackHandle::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionCallback> {
        match self {
            CallbackHandle::Function(callback) => Some(callback),
            _ => None,
        }
    }

    pub fn as_logger(&self) -> Option<&Arc<dyn CustomLogger>> {
        match self {
            CallbackHandle::Logger(logger) => Some(logger),
            _ => None,
        }
    }

    /// Text used when the handle is reported.
    ///
    /// Logger instances are looked up in `resolver` by type tag and fall back
    /// to the tag itself.
    pub fn display_name(&self, resolver: Option<&dyn LoggerNameResolver>) -> String {
        match self {
            CallbackHandle::Name(name) => name.clone(),
            CallbackHandle::Function(callback) => {
                callback.name().unwrap_or(ANONYMOUS_CALLBACK).to_string()
            }
            CallbackHandle::Logger(logger) => {
                let tag = logger.type_tag();
                resolver
                    .and_then(|r| r.callback_name(tag))
                    .unwrap_or_else(|| tag.to_string())
            }
        }
    }
}

impl PartialEq for CallbackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for CallbackHandle {}

impl fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackHandle::Name(name) => f.debug_tuple("Name").field(name).finish(),
            CallbackHandle::Function(callback) => {
                f.debug_tuple("Function").field(callback).finish()
            }
            CallbackHandle::Logger(logger) => {
                f.debug_tuple("Logger").field(&logger.type_tag()).finish()
            }
        }
    }
}

impl From<&str> for CallbackHandle {
    fn from(name: &str) -> Self {
        CallbackHandle::Name(name.to_string())
    }
}

impl From<String> for CallbackHandle {
    fn from(name: String) -> Self {
        CallbackHandle::Name(name)
    }
}

impl From<FunctionCallback> for CallbackHandle {
    fn from(callback: FunctionCallback) -> Self {
        CallbackHandle::Function(callback)
    }
}

impl From<Arc<dyn CustomLogger>> for CallbackHandle {
    fn from(logger: Arc<dyn CustomLogger>) -> Self {
        CallbackHandle::Logger(logger)
    }
}
