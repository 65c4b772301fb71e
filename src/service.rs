//! Service traits and lifetime policies
//!
//! A *service type* is what callers ask the container for: either a trait
//! object (`dyn Renderer`) or a plain concrete type. The [`Resolvable`]
//! trait decides what happens when a service type has no binding:
//! concrete types fall back to direct construction, abstract types fail.

use crate::{Container, Result};
use std::sync::Arc;

/// Marker trait for types that can be held by the container.
///
/// Automatically implemented for everything that is `Send + Sync + 'static`,
/// including trait objects. You never implement this manually.
pub trait Injectable: Send + Sync + 'static {}

impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Instance reuse policy for a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// New instance created on every resolve
    #[default]
    Transient,

    /// One lazily created instance shared for the container's life
    Singleton,
}

/// How a service type is resolved from a container.
///
/// Two kinds of impl exist:
///
/// - A blanket impl for every [`Construct`](crate::Construct) type: look the
///   type up in the registry first, and when it is unbound construct it
///   directly as a fallback (the result is not cached or persisted).
/// - Registry-only impls for trait objects, generated by the [`service!`]
///   macro: an unbound trait object fails with
///   [`DiError::NotRegistered`](crate::DiError::NotRegistered) since there
///   is nothing to construct.
///
/// # Example
///
/// ```rust
/// use autowire::{service, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// service!(dyn Greeter);
///
/// let container = Container::new();
/// assert!(container.resolve::<dyn Greeter>().is_err());
/// ```
pub trait Resolvable: Injectable {
    /// Resolve an instance of this service type from the container.
    fn resolve_with(container: &Container) -> Result<Arc<Self>>;
}

impl<T: crate::Construct> Resolvable for T {
    fn resolve_with(container: &Container) -> Result<Arc<T>> {
        if container.contains::<T>() {
            container.resolve_registered::<T>()
        } else {
            // Unregistered concrete type: construct directly. The binding is
            // not persisted, so every such resolve builds from scratch.
            Ok(Arc::new(T::construct_with(container)?))
        }
    }
}

/// Declare trait objects as resolvable service types.
///
/// Generates the registry-only [`Resolvable`] impl for each listed type.
/// The trait must have `Send + Sync` supertraits so the container can share
/// instances across threads.
///
/// Also usable for a concrete type that has no [`Construct`](crate::Construct)
/// impl and is only ever registered as a pre-built instance; such a type then
/// behaves like an abstract service (no construction fallback).
///
/// # Example
///
/// ```rust
/// use autowire::service;
///
/// trait Renderer: Send + Sync {
///     fn render(&self, message: &str) -> String;
/// }
///
/// trait Sender: Send + Sync {
///     fn send(&self, message: &str);
/// }
///
/// service!(dyn Renderer, dyn Sender);
/// ```
#[macro_export]
macro_rules! service {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Resolvable for $ty {
            fn resolve_with(
                container: &$crate::Container,
            ) -> $crate::Result<::std::sync::Arc<Self>> {
                container.resolve_registered::<$ty>()
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_default_is_transient() {
        assert_eq!(Lifetime::default(), Lifetime::Transient);
    }

    #[test]
    fn test_trait_objects_are_injectable() {
        fn assert_injectable<T: ?Sized + Injectable>() {}

        trait Logger: Send + Sync {}

        assert_injectable::<String>();
        assert_injectable::<dyn Logger>();
    }
}
