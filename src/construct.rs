//! Constructor declaration and auto-wiring
//!
//! Runtime constructor introspection does not exist in Rust, so the
//! constructor of an implementation type is declared once, at the type
//! definition: the [`Construct`] trait names the dependency list and the
//! construction function. Auto-wiring then resolves each dependency
//! recursively through the container, so constructor parameters inherit the
//! full registry, singleton, and fallback semantics of a top-level resolve.

use crate::{Container, Injectable, Resolvable, Result};
use std::sync::Arc;

/// A concrete type that the container knows how to construct.
///
/// `Dependencies` is the constructor parameter list: `()` for none,
/// `Arc<S>` for one service, tuples of `Arc<S>` for several (up to 12),
/// or `Option<Arc<S>>` for an optional dependency. Each entry is resolved
/// through the container in declaration order before `new` is invoked.
///
/// # Example
///
/// ```rust
/// use autowire::{service, Construct};
/// use std::sync::Arc;
///
/// trait Renderer: Send + Sync {
///     fn render(&self, message: &str) -> String;
/// }
///
/// service!(dyn Renderer);
///
/// struct ConsoleSender {
///     renderer: Arc<dyn Renderer>,
/// }
///
/// impl Construct for ConsoleSender {
///     type Dependencies = Arc<dyn Renderer>;
///
///     fn new(renderer: Arc<dyn Renderer>) -> Self {
///         ConsoleSender { renderer }
///     }
/// }
/// ```
pub trait Construct: Injectable + Sized {
    /// The services this type's constructor requires.
    type Dependencies: Dependencies;

    /// Construct an instance from its resolved dependencies.
    fn new(deps: Self::Dependencies) -> Self;

    /// Resolve all dependencies from `container` and construct an instance.
    #[inline]
    fn construct_with(container: &Container) -> Result<Self> {
        Ok(Self::new(Self::Dependencies::resolve_all(container)?))
    }
}

/// A constructor parameter list that can be resolved from a container.
///
/// Implemented for `()`, `Arc<S>`, `Option<Arc<S>>`, and tuples of `Arc<S>`
/// up to 12 elements, where each `S` is a [`Resolvable`] service type.
pub trait Dependencies: Sized {
    /// Resolve every entry in declaration order.
    fn resolve_all(container: &Container) -> Result<Self>;
}

impl Dependencies for () {
    #[inline]
    fn resolve_all(_container: &Container) -> Result<Self> {
        Ok(())
    }
}

impl<S: Resolvable + ?Sized> Dependencies for Arc<S> {
    #[inline]
    fn resolve_all(container: &Container) -> Result<Self> {
        container.resolve::<S>()
    }
}

impl<S: Resolvable + ?Sized> Dependencies for Option<Arc<S>> {
    #[inline]
    fn resolve_all(container: &Container) -> Result<Self> {
        match container.resolve::<S>() {
            Ok(instance) => Ok(Some(instance)),
            Err(crate::DiError::NotRegistered { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

macro_rules! impl_dependencies_tuple {
    ($($S:ident),+) => {
        impl<$($S: Resolvable + ?Sized),+> Dependencies for ($(Arc<$S>,)+) {
            #[inline]
            fn resolve_all(container: &Container) -> Result<Self> {
                Ok(($(container.resolve::<$S>()?,)+))
            }
        }
    };
}

impl_dependencies_tuple!(A, B);
impl_dependencies_tuple!(A, B, C);
impl_dependencies_tuple!(A, B, C, D);
impl_dependencies_tuple!(A, B, C, D, E);
impl_dependencies_tuple!(A, B, C, D, E, F);
impl_dependencies_tuple!(A, B, C, D, E, F, G);
impl_dependencies_tuple!(A, B, C, D, E, F, G, H);
impl_dependencies_tuple!(A, B, C, D, E, F, G, H, I);
impl_dependencies_tuple!(A, B, C, D, E, F, G, H, I, J);
impl_dependencies_tuple!(A, B, C, D, E, F, G, H, I, J, K);
impl_dependencies_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);

/// The assignability relation between an implementation and a service type.
///
/// `I: Implement<S>` is the proof that `I` satisfies the contract of `S`,
/// plus the unsizing step the container cannot perform generically. Every
/// constructible type implements `Implement<Self>`, so concrete types can be
/// registered against themselves without extra code.
///
/// # Example
///
/// ```rust
/// use autowire::{service, Construct, Implement};
/// use std::sync::Arc;
///
/// trait Renderer: Send + Sync {
///     fn render(&self, message: &str) -> String;
/// }
///
/// service!(dyn Renderer);
///
/// struct PlainRenderer;
///
/// impl Renderer for PlainRenderer {
///     fn render(&self, message: &str) -> String {
///         message.to_owned()
///     }
/// }
///
/// impl Construct for PlainRenderer {
///     type Dependencies = ();
///     fn new(_: ()) -> Self {
///         PlainRenderer
///     }
/// }
///
/// impl Implement<dyn Renderer> for PlainRenderer {
///     fn upcast(this: Arc<Self>) -> Arc<dyn Renderer> {
///         this
///     }
/// }
/// ```
pub trait Implement<S: Injectable + ?Sized>: Construct {
    /// Convert a shared instance of the implementation into the service type.
    fn upcast(this: Arc<Self>) -> Arc<S>;
}

impl<T: Construct> Implement<T> for T {
    #[inline]
    fn upcast(this: Arc<T>) -> Arc<T> {
        this
    }
}
