//! The dependency-injection container
//!
//! Owns the registry and the singleton-creation lock, and implements the
//! resolution algorithm: registry lookup, lifetime handling with
//! double-checked singleton creation, and the direct-construction fallback
//! for unregistered concrete types.

use crate::descriptor::{Erased, ServiceDescriptor};
use crate::registry::ServiceRegistry;
use crate::{DiError, Implement, Injectable, Lifetime, Resolvable, Result};
use parking_lot::ReentrantMutex;
use std::any::{Any, TypeId};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Registry of service bindings with recursive auto-wired resolution.
///
/// Cloning is cheap and every clone shares the same registry and singleton
/// instances. All methods take `&self`; registration and resolution may be
/// called concurrently from any number of threads.
///
/// # Examples
///
/// ```rust
/// use autowire::{service, Construct, Container, Implement};
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
///
/// let container = Container::new();
/// container.register_singleton::<dyn Renderer, PlainRenderer>();
///
/// let renderer = container.resolve::<dyn Renderer>().unwrap();
/// assert_eq!(renderer.render("hi"), "hi");
/// ```
#[derive(Clone)]
pub struct Container {
    registry: Arc<ServiceRegistry>,
    /// Serializes all first-time singleton creations in this container.
    /// Reentrant: constructing a singleton may recursively construct an
    /// uncached singleton dependency on the same thread.
    singleton_lock: Arc<ReentrantMutex<()>>,
}

impl Container {
    /// Create a new empty container.
    #[inline]
    pub fn new() -> Self {
        #[cfg(feature = "logging")]
        debug!(target: "autowire", "Creating new DI container");

        Self {
            registry: Arc::new(ServiceRegistry::new()),
            singleton_lock: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Create a container with pre-allocated registry capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Arc::new(ServiceRegistry::with_capacity(capacity)),
            singleton_lock: Arc::new(ReentrantMutex::new(())),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Bind service type `S` to implementation `I` with the given lifetime.
    ///
    /// `I: Implement<S>` is the assignability requirement; a binding that
    /// does not satisfy the service contract fails to compile. `I` is not
    /// validated to be constructible here in any deeper sense — dependency
    /// failures surface at resolution time. Replaces any prior binding for
    /// `S` outright.
    pub fn register<S, I>(&self, lifetime: Lifetime)
    where
        S: Injectable + ?Sized,
        I: Implement<S>,
    {
        #[cfg(feature = "logging")]
        debug!(
            target: "autowire",
            service = std::any::type_name::<S>(),
            implementation = std::any::type_name::<I>(),
            lifetime = ?lifetime,
            "Registering service binding"
        );

        self.registry
            .insert(TypeId::of::<S>(), ServiceDescriptor::bind::<S, I>(lifetime));
    }

    /// Bind `S` to `I` with a fresh instance per resolve.
    #[inline]
    pub fn register_transient<S, I>(&self)
    where
        S: Injectable + ?Sized,
        I: Implement<S>,
    {
        self.register::<S, I>(Lifetime::Transient);
    }

    /// Bind `S` to `I` with one lazily created shared instance.
    ///
    /// Nothing is constructed until the first resolve.
    #[inline]
    pub fn register_singleton<S, I>(&self)
    where
        S: Injectable + ?Sized,
        I: Implement<S>,
    {
        self.register::<S, I>(Lifetime::Singleton);
    }

    /// Bind `S` to an existing instance.
    ///
    /// Every resolve of `S` returns exactly this `Arc`; construction is
    /// never invoked for it.
    pub fn register_instance<S: Injectable + ?Sized>(&self, instance: Arc<S>) {
        #[cfg(feature = "logging")]
        debug!(
            target: "autowire",
            service = std::any::type_name::<S>(),
            lifetime = "singleton",
            "Registering pre-built instance"
        );

        self.registry
            .insert(TypeId::of::<S>(), ServiceDescriptor::instance::<S>(instance));
    }

    /// Register a pre-built instance by `TypeId` (advanced use).
    ///
    /// The payload must be a boxed `Arc<S>` where `S` is the type the id
    /// belongs to; that invariant cannot be checked here, and a mismatch
    /// surfaces as [`DiError::InvalidBinding`] when the service is resolved.
    pub fn register_erased(
        &self,
        type_id: TypeId,
        service_name: &'static str,
        payload: Box<dyn Any + Send + Sync>,
    ) {
        self.registry
            .insert(type_id, ServiceDescriptor::erased(service_name, payload));
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve an instance of service type `S`.
    ///
    /// Trait-object services must be registered; resolving an unbound one
    /// fails with [`DiError::NotRegistered`]. Concrete types fall back to
    /// direct construction when unregistered, without persisting a binding.
    /// Constructor dependencies are resolved through this same entry point,
    /// so a dependency bound as a singleton is shared with every other
    /// resolution path that reaches it.
    #[inline]
    pub fn resolve<S: Resolvable + ?Sized>(&self) -> Result<Arc<S>> {
        S::resolve_with(self)
    }

    /// Resolve `S` from the registry only, with no construction fallback.
    ///
    /// This is the type-token form of [`resolve`](Self::resolve); the
    /// `service!` macro routes trait-object resolution through it.
    pub fn resolve_registered<S: Injectable + ?Sized>(&self) -> Result<Arc<S>> {
        let descriptor = self
            .registry
            .get(&TypeId::of::<S>())
            .ok_or_else(DiError::not_registered::<S>)?;

        match descriptor.lifetime() {
            Lifetime::Singleton => self.resolve_singleton::<S>(&descriptor),
            Lifetime::Transient => {
                #[cfg(feature = "logging")]
                trace!(
                    target: "autowire",
                    service = descriptor.service_name(),
                    implementation = descriptor.implementation_name(),
                    "Constructing transient instance"
                );

                Self::unwrap_owned::<S>(descriptor.construct(self)?)
            }
        }
    }

    /// Singleton path: lock-free fast path on the cache, then double-checked
    /// creation under the container-wide lock. At most one instance is ever
    /// constructed per descriptor, even under concurrent first resolution.
    fn resolve_singleton<S: Injectable + ?Sized>(
        &self,
        descriptor: &ServiceDescriptor,
    ) -> Result<Arc<S>> {
        if let Some(cached) = descriptor.cached() {
            return Self::unwrap_shared::<S>(cached);
        }

        let _guard = self.singleton_lock.lock();

        // Re-check: another thread may have constructed while we waited.
        if let Some(cached) = descriptor.cached() {
            return Self::unwrap_shared::<S>(cached);
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "autowire",
            service = descriptor.service_name(),
            implementation = descriptor.implementation_name(),
            "Constructing singleton instance on first resolve"
        );

        let instance = descriptor.construct(self)?;
        Self::unwrap_shared::<S>(descriptor.store(instance))
    }

    /// Clone the `Arc<S>` out of a cached erased instance.
    #[inline]
    fn unwrap_shared<S: Injectable + ?Sized>(erased: &Erased) -> Result<Arc<S>> {
        erased
            .downcast_ref::<Arc<S>>()
            .cloned()
            .ok_or_else(DiError::invalid_binding::<S>)
    }

    /// Take the `Arc<S>` out of a freshly constructed erased instance.
    #[inline]
    fn unwrap_owned<S: Injectable + ?Sized>(erased: Erased) -> Result<Arc<S>> {
        erased
            .downcast::<Arc<S>>()
            .map(|boxed| *boxed)
            .map_err(|_| DiError::invalid_binding::<S>())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check whether a binding exists for `S`.
    #[inline]
    pub fn contains<S: Injectable + ?Sized>(&self) -> bool {
        self.registry.contains(&TypeId::of::<S>())
    }

    /// The lifetime of the current binding for `S`, if any.
    #[inline]
    pub fn lifetime_of<S: Injectable + ?Sized>(&self) -> Option<Lifetime> {
        self.registry
            .get(&TypeId::of::<S>())
            .map(|descriptor| descriptor.lifetime())
    }

    /// Number of registered bindings.
    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check whether no bindings are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// `TypeId`s of all registered service types.
    pub fn registered_types(&self) -> Vec<TypeId> {
        self.registry.type_ids()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.len())
            .finish()
    }
}
