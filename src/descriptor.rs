//! Service descriptors: one registry record per binding
//!
//! A descriptor binds a service type to an implementation type and a
//! lifetime, and carries the write-once cache slot used for singletons.
//! The implementation's constructor is captured at registration time as a
//! type-erased closure, so the registry needs no knowledge of either type.

use crate::{Container, Implement, Injectable, Lifetime, Result};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;

/// A type-erased service instance. The payload is always an `Arc<S>` for
/// the service type `S` the descriptor was registered under.
pub(crate) type Erased = Box<dyn Any + Send + Sync>;

type ConstructFn = Box<dyn Fn(&Container) -> Result<Erased> + Send + Sync>;

/// Registry record binding a service type to an implementation and lifetime.
///
/// Immutable apart from `cached`, which is populated at most once and never
/// cleared or replaced. The cache is only ever written for
/// [`Lifetime::Singleton`]; transient descriptors leave it untouched.
pub(crate) struct ServiceDescriptor {
    service: &'static str,
    implementation: &'static str,
    lifetime: Lifetime,
    construct: ConstructFn,
    cached: OnceCell<Erased>,
}

impl ServiceDescriptor {
    /// Create a descriptor for an `(S, I)` binding.
    ///
    /// The closure resolves `I`'s dependencies through the container,
    /// invokes its constructor, and upcasts the result to the service type.
    pub(crate) fn bind<S, I>(lifetime: Lifetime) -> Self
    where
        S: Injectable + ?Sized,
        I: Implement<S>,
    {
        Self {
            service: std::any::type_name::<S>(),
            implementation: std::any::type_name::<I>(),
            lifetime,
            construct: Box::new(|container| {
                let instance: Arc<S> = I::upcast(Arc::new(I::construct_with(container)?));
                Ok(Box::new(instance) as Erased)
            }),
            cached: OnceCell::new(),
        }
    }

    /// Create a singleton descriptor with the cache pre-populated.
    ///
    /// Resolution always returns the given instance; the construct closure
    /// only exists to keep the record total and hands back the same `Arc`.
    pub(crate) fn instance<S: Injectable + ?Sized>(instance: Arc<S>) -> Self {
        let cached = OnceCell::with_value(Box::new(Arc::clone(&instance)) as Erased);
        Self {
            service: std::any::type_name::<S>(),
            implementation: std::any::type_name::<S>(),
            lifetime: Lifetime::Singleton,
            construct: Box::new(move |_| Ok(Box::new(Arc::clone(&instance)) as Erased)),
            cached,
        }
    }

    /// Create a singleton descriptor from an already erased payload.
    ///
    /// The payload must contain an `Arc<S>` for the service type the
    /// descriptor is registered under; nothing checks that here, a mismatch
    /// surfaces as `InvalidBinding` at resolve time. The construct closure is
    /// unreachable because the cache is pre-populated.
    pub(crate) fn erased(service: &'static str, payload: Erased) -> Self {
        Self {
            service,
            implementation: service,
            lifetime: Lifetime::Singleton,
            construct: Box::new(move |_| Err(crate::DiError::InvalidBinding { service })),
            cached: OnceCell::with_value(payload),
        }
    }

    #[inline]
    pub(crate) fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    #[inline]
    pub(crate) fn service_name(&self) -> &'static str {
        self.service
    }

    #[inline]
    pub(crate) fn implementation_name(&self) -> &'static str {
        self.implementation
    }

    /// Invoke the captured constructor.
    #[inline]
    pub(crate) fn construct(&self, container: &Container) -> Result<Erased> {
        (self.construct)(container)
    }

    /// Lock-free read of the singleton cache.
    #[inline]
    pub(crate) fn cached(&self) -> Option<&Erased> {
        self.cached.get()
    }

    /// Store a freshly constructed singleton instance.
    ///
    /// Write-once: if the cache was somehow populated in the meantime the
    /// existing instance wins and is returned.
    #[inline]
    pub(crate) fn store(&self, instance: Erased) -> &Erased {
        self.cached.get_or_init(|| instance)
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service", &self.service)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("cached", &self.cached.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Construct;

    struct Probe {
        id: u32,
    }

    impl Construct for Probe {
        type Dependencies = ();

        fn new(_: ()) -> Self {
            Probe { id: 7 }
        }
    }

    fn unwrap_probe(erased: &Erased) -> Arc<Probe> {
        Arc::clone(erased.downcast_ref::<Arc<Probe>>().unwrap())
    }

    #[test]
    fn test_bind_records_names_and_lifetime() {
        let descriptor = ServiceDescriptor::bind::<Probe, Probe>(Lifetime::Transient);
        assert_eq!(descriptor.lifetime(), Lifetime::Transient);
        assert!(descriptor.service_name().contains("Probe"));
        assert!(descriptor.implementation_name().contains("Probe"));
        assert!(descriptor.cached().is_none());
    }

    #[test]
    fn test_bind_constructs_fresh_instances() {
        let container = Container::new();
        let descriptor = ServiceDescriptor::bind::<Probe, Probe>(Lifetime::Transient);

        let a = descriptor.construct(&container).unwrap();
        let b = descriptor.construct(&container).unwrap();

        let a = a.downcast::<Arc<Probe>>().unwrap();
        let b = b.downcast::<Arc<Probe>>().unwrap();
        assert_eq!(a.id, 7);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_instance_descriptor_is_pre_cached() {
        let original = Arc::new(Probe { id: 99 });
        let descriptor = ServiceDescriptor::instance::<Probe>(Arc::clone(&original));

        assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
        let cached = descriptor.cached().expect("cache should be pre-populated");
        assert!(Arc::ptr_eq(&unwrap_probe(cached), &original));
    }

    #[test]
    fn test_store_is_write_once() {
        let container = Container::new();
        let descriptor = ServiceDescriptor::bind::<Probe, Probe>(Lifetime::Singleton);

        let first = descriptor.construct(&container).unwrap();
        let winner = unwrap_probe(descriptor.store(first));

        let second = descriptor.construct(&container).unwrap();
        let still_winner = unwrap_probe(descriptor.store(second));

        assert!(Arc::ptr_eq(&winner, &still_winner));
    }
}
