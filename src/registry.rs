//! Concurrent registry of service descriptors
//!
//! Uses DashMap with ahash so registrations and lookups interleave safely
//! across threads without a container-wide lock.

use crate::descriptor::ServiceDescriptor;
use ahash::RandomState;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Map from service `TypeId` to exactly one descriptor.
///
/// Re-registering a service type replaces the prior descriptor outright
/// (last write wins). Individual operations are atomic; there is no
/// atomicity across multiple registry operations.
pub(crate) struct ServiceRegistry {
    /// Default DashMap sharding (num_cpus * 4) is oversized for containers
    /// with a few dozen bindings; 8 shards keeps creation cheap while still
    /// avoiding contention.
    descriptors: DashMap<TypeId, Arc<ServiceDescriptor>, RandomState>,
}

impl ServiceRegistry {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            descriptors: DashMap::with_capacity_and_hasher_and_shard_amount(
                0,
                RandomState::new(),
                8,
            ),
        }
    }

    #[inline]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            descriptors: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                8,
            ),
        }
    }

    /// Insert a descriptor, replacing any prior binding for the type.
    #[inline]
    pub(crate) fn insert(&self, type_id: TypeId, descriptor: ServiceDescriptor) {
        self.descriptors.insert(type_id, Arc::new(descriptor));
    }

    /// Look up the descriptor for a service type.
    ///
    /// Clones the `Arc` out so no shard guard is held while the caller runs
    /// the factory; recursive resolution re-enters the map.
    #[inline]
    pub(crate) fn get(&self, type_id: &TypeId) -> Option<Arc<ServiceDescriptor>> {
        self.descriptors.get(type_id).map(|entry| Arc::clone(&entry))
    }

    #[inline]
    pub(crate) fn contains(&self, type_id: &TypeId) -> bool {
        self.descriptors.contains_key(type_id)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn type_ids(&self) -> Vec<TypeId> {
        self.descriptors.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Construct, Lifetime};

    struct First;

    impl Construct for First {
        type Dependencies = ();

        fn new(_: ()) -> Self {
            First
        }
    }

    struct Second;

    impl Construct for Second {
        type Dependencies = ();

        fn new(_: ()) -> Self {
            Second
        }
    }

    #[test]
    fn test_insert_and_contains() {
        let registry = ServiceRegistry::new();
        let type_id = TypeId::of::<First>();

        assert!(!registry.contains(&type_id));
        registry.insert(
            type_id,
            ServiceDescriptor::bind::<First, First>(Lifetime::Transient),
        );
        assert!(registry.contains(&type_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregistration_replaces_binding() {
        let registry = ServiceRegistry::new();
        let type_id = TypeId::of::<First>();

        registry.insert(
            type_id,
            ServiceDescriptor::bind::<First, First>(Lifetime::Transient),
        );
        registry.insert(
            type_id,
            ServiceDescriptor::bind::<First, First>(Lifetime::Singleton),
        );

        let descriptor = registry.get(&type_id).unwrap();
        assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_type_ids_lists_registrations() {
        let registry = ServiceRegistry::new();
        registry.insert(
            TypeId::of::<First>(),
            ServiceDescriptor::bind::<First, First>(Lifetime::Transient),
        );
        registry.insert(
            TypeId::of::<Second>(),
            ServiceDescriptor::bind::<Second, Second>(Lifetime::Transient),
        );

        let ids = registry.type_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&TypeId::of::<First>()));
        assert!(ids.contains(&TypeId::of::<Second>()));
    }
}
