//! # Autowire - Minimal Dependency Injection for Rust
//!
//! A small inversion-of-control container: bind abstract service types to
//! concrete implementations, and let the container build whole object graphs
//! by resolving each constructor dependency recursively.
//!
//! ## Features
//!
//! - 🔌 **Trait-object services** - Bind `dyn Trait` to any implementation
//! - 🧬 **Auto-wiring** - Constructor dependencies resolved recursively
//! - ♻️ **Two lifetimes** - Transient (fresh per resolve) and Singleton
//!   (one lazily created shared instance, double-checked under contention)
//! - 🔒 **Type-safe bindings** - Assignability is proven at compile time
//! - 🧵 **Concurrent** - Lock-free registry, one reentrant lock for first
//!   singleton construction
//! - 📊 **Observable** - Optional tracing integration
//!
//! ## Quick Start
//!
//! ```rust
//! use autowire::{service, Construct, Container, Implement};
//! use std::sync::Arc;
//!
//! trait Renderer: Send + Sync {
//!     fn render(&self, message: &str) -> String;
//! }
//!
//! service!(dyn Renderer);
//!
//! struct SimpleRenderer;
//!
//! impl Renderer for SimpleRenderer {
//!     fn render(&self, message: &str) -> String {
//!         format!("[render] {message}")
//!     }
//! }
//!
//! impl Construct for SimpleRenderer {
//!     type Dependencies = ();
//!     fn new(_: ()) -> Self {
//!         SimpleRenderer
//!     }
//! }
//!
//! impl Implement<dyn Renderer> for SimpleRenderer {
//!     fn upcast(this: Arc<Self>) -> Arc<dyn Renderer> {
//!         this
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_singleton::<dyn Renderer, SimpleRenderer>();
//!
//! let renderer = container.resolve::<dyn Renderer>().unwrap();
//! assert_eq!(renderer.render("hello"), "[render] hello");
//! ```
//!
//! ## Auto-wiring
//!
//! An implementation declares its constructor once via [`Construct`]; the
//! dependency list is a tuple of `Arc<Service>` entries. Resolving a type
//! resolves each dependency through the container first, so a dependency
//! bound as a singleton is shared with every resolution path that reaches
//! it, no matter the entry point.
//!
//! Concrete types with a [`Construct`] impl do not need to be registered at
//! all: resolving one directly falls back to constructing it on the spot
//! (nothing is cached or persisted for such fallback resolutions).
//!
//! ## What this is not
//!
//! No named/keyed registrations, no request-scoped lifetime, no teardown
//! ordering, no cycle detection - a cyclic constructor graph recurses until
//! the stack runs out. One binding per service type; re-registration
//! replaces the previous binding.

mod container;
mod construct;
mod descriptor;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
mod registry;
mod service;

pub use container::Container;
pub use construct::{Construct, Dependencies, Implement};
pub use error::{DiError, Result};
pub use service::{Injectable, Lifetime, Resolvable};

// Re-export tracing macros for convenience when logging is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Construct, Container, Dependencies, DiError, Implement, Injectable, Lifetime, Resolvable,
        Result,
    };
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    trait Renderer: Send + Sync {
        fn render(&self, message: &str) -> String;
    }

    trait Sender: Send + Sync {
        fn send(&self, message: &str) -> String;
        fn renderer_id(&self) -> usize;
    }

    service!(dyn Renderer, dyn Sender);

    struct SimpleRenderer;

    impl Renderer for SimpleRenderer {
        fn render(&self, message: &str) -> String {
            format!("<{message}>")
        }
    }

    impl Construct for SimpleRenderer {
        type Dependencies = ();

        fn new(_: ()) -> Self {
            SimpleRenderer
        }
    }

    impl Implement<dyn Renderer> for SimpleRenderer {
        fn upcast(this: Arc<Self>) -> Arc<dyn Renderer> {
            this
        }
    }

    struct ConcreteSender {
        renderer: Arc<dyn Renderer>,
    }

    impl Sender for ConcreteSender {
        fn send(&self, message: &str) -> String {
            self.renderer.render(message)
        }

        fn renderer_id(&self) -> usize {
            Arc::as_ptr(&self.renderer) as *const () as usize
        }
    }

    impl Construct for ConcreteSender {
        type Dependencies = Arc<dyn Renderer>;

        fn new(renderer: Arc<dyn Renderer>) -> Self {
            ConcreteSender { renderer }
        }
    }

    impl Implement<dyn Sender> for ConcreteSender {
        fn upcast(this: Arc<Self>) -> Arc<dyn Sender> {
            this
        }
    }

    #[test]
    fn test_transient_sender_shares_singleton_renderer() {
        let container = Container::new();
        container.register_singleton::<dyn Renderer, SimpleRenderer>();
        container.register_transient::<dyn Sender, ConcreteSender>();

        let first = container.resolve::<dyn Sender>().unwrap();
        let second = container.resolve::<dyn Sender>().unwrap();

        // Two distinct senders...
        assert!(!Arc::ptr_eq(&first, &second));
        // ...holding the identical renderer instance.
        assert_eq!(first.renderer_id(), second.renderer_id());
        assert_eq!(first.send("hi"), "<hi>");
    }

    #[test]
    fn test_singleton_shared_between_top_level_and_transitive_resolution() {
        let container = Container::new();
        container.register_singleton::<dyn Renderer, SimpleRenderer>();
        container.register_transient::<dyn Sender, ConcreteSender>();

        // Constructing the sender populated the renderer's cache; a direct
        // resolve must observe the same instance.
        let sender = container.resolve::<dyn Sender>().unwrap();
        let renderer = container.resolve::<dyn Renderer>().unwrap();

        assert_eq!(
            sender.renderer_id(),
            Arc::as_ptr(&renderer) as *const () as usize
        );
    }

    #[test]
    fn test_register_instance_preserves_identity() {
        let container = Container::new();
        let original: Arc<dyn Renderer> = Arc::new(SimpleRenderer);
        container.register_instance::<dyn Renderer>(Arc::clone(&original));

        let resolved = container.resolve::<dyn Renderer>().unwrap();
        assert!(Arc::ptr_eq(&resolved, &original));

        // Never reconstructed, always the same instance.
        let again = container.resolve::<dyn Renderer>().unwrap();
        assert!(Arc::ptr_eq(&again, &original));
    }

    #[test]
    fn test_generic_register_with_lifetime() {
        let container = Container::new();
        container.register::<dyn Renderer, SimpleRenderer>(Lifetime::Singleton);

        assert_eq!(
            container.lifetime_of::<dyn Renderer>(),
            Some(Lifetime::Singleton)
        );

        let a = container.resolve::<dyn Renderer>().unwrap();
        let b = container.resolve::<dyn Renderer>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unregistered_interface_fails_even_with_known_impl() {
        let container = Container::new();
        let err = container.resolve::<dyn Sender>().err().unwrap();
        assert!(matches!(err, DiError::NotRegistered { .. }));
    }

    #[test]
    fn test_fallback_construction_wires_registered_dependencies() {
        static BUILT: AtomicU32 = AtomicU32::new(0);

        struct Notifier {
            sender: Arc<dyn Sender>,
        }

        impl Construct for Notifier {
            type Dependencies = Arc<dyn Sender>;

            fn new(sender: Arc<dyn Sender>) -> Self {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Notifier { sender }
            }
        }

        let container = Container::new();
        container.register_singleton::<dyn Renderer, SimpleRenderer>();
        container.register_transient::<dyn Sender, ConcreteSender>();

        // Notifier itself is unregistered: resolved via the concrete
        // fallback, with its interface dependency pulled from the registry.
        let notifier = container.resolve::<Notifier>().unwrap();
        assert_eq!(notifier.sender.send("ping"), "<ping>");
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);

        let _ = container.resolve::<Notifier>().unwrap();
        assert_eq!(BUILT.load(Ordering::SeqCst), 2);
    }
}
