//! Error types for container operations

use thiserror::Error;

/// Errors that can occur during registration or resolution
#[derive(Error, Debug, Clone)]
pub enum DiError {
    /// The requested service type has no binding and cannot be constructed
    /// directly (it is abstract)
    #[error("service not registered: {service}")]
    NotRegistered { service: &'static str },

    /// A stored instance does not match the service type it was registered
    /// under. Only reachable through the type-erased registration path;
    /// typed registration proves assignability at compile time.
    #[error("invalid binding for {service}: stored instance is not of the service type")]
    InvalidBinding { service: &'static str },
}

impl DiError {
    /// Create a NotRegistered error for a service type
    #[inline]
    pub fn not_registered<S: ?Sized + 'static>() -> Self {
        Self::NotRegistered {
            service: std::any::type_name::<S>(),
        }
    }

    /// Create an InvalidBinding error for a service type
    #[inline]
    pub fn invalid_binding<S: ?Sized + 'static>() -> Self {
        Self::InvalidBinding {
            service: std::any::type_name::<S>(),
        }
    }
}

/// Result type alias for container operations
pub type Result<T> = std::result::Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    trait Renderer: Send + Sync {}

    #[test]
    fn test_not_registered_names_the_service() {
        let err = DiError::not_registered::<dyn Renderer>();
        let msg = err.to_string();
        assert!(msg.contains("not registered"));
        assert!(msg.contains("Renderer"));
    }

    #[test]
    fn test_invalid_binding_display() {
        let err = DiError::invalid_binding::<String>();
        assert!(err.to_string().contains("invalid binding"));
    }
}
