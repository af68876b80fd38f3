use thiserror::Error;

use crate::ServiceId;

/// Errors raised while registering, activating or deactivating service
/// components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// One component provides a service the other refuses to share.
    #[error("{component} cannot be added next to {existing}: both claim {service}")]
    IncompatibleService {
        /// The component being added.
        component: String,
        /// The component already registered.
        existing: String,
        /// The contested service.
        service: ServiceId,
    },
    /// Nobody provides a service a component requires.
    #[error("{component} requires {service}, which no registered component provides")]
    MissingRequiredService {
        /// The component with the requirement.
        component: String,
        /// The missing service.
        service: ServiceId,
    },
    /// Components depend on each other in a loop.
    #[error("service dependency cycle between {0:?}")]
    DependencyCycle(Vec<String>),
    /// A handler for this request interface is already connected.
    #[error("a handler for {0} is already connected")]
    HandlerAlreadyConnected(&'static str),
    /// The operation needs an inactive registry.
    #[error("the component registry is active")]
    RegistryActive,
}
