use core::fmt;

use downcast_rs::{Downcast, impl_downcast};

use crate::{RequestHandlers, ServiceError};

/// Names a capability a component offers to the rest of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(&'static str);

impl ServiceId {
    /// Creates a service id.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The name of the service.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Static description of a component type, used for saving and for editor
/// display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentSchema {
    /// Stable name used when saving.
    pub type_name: &'static str,
    /// Serialization version.
    pub version: u32,
    /// Name shown to users.
    pub display_name: &'static str,
    /// One line describing the component.
    pub description: &'static str,
    /// Menu section the component is listed under.
    pub category: &'static str,
    /// Whether users can add the component by hand.
    pub appears_in_add_component_menu: bool,
}

/// A unit of functionality managed by a [`ComponentRegistry`](crate::ComponentRegistry).
///
/// The service lists are pure declarations; the registry uses them to reject
/// conflicting components and to order activation. Components requiring or
/// depending on a service are activated after the components providing it,
/// and deactivated before them. A missing dependent service is not an error,
/// a missing required one is.
pub trait ServiceComponent: Downcast + Send + Sync {
    /// The static description of this component type.
    fn schema(&self) -> &'static ComponentSchema;

    /// The name of this component, used in logs and errors.
    fn name(&self) -> &str {
        self.schema().type_name
    }

    /// Services this component offers.
    fn provided_services(&self) -> &[ServiceId] {
        &[]
    }

    /// Services that must be provided by another component.
    fn required_services(&self) -> &[ServiceId] {
        &[]
    }

    /// Services that, when present, must be activated first.
    fn dependent_services(&self) -> &[ServiceId] {
        &[]
    }

    /// Services no other component may provide alongside this one.
    fn incompatible_services(&self) -> &[ServiceId] {
        &[]
    }

    /// Called once when the component is registered.
    fn init(&mut self) {}

    /// Starts the component.
    fn activate(&mut self, handlers: &mut RequestHandlers) -> Result<(), ServiceError>;

    /// Stops the component.
    fn deactivate(&mut self, handlers: &mut RequestHandlers);
}

impl_downcast!(ServiceComponent);
