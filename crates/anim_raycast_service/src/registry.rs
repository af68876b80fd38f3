use bevy_ecs::prelude::Resource;
use tracing::{debug, warn};

use crate::{RequestHandlers, ServiceComponent, ServiceError, ServiceId};

/// Lifecycle state of a registered component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComponentState {
    /// Registered and initialized, never activated.
    #[default]
    Initialized,
    /// Currently running.
    Active,
    /// Activated once, now stopped.
    Deactivated,
}

/// Owns the [`ServiceComponent`]s of an application.
///
/// Components are added while the registry is inactive, then started
/// together with [`activate`](Self::activate) and stopped with
/// [`deactivate`](Self::deactivate). Each activation cycle calls every
/// component's `activate` and `deactivate` exactly once.
#[derive(Resource, Default)]
pub struct ComponentRegistry {
    components: Vec<Box<dyn ServiceComponent>>,
    states: Vec<ComponentState>,
    activation_order: Vec<usize>,
    handlers: RequestHandlers,
    active: bool,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component.
    ///
    /// Fails if the registry is active or if the component and an already
    /// registered one provide a service the other declares incompatible.
    pub fn add(&mut self, component: impl ServiceComponent) -> Result<(), ServiceError> {
        self.add_boxed(Box::new(component))
    }

    /// Registers an already boxed component.
    pub fn add_boxed(&mut self, mut component: Box<dyn ServiceComponent>) -> Result<(), ServiceError> {
        if self.active {
            return Err(ServiceError::RegistryActive);
        }
        for existing in &self.components {
            if let Some(service) = conflicting_service(existing.as_ref(), component.as_ref()) {
                return Err(ServiceError::IncompatibleService {
                    component: component.name().to_string(),
                    existing: existing.name().to_string(),
                    service,
                });
            }
        }

        component.init();
        debug!("registered component {}", component.name());
        self.components.push(component);
        self.states.push(ComponentState::Initialized);
        Ok(())
    }

    /// Activates every component, providers first.
    ///
    /// If a component fails to activate, the ones already started are
    /// deactivated again and the error is returned.
    pub fn activate(&mut self) -> Result<(), ServiceError> {
        if self.active {
            return Err(ServiceError::RegistryActive);
        }
        let order = self.resolve_order()?;

        for (position, &index) in order.iter().enumerate() {
            let component = &mut self.components[index];
            if let Err(error) = component.activate(&mut self.handlers) {
                warn!("failed to activate {}: {error}", component.name());
                for &started in order[..position].iter().rev() {
                    self.components[started].deactivate(&mut self.handlers);
                    self.states[started] = ComponentState::Deactivated;
                }
                return Err(error);
            }
            debug!("activated component {}", component.name());
            self.states[index] = ComponentState::Active;
        }

        self.activation_order = order;
        self.active = true;
        Ok(())
    }

    /// Deactivates every component in reverse activation order.
    ///
    /// Does nothing if the registry is not active.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        for &index in self.activation_order.iter().rev() {
            let component = &mut self.components[index];
            component.deactivate(&mut self.handlers);
            debug!("deactivated component {}", component.name());
            self.states[index] = ComponentState::Deactivated;
        }
        self.activation_order.clear();
        self.active = false;
    }

    /// Returns `true` between [`activate`](Self::activate) and
    /// [`deactivate`](Self::deactivate).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The request handlers connected by active components.
    pub fn handlers(&self) -> &RequestHandlers {
        &self.handlers
    }

    /// Returns the first component of type `T`.
    pub fn get<T: ServiceComponent>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|component| component.downcast_ref())
    }

    /// Returns `true` if a component of type `T` is registered.
    pub fn contains<T: ServiceComponent>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// The state of the first component of type `T`.
    pub fn state<T: ServiceComponent>(&self) -> Option<ComponentState> {
        self.components
            .iter()
            .position(|component| component.is::<T>())
            .map(|index| self.states[index])
    }

    /// Names of the components in the order they were last activated.
    pub fn activation_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.activation_order
            .iter()
            .map(|&index| self.components[index].name())
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if no component is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Orders components so that providers come before the components that
    /// require or depend on their services. Ties keep registration order.
    fn resolve_order(&self) -> Result<Vec<usize>, ServiceError> {
        let providers = |service: &ServiceId| -> Vec<usize> {
            self.components
                .iter()
                .enumerate()
                .filter(|(_, component)| component.provided_services().contains(service))
                .map(|(index, _)| index)
                .collect()
        };

        let mut prerequisites = Vec::with_capacity(self.components.len());
        for (index, component) in self.components.iter().enumerate() {
            let mut before = Vec::new();
            for service in component.required_services() {
                let found = providers(service);
                if found.iter().all(|&provider| provider == index) {
                    return Err(ServiceError::MissingRequiredService {
                        component: component.name().to_string(),
                        service: *service,
                    });
                }
                before.extend(found);
            }
            for service in component.dependent_services() {
                before.extend(providers(service));
            }
            before.retain(|&provider| provider != index);
            prerequisites.push(before);
        }

        let mut order = Vec::with_capacity(self.components.len());
        let mut placed = vec![false; self.components.len()];
        while order.len() < self.components.len() {
            let next = (0..self.components.len()).find(|&index| {
                !placed[index] && prerequisites[index].iter().all(|&before| placed[before])
            });
            match next {
                Some(index) => {
                    placed[index] = true;
                    order.push(index);
                }
                None => {
                    let stuck = (0..self.components.len())
                        .filter(|&index| !placed[index])
                        .map(|index| self.components[index].name().to_string())
                        .collect();
                    return Err(ServiceError::DependencyCycle(stuck));
                }
            }
        }
        Ok(order)
    }
}

impl Drop for ComponentRegistry {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// A service provided by one component that the other declares incompatible.
fn conflicting_service(a: &dyn ServiceComponent, b: &dyn ServiceComponent) -> Option<ServiceId> {
    let clash = |provider: &dyn ServiceComponent, rejecter: &dyn ServiceComponent| {
        provider
            .provided_services()
            .iter()
            .find(|service| rejecter.incompatible_services().contains(service))
            .copied()
    };
    clash(a, b).or_else(|| clash(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentSchema;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    const SCHEMA: ComponentSchema = ComponentSchema {
        type_name: "TestComponent",
        version: 0,
        display_name: "Test",
        description: "A component for tests",
        category: "Tests",
        appears_in_add_component_menu: false,
    };

    const PHYSICS: ServiceId = ServiceId::new("PhysicsService");
    const ANIMATION: ServiceId = ServiceId::new("AnimationService");
    const AUDIO: ServiceId = ServiceId::new("AudioService");

    struct TestComponent {
        name: &'static str,
        provided: Vec<ServiceId>,
        required: Vec<ServiceId>,
        dependent: Vec<ServiceId>,
        incompatible: Vec<ServiceId>,
        fail_activation: bool,
        log: Log,
    }

    impl TestComponent {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                provided: Vec::new(),
                required: Vec::new(),
                dependent: Vec::new(),
                incompatible: Vec::new(),
                fail_activation: false,
                log: log.clone(),
            }
        }

        fn provides(mut self, service: ServiceId) -> Self {
            self.provided.push(service);
            self
        }

        fn requires(mut self, service: ServiceId) -> Self {
            self.required.push(service);
            self
        }

        fn depends_on(mut self, service: ServiceId) -> Self {
            self.dependent.push(service);
            self
        }

        fn incompatible_with(mut self, service: ServiceId) -> Self {
            self.incompatible.push(service);
            self
        }

        fn failing(mut self) -> Self {
            self.fail_activation = true;
            self
        }
    }

    impl ServiceComponent for TestComponent {
        fn schema(&self) -> &'static ComponentSchema {
            &SCHEMA
        }

        fn name(&self) -> &str {
            self.name
        }

        fn provided_services(&self) -> &[ServiceId] {
            &self.provided
        }

        fn required_services(&self) -> &[ServiceId] {
            &self.required
        }

        fn dependent_services(&self) -> &[ServiceId] {
            &self.dependent
        }

        fn incompatible_services(&self) -> &[ServiceId] {
            &self.incompatible
        }

        fn activate(&mut self, _: &mut RequestHandlers) -> Result<(), ServiceError> {
            if self.fail_activation {
                return Err(ServiceError::HandlerAlreadyConnected("TestRequests"));
            }
            self.log.lock().unwrap().push(format!("+{}", self.name));
            Ok(())
        }

        fn deactivate(&mut self, _: &mut RequestHandlers) {
            self.log.lock().unwrap().push(format!("-{}", self.name));
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn providers_activate_first_and_stop_last() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("animation", &log).provides(ANIMATION).requires(PHYSICS))
            .unwrap();
        registry
            .add(TestComponent::new("audio", &log).provides(AUDIO).depends_on(ANIMATION))
            .unwrap();
        registry
            .add(TestComponent::new("physics", &log).provides(PHYSICS))
            .unwrap();

        registry.activate().unwrap();
        assert!(registry.is_active());
        assert_eq!(
            registry.activation_order().collect::<Vec<_>>(),
            ["physics", "animation", "audio"]
        );

        registry.deactivate();
        assert!(!registry.is_active());
        assert_eq!(
            entries(&log),
            ["+physics", "+animation", "+audio", "-audio", "-animation", "-physics"]
        );
    }

    #[test]
    fn missing_dependent_service_is_fine() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("audio", &log).depends_on(ANIMATION))
            .unwrap();
        assert!(registry.activate().is_ok());
    }

    #[test]
    fn missing_required_service_fails() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("animation", &log).requires(PHYSICS))
            .unwrap();
        assert_eq!(
            registry.activate(),
            Err(ServiceError::MissingRequiredService {
                component: "animation".to_string(),
                service: PHYSICS,
            })
        );
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn cycles_are_reported() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("a", &log).provides(PHYSICS).requires(ANIMATION))
            .unwrap();
        registry
            .add(TestComponent::new("b", &log).provides(ANIMATION).requires(PHYSICS))
            .unwrap();
        assert_eq!(
            registry.activate(),
            Err(ServiceError::DependencyCycle(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn incompatible_components_are_rejected() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("first", &log).provides(AUDIO).incompatible_with(AUDIO))
            .unwrap();
        assert_eq!(
            registry.add(TestComponent::new("second", &log).provides(AUDIO)),
            Err(ServiceError::IncompatibleService {
                component: "second".to_string(),
                existing: "first".to_string(),
                service: AUDIO,
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_activation_rolls_back() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry
            .add(TestComponent::new("physics", &log).provides(PHYSICS))
            .unwrap();
        registry
            .add(TestComponent::new("broken", &log).requires(PHYSICS).failing())
            .unwrap();

        assert!(registry.activate().is_err());
        assert!(!registry.is_active());
        assert_eq!(entries(&log), ["+physics", "-physics"]);
        assert_eq!(registry.state::<TestComponent>(), Some(ComponentState::Deactivated));
    }

    #[test]
    fn registry_is_locked_while_active() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry.activate().unwrap();
        assert_eq!(
            registry.add(TestComponent::new("late", &log)),
            Err(ServiceError::RegistryActive)
        );
        assert_eq!(registry.activate(), Err(ServiceError::RegistryActive));
        registry.deactivate();
        assert!(registry.add(TestComponent::new("late", &log)).is_ok());
    }

    #[test]
    fn dropping_an_active_registry_deactivates() {
        let log = Log::default();
        let mut registry = ComponentRegistry::new();
        registry.add(TestComponent::new("only", &log)).unwrap();
        registry.activate().unwrap();
        drop(registry);
        assert_eq!(entries(&log), ["+only", "-only"]);
    }
}
