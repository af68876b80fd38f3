use anim_raycast_service::{ComponentRegistry, ProjectConfig, ProjectSystemComponent, ServiceComponent};
use bevy_app::{App, Plugin};
use tracing::error;

/// Owns the [`ComponentRegistry`] of an App and activates it once every
/// plugin has been built.
#[derive(Default)]
pub struct ServicesPlugin;

impl Plugin for ServicesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ComponentRegistry>();
    }

    fn finish(&self, app: &mut App) {
        let Some(mut registry) = app.world_mut().get_resource_mut::<ComponentRegistry>() else {
            return;
        };
        if let Err(err) = registry.activate() {
            error!("failed to activate service components: {err}");
        }
    }
}

/// Registers [`ServiceComponent`]s with an [`App`].
pub trait AddServiceComponent {
    /// Adds `component` to the App's [`ComponentRegistry`], adding the
    /// [`ServicesPlugin`] first if needed.
    ///
    /// Rejected components are logged and dropped.
    fn add_service_component(&mut self, component: impl ServiceComponent) -> &mut Self;
}

impl AddServiceComponent for App {
    fn add_service_component(&mut self, component: impl ServiceComponent) -> &mut Self {
        if !self.is_plugin_added::<ServicesPlugin>() {
            self.add_plugins(ServicesPlugin);
        }
        let name = component.name().to_string();
        let mut registry = self.world_mut().resource_mut::<ComponentRegistry>();
        if let Err(err) = registry.add(component) {
            error!("could not add service component {name}: {err}");
        }
        self
    }
}

/// Registers the [`ProjectSystemComponent`] of the App.
#[derive(Default)]
pub struct ProjectPlugin {
    /// Settings of the project.
    pub config: ProjectConfig,
}

impl Plugin for ProjectPlugin {
    fn build(&self, app: &mut App) {
        app.add_service_component(ProjectSystemComponent::new(self.config.clone()));
    }
}
