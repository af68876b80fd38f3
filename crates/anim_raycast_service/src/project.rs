use std::{io, path::Path, sync::Arc};

use ron::de::SpannedError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{ComponentSchema, RequestHandlers, ServiceComponent, ServiceError, ServiceId};

/// The service offered by [`ProjectSystemComponent`].
pub const PROJECT_SERVICE: ServiceId = ServiceId::new("ProjectService");

/// Requests answered by the project while its system component is active.
pub trait ProjectRequests: Send + Sync {
    /// The project name.
    fn project_name(&self) -> &str;

    /// A short description of the project.
    fn description(&self) -> &str;
}

/// Project settings, usually read from a `project.ron` file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// The project name.
    pub name: String,
    /// A short description of the project.
    pub description: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Project".to_string(),
            description: String::new(),
        }
    }
}

/// Errors that can occur when loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred.
    #[error("I/O")]
    Io(#[from] io::Error),
    /// An error occurred in RON deserialization, and the location of the error
    /// is supplied.
    #[error("RON deserialization: {0}")]
    SpannedRon(#[from] SpannedError),
}

impl ProjectConfig {
    /// Parses a configuration from RON text. Missing fields keep their
    /// defaults.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(text)?)
    }

    /// Reads a configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

struct ProjectHandler {
    config: ProjectConfig,
}

impl ProjectRequests for ProjectHandler {
    fn project_name(&self) -> &str {
        &self.config.name
    }

    fn description(&self) -> &str {
        &self.config.description
    }
}

/// The system component of a project.
///
/// Provides [`PROJECT_SERVICE`] and refuses to share it, so an application
/// holds at most one. While active it serves [`ProjectRequests`].
pub struct ProjectSystemComponent {
    handler: Arc<ProjectHandler>,
}

impl ProjectSystemComponent {
    /// The schema of this component type.
    pub const SCHEMA: ComponentSchema = ComponentSchema {
        type_name: "ProjectSystemComponent",
        version: 0,
        display_name: "Project",
        description: "System component of the project",
        category: "System",
        appears_in_add_component_menu: true,
    };

    /// Creates the component for the given project.
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            handler: Arc::new(ProjectHandler { config }),
        }
    }

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.handler.config
    }
}

impl Default for ProjectSystemComponent {
    fn default() -> Self {
        Self::new(ProjectConfig::default())
    }
}

impl ServiceComponent for ProjectSystemComponent {
    fn schema(&self) -> &'static ComponentSchema {
        &Self::SCHEMA
    }

    fn provided_services(&self) -> &[ServiceId] {
        &[PROJECT_SERVICE]
    }

    fn incompatible_services(&self) -> &[ServiceId] {
        &[PROJECT_SERVICE]
    }

    fn activate(&mut self, handlers: &mut RequestHandlers) -> Result<(), ServiceError> {
        debug!("project {} is starting", self.handler.config.name);
        handlers.connect::<dyn ProjectRequests>(self.handler.clone())
    }

    fn deactivate(&mut self, handlers: &mut RequestHandlers) {
        handlers.disconnect::<dyn ProjectRequests>();
    }
}
