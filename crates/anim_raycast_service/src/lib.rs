#![doc = "Service components: declarative units that plug into an application."]
//!
//! A [`ServiceComponent`] declares which services it provides, requires,
//! depends on and cannot coexist with. A [`ComponentRegistry`] checks those
//! declarations, activates components in dependency order and owns the
//! [`RequestHandlers`] components connect to while they are active.

mod component;
mod error;
mod handlers;
mod project;
mod registry;

pub use component::*;
pub use error::*;
pub use handlers::*;
pub use project::*;
pub use registry::*;

/// The service prelude.
///
/// This includes the most common types in this crate, re-exported for your convenience.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        ComponentRegistry, ComponentSchema, ProjectConfig, ProjectRequests,
        ProjectSystemComponent, RequestHandlers, ServiceComponent, ServiceId,
    };
}
