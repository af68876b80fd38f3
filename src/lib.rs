#![doc = "Raycasting animation graph nodes and service components for Bevy apps."]
//!
//! Add [`AnimRaycastPlugin`] to an [`App`](bevy_app::App) with the raycast
//! provider of your choice, build [`AnimGraph`](graph::AnimGraph)s with the
//! [`NodeServices`](graph::NodeServices) resource it inserts, and attach them
//! to entities with an [`AnimGraphPlayer`]. Graphs are evaluated once per
//! frame in the [`Update`](bevy_app::Update) schedule.
//!
//! [`ProjectPlugin`] registers the project's system component with the
//! application's [`ComponentRegistry`](service::ComponentRegistry).

mod player;
mod plugin;
mod services;

pub use anim_raycast_graph as graph;
pub use anim_raycast_physics as physics;
pub use anim_raycast_service as service;

pub use player::*;
pub use plugin::*;
pub use services::*;

/// `use anim_raycast::prelude::*;` to import the commonly used items.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        AddServiceComponent, AnimGraphPlayer, AnimRaycastPlugin, EditorPreview, ProjectPlugin,
        ServicesPlugin, graph::prelude::*, physics::prelude::*, service::prelude::*,
    };
}
